//! Impulse-response listing.

use clap::Args;
use pedalchain_engine::Engine;

use super::common::print_json;

#[derive(Args)]
pub struct ImpulsesArgs {
    /// Rescan the impulse directory first
    #[arg(long)]
    refresh: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ImpulsesArgs, engine: &Engine) -> anyhow::Result<()> {
    if args.refresh && !engine.refresh_impulses() {
        tracing::info!("rescan skipped; last scan is within the refresh interval");
    }
    let impulses = engine.impulse_responses();

    if args.json {
        return print_json(&impulses);
    }
    if impulses.is_empty() {
        println!("No impulse responses in {}", engine.settings().impulse_dir.display());
        return Ok(());
    }
    for name in &impulses {
        println!("{name}");
    }
    Ok(())
}
