//! pedalchain CLI - build effect chains and run audio files through them.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pedalchain")]
#[command(author, version, about = "Audio effect chains from the command line", long_about = None)]
struct Cli {
    /// Settings file (overrides PEDALCHAIN_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available effect types and their parameters
    Effects(commands::effects::EffectsArgs),

    /// Run audio files through an effect chain
    Process(commands::process::ProcessArgs),

    /// Save, list, show and delete presets
    Presets(commands::presets::PresetsArgs),

    /// List impulse responses available to convolution
    Impulses(commands::impulses::ImpulsesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::common::report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let engine = commands::common::open_engine(cli.config.as_deref())?;

    match cli.command {
        Commands::Effects(args) => commands::effects::run(args, &engine),
        Commands::Process(args) => commands::process::run(args, &engine),
        Commands::Presets(args) => commands::presets::run(args, &engine),
        Commands::Impulses(args) => commands::impulses::run(args, &engine),
    }
}
