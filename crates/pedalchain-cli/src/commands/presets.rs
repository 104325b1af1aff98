//! Preset management commands.

use clap::{Args, Subcommand};
use pedalchain_engine::Engine;

use super::common::{print_json, read_chain};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// Save a chain as a new preset
    Save {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Chain as a JSON file or inline JSON
        #[arg(short, long, value_name = "FILE|JSON")]
        chain: String,
    },

    /// List stored presets, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a stored preset document
    Show {
        /// Preset id
        id: String,
    },

    /// Delete a stored preset
    Delete {
        /// Preset id
        id: String,
    },
}

pub fn run(args: PresetsArgs, engine: &Engine) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::Save {
            name,
            description,
            chain,
        } => {
            let chain = read_chain(&chain)?;
            let preset = engine.save_preset(&name, &description, chain, None)?;
            println!("{}", preset.id);
            Ok(())
        }
        PresetsCommand::List { json } => list_presets(engine, json),
        PresetsCommand::Show { id } => print_json(&engine.show_preset(&id)?),
        PresetsCommand::Delete { id } => {
            engine.delete_preset(&id)?;
            println!("deleted {id}");
            Ok(())
        }
    }
}

fn list_presets(engine: &Engine, json: bool) -> anyhow::Result<()> {
    let presets = engine.list_presets()?;
    if json {
        return print_json(&presets);
    }

    if presets.is_empty() {
        println!("No presets in {}", engine.settings().preset_dir.display());
        println!();
        println!("Create one with: pedalchain presets save --name <NAME> --chain <FILE|JSON>");
        return Ok(());
    }
    for preset in &presets {
        println!(
            "{}  {}  {:24} {:>2} step(s)  {}",
            preset.id,
            preset.created_at.format("%Y-%m-%d %H:%M"),
            preset.name,
            preset.effects_count,
            preset.description
        );
    }
    Ok(())
}
