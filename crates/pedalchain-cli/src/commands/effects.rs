//! Effect catalog listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use pedalchain_engine::Engine;
use pedalchain_registry::{EffectTypeDescriptor, ParamSpec};

use super::common::print_json;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show parameters of one effect type (identifier or alias)
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,

    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: EffectsArgs, engine: &Engine) -> anyhow::Result<()> {
    let catalog = engine.catalog();

    if let Some(name) = &args.effect {
        let descriptor = catalog.lookup(name)?;
        if args.json {
            let listing = catalog.listing();
            return print_json(&listing[descriptor.type_id.as_str()]);
        }
        print_descriptor(descriptor);
        return Ok(());
    }

    if args.json {
        return print_json(&catalog.listing());
    }

    println!("Available Effects");
    println!("=================");
    println!();
    for descriptor in catalog.list_all() {
        println!("  {:24} - {}", descriptor.type_id, descriptor.display_name);
    }
    println!();
    println!("Use 'pedalchain effects <type>' for parameter details.");
    Ok(())
}

fn print_descriptor(descriptor: &EffectTypeDescriptor) {
    let title = format!("{} ({})", descriptor.display_name, descriptor.type_id);
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!();
    println!("{}", descriptor.description);
    if !descriptor.aliases.is_empty() {
        println!();
        println!("Aliases: {}", descriptor.aliases.join(", "));
    }
    if let Some(notes) = &descriptor.notes {
        println!();
        println!("Note: {notes}");
    }
    println!();

    if descriptor.params.is_empty() {
        println!("No parameters.");
        return;
    }

    println!("Parameters:");
    println!();
    println!("  {:28}  {:14}  {:12}  {}", "Name", "Kind", "Default", "Range");
    println!("  {:28}  {:14}  {:12}  {}", "----", "----", "-------", "-----");
    for spec in &descriptor.params {
        let default = match &spec.default {
            Some(value) => value.to_string(),
            None if spec.required => "(required)".to_string(),
            None => "-".to_string(),
        };
        println!(
            "  {:28}  {:14}  {:12}  {}",
            spec.name,
            spec.kind.to_string(),
            default,
            range_text(spec)
        );
    }
}

fn range_text(spec: &ParamSpec) -> String {
    if spec.kind.is_choice() {
        return if spec.allowed_values.is_empty() {
            "(none available)".to_string()
        } else {
            spec.allowed_values.join(" | ")
        };
    }
    match (spec.min, spec.max) {
        (Some(min), Some(max)) => format!("{min} .. {max}"),
        _ => String::new(),
    }
}
