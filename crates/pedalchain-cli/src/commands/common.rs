//! Shared CLI helpers used across multiple commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use pedalchain_config::{EffectChainSpec, Settings, parse_chain};
use pedalchain_engine::{Engine, EngineError, UnavailableLoader};
use tracing::debug;

/// Loads settings and opens the engine.
///
/// No plugin backend is linked into this binary, so the plugin host type
/// fails to load even when enabled in settings.
pub fn open_engine(config: Option<&Path>) -> anyhow::Result<Engine> {
    let (settings, source) = Settings::discover(config).map_err(EngineError::from)?;
    match &source {
        Some(path) => debug!(path = %path.display(), "loaded settings"),
        None => debug!("using default settings"),
    }
    let engine = Engine::new(settings, Arc::new(UnavailableLoader))?;
    Ok(engine)
}

/// Reads a chain from a file path or, failing that, parses the argument as
/// inline JSON.
pub fn read_chain(arg: &str) -> anyhow::Result<EffectChainSpec> {
    let path = Path::new(arg);
    let (text, origin) = if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chain file {}", path.display()))?;
        (text, path.display().to_string())
    } else {
        (arg.to_string(), "inline chain".to_string())
    };
    parse_chain(&text)
        .map_err(EngineError::from)
        .with_context(|| format!("invalid chain document ({origin})"))
}

/// Pretty JSON on stdout.
pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints an error to stderr with its structured kind and step when known.
pub fn report(err: &anyhow::Error) {
    match err.downcast_ref::<EngineError>() {
        Some(engine_err) => {
            let report = engine_err.report();
            match report.step {
                Some(step) => eprintln!("error[{}] at step {step}: {err:#}", report.kind),
                None => eprintln!("error[{}]: {err:#}", report.kind),
            }
        }
        None => eprintln!("error: {err:#}"),
    }
}
