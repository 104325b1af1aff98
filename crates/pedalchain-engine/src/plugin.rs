//! External plugin hosting seam.
//!
//! Loading native plugin binaries is delegated to a [`PluginLoader`]. The
//! engine owns path policy, the load deadline and parameter overrides; a
//! loader only has to open a binary and hand back a [`HostedPlugin`].
//!
//! Output from a hosted plugin is deterministic only if the plugin itself is.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use pedalchain_config::paths::expand_home;
use pedalchain_dsp::{AudioBuffer, Processor};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::InstantiationError;

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLoadRequest {
    /// Resolved path of the plugin binary or bundle.
    pub path: PathBuf,
    /// Sub-plugin to select from a multi-plugin bundle.
    pub plugin_name: Option<String>,
}

/// Loader failure.
#[derive(Debug, Error)]
pub enum PluginLoadError {
    /// This build has no backend able to open plugin binaries.
    #[error("no plugin backend is available in this build")]
    BackendUnavailable,
    /// The named sub-plugin is not in the bundle.
    #[error("plugin '{0}' is not present in the bundle")]
    MissingSubPlugin(String),
    /// Anything else the backend reports.
    #[error("{0}")]
    Backend(String),
}

/// A loaded plugin instance.
pub trait HostedPlugin: Send {
    /// Names of the parameters this instance exposes.
    fn parameter_names(&self) -> Vec<String>;

    /// Sets one parameter. `Err` carries the plugin's reason for refusing.
    fn set_parameter(&mut self, name: &str, value: &Value) -> Result<(), String>;

    /// Processes a whole buffer in place.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clears internal state.
    fn reset(&mut self);
}

/// Opens plugin binaries. Implementations may block.
pub trait PluginLoader: Send + Sync {
    /// Loads the plugin described by `request`.
    fn load(&self, request: &PluginLoadRequest) -> Result<Box<dyn HostedPlugin>, PluginLoadError>;
}

/// Loader used when no backend is compiled in; every load fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLoader;

impl PluginLoader for UnavailableLoader {
    fn load(&self, _request: &PluginLoadRequest) -> Result<Box<dyn HostedPlugin>, PluginLoadError> {
        Err(PluginLoadError::BackendUnavailable)
    }
}

/// Where plugins may come from and how long they may take.
#[derive(Debug, Clone)]
pub struct PluginPolicy {
    /// Directory relative plugin paths resolve under.
    pub plugin_dir: PathBuf,
    /// Whether absolute and `~/` paths are accepted.
    pub allow_absolute_paths: bool,
    /// Ceiling applied to every step's own timeout.
    pub max_init_timeout: Duration,
}

impl PluginPolicy {
    /// Resolves a step's `plugin_path`.
    ///
    /// Relative paths must stay inside the plugin directory after symlinks
    /// are resolved. Absolute paths are accepted only when allowed.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, InstantiationError> {
        let raw = raw.trim();
        let expanded = expand_home(raw);
        if expanded.is_absolute() || raw.starts_with("~/") {
            if !self.allow_absolute_paths {
                return Err(InstantiationError::plugin_failure(format!(
                    "absolute plugin path '{raw}' is not permitted"
                )));
            }
            return Ok(expanded);
        }

        if expanded
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_) | Component::RootDir))
        {
            return Err(InstantiationError::plugin_failure(format!(
                "plugin path '{raw}' leaves the plugin directory"
            )));
        }

        let dir = self.plugin_dir.canonicalize().map_err(|e| {
            InstantiationError::plugin_failure(format!(
                "plugin directory '{}' is unavailable: {e}",
                self.plugin_dir.display()
            ))
        })?;
        let candidate = dir.join(&expanded).canonicalize().map_err(|_| {
            InstantiationError::plugin_failure(format!("plugin '{raw}' not found"))
        })?;
        if !candidate.starts_with(&dir) {
            return Err(InstantiationError::plugin_failure(format!(
                "plugin path '{raw}' leaves the plugin directory"
            )));
        }
        Ok(candidate)
    }

    /// The deadline for a step that asked for `requested`.
    pub fn effective_timeout(&self, requested: Duration) -> Duration {
        requested.min(self.max_init_timeout)
    }
}

/// Runs `loader` on its own thread and waits at most `timeout`.
///
/// On timeout the loader thread is left to finish on its own; whatever it
/// eventually returns is dropped.
pub fn load_with_timeout(
    loader: Arc<dyn PluginLoader>,
    request: PluginLoadRequest,
    timeout: Duration,
) -> Result<Box<dyn HostedPlugin>, InstantiationError> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let path = request.path.clone();
    std::thread::Builder::new()
        .name("plugin-load".into())
        .spawn(move || {
            let result = loader.load(&request);
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(result);
        })
        .map_err(|e| {
            InstantiationError::plugin_failure(format!("cannot start loader thread: {e}"))
        })?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(plugin)) => {
            debug!(path = %path.display(), "plugin loaded");
            Ok(plugin)
        }
        Ok(Err(err)) => Err(InstantiationError::plugin_failure(err.to_string())),
        Err(RecvTimeoutError::Timeout) => {
            Err(InstantiationError::PluginLoadTimeout { path, timeout })
        }
        Err(RecvTimeoutError::Disconnected) => Err(InstantiationError::plugin_failure(
            "loader thread exited without a result",
        )),
    }
}

/// Applies named overrides. Unknown names are skipped with a warning; a
/// value the plugin refuses fails the load.
pub fn apply_overrides(
    plugin: &mut dyn HostedPlugin,
    overrides: &Map<String, Value>,
) -> Result<(), InstantiationError> {
    if overrides.is_empty() {
        return Ok(());
    }
    let exposed = plugin.parameter_names();
    for (name, value) in overrides {
        if !exposed.iter().any(|p| p == name) {
            warn!(parameter = %name, "plugin does not expose parameter, skipping override");
            continue;
        }
        plugin.set_parameter(name, value).map_err(|reason| {
            InstantiationError::plugin_failure(format!("parameter '{name}' rejected: {reason}"))
        })?;
    }
    Ok(())
}

/// Chain adapter for a hosted plugin.
pub(crate) struct PluginEffect {
    plugin: Box<dyn HostedPlugin>,
}

impl PluginEffect {
    pub(crate) fn new(plugin: Box<dyn HostedPlugin>) -> Self {
        Self { plugin }
    }
}

impl Processor for PluginEffect {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.plugin.process(buffer);
    }

    fn reset(&mut self) {
        self.plugin.reset();
    }
}
