//! Deployment settings loaded from TOML.
//!
//! ```toml
//! impulse_dir = "/srv/pedalchain/impulses"
//! plugin_dir = "/srv/pedalchain/plugins"
//! preset_dir = "/srv/pedalchain/presets"
//! impulse_rescan_interval_secs = 5
//! workers = 4
//!
//! [plugins]
//! enabled = true
//! allow_absolute_paths = false
//! max_init_timeout_secs = 30
//!
//! [output]
//! bit_depth = 24
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::paths;

/// Bit depths the WAV encoder can write.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// External plugin hosting policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginSettings {
    /// Whether the plugin host effect type is offered at all.
    pub enabled: bool,
    /// Whether steps may name plugins outside the plugin directory.
    pub allow_absolute_paths: bool,
    /// Upper bound on any step's `initialization_timeout`, in seconds.
    pub max_init_timeout_secs: f64,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_absolute_paths: false,
            max_init_timeout_secs: 30.0,
        }
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// WAV bit depth; `None` keeps the source's depth, else 16.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<u16>,
}

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Impulse-response directory scanned for convolution kernels.
    pub impulse_dir: PathBuf,
    /// Directory relative plugin paths resolve under.
    pub plugin_dir: PathBuf,
    /// Preset store directory.
    pub preset_dir: PathBuf,
    /// Minimum seconds between impulse directory rescans.
    pub impulse_rescan_interval_secs: u64,
    /// Batch worker count; `None` uses the available parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Plugin hosting policy.
    pub plugins: PluginSettings,
    /// Output encoding.
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            impulse_dir: paths::default_impulse_dir(),
            plugin_dir: paths::default_plugin_dir(),
            preset_dir: paths::default_preset_dir(),
            impulse_rescan_interval_secs: 5,
            workers: None,
            plugins: PluginSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Settings {
    /// Parses and checks a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads and checks a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Finds the settings to use.
    ///
    /// Search order: `explicit`, then the `PEDALCHAIN_CONFIG` environment
    /// variable, then the default settings file. An explicit or environment
    /// path must exist; a missing default file yields built-in defaults.
    /// Returns the settings and the file they came from, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(paths::CONFIG_ENV_VAR).map(PathBuf::from));
        if let Some(path) = named {
            let settings = Self::load(&path)?;
            return Ok((settings, Some(path)));
        }

        let default = paths::default_settings_file();
        if default.is_file() {
            let settings = Self::load(&default)?;
            return Ok((settings, Some(default)));
        }
        debug!(path = %default.display(), "no settings file, using defaults");
        Ok((Self::default(), None))
    }

    /// Rejects values outside their accepted sets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(depth) = self.output.bit_depth
            && !SUPPORTED_BIT_DEPTHS.contains(&depth)
        {
            return Err(ConfigError::invalid(
                "output.bit_depth",
                format!("must be 16, 24 or 32, got {depth}"),
            ));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::invalid("workers", "must be at least 1"));
        }
        let timeout = self.plugins.max_init_timeout_secs;
        if !timeout.is_finite() || timeout <= 0.0 {
            return Err(ConfigError::invalid(
                "plugins.max_init_timeout_secs",
                format!("must be a positive number of seconds, got {timeout}"),
            ));
        }
        Ok(())
    }

    /// Serializes to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the settings file, creating its directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Rescan interval as a [`Duration`].
    pub fn rescan_interval(&self) -> Duration {
        Duration::from_secs(self.impulse_rescan_interval_secs)
    }

    /// Plugin load ceiling as a [`Duration`].
    pub fn max_init_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.plugins.max_init_timeout_secs).unwrap_or(Duration::MAX)
    }

    /// Batch worker count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}
