//! Platform-specific default locations.
//!
//! - **Config**: `~/.config/pedalchain/` (Linux),
//!   `~/Library/Application Support/pedalchain/` (macOS), `%APPDATA%\pedalchain\` (Windows)
//! - **Data** (impulses, plugins): `~/.local/share/pedalchain/` (Linux),
//!   the same Application Support folder on macOS, `%APPDATA%\pedalchain\` on Windows

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "pedalchain";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "pedalchain.toml";

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "PEDALCHAIN_CONFIG";

/// Returns the user-specific configuration directory.
///
/// Falls back to `./pedalchain` if the platform directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific data directory.
pub fn user_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default settings file location.
pub fn default_settings_file() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE_NAME)
}

/// Default preset store directory.
pub fn default_preset_dir() -> PathBuf {
    user_config_dir().join("presets")
}

/// Default impulse-response directory.
pub fn default_impulse_dir() -> PathBuf {
    user_data_dir().join("impulses")
}

/// Default plugin directory.
pub fn default_plugin_dir() -> PathBuf {
    user_data_dir().join("plugins")
}

/// Creates `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }
    Ok(())
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_app_dirs() {
        assert!(default_settings_file().ends_with("pedalchain/pedalchain.toml"));
        assert!(default_preset_dir().ends_with("pedalchain/presets"));
        assert!(default_impulse_dir().ends_with("pedalchain/impulses"));
        assert!(default_plugin_dir().ends_with("pedalchain/plugins"));
    }

    #[test]
    fn expand_home_only_touches_tilde_prefix() {
        assert_eq!(expand_home("/opt/x.vst3"), PathBuf::from("/opt/x.vst3"));
        assert_eq!(expand_home("rel/x.vst3"), PathBuf::from("rel/x.vst3"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.vst3"), home.join("x.vst3"));
        }
    }

    #[test]
    fn ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
