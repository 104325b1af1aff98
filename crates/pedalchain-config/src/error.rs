//! Error types for settings and chain documents.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading, writing or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings or preset file could not be read.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// File path.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// A settings or preset file could not be written or removed.
    #[error("cannot write {path}: {source}")]
    WriteFile {
        /// File path.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// A store directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Cause.
        #[source]
        source: std::io::Error,
    },

    /// Malformed settings file.
    #[error("settings file is not valid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be rendered.
    #[error("cannot render settings as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A chain document is not a list of `{type, params}` steps
    #[error("invalid chain document: {0}")]
    InvalidChain(#[from] serde_json::Error),

    /// A settings field holds a value outside its accepted set
    #[error("invalid setting '{field}': {reason}")]
    Invalid {
        /// Dotted field name, e.g. `output.bit_depth`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::Invalid`] naming `field`.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock")
    }

    #[test]
    fn io_variants_carry_path_and_source() {
        let cases = [
            (ConfigError::read_file("/a/b.toml", mock_io_err()), "cannot read"),
            (ConfigError::write_file("/a/b.toml", mock_io_err()), "cannot write"),
            (ConfigError::create_dir("/a/b.toml", mock_io_err()), "cannot create directory"),
        ];
        for (err, prefix) in cases {
            let msg = err.to_string();
            assert!(msg.starts_with(prefix), "got: {msg}");
            assert!(msg.contains("/a/b.toml"), "got: {msg}");
            assert!(err.source().is_some());
        }
    }

    #[test]
    fn invalid_names_field() {
        let err = ConfigError::invalid("output.bit_depth", "must be 16, 24 or 32, got 20");
        assert_eq!(
            err.to_string(),
            "invalid setting 'output.bit_depth': must be 16, 24 or 32, got 20"
        );
        assert!(err.source().is_none());
    }
}
