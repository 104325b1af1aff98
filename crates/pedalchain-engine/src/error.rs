//! Error taxonomy for chain building, processing and the facade.

use std::path::PathBuf;
use std::time::Duration;

use pedalchain_config::{ConfigError, ParamError, PresetError};
use pedalchain_io::AudioFormat;
use pedalchain_registry::{LookupError, SchemaDefect};
use serde::Serialize;
use thiserror::Error;

/// Failure while constructing one effect from validated parameters.
#[derive(Debug, Error)]
pub enum InstantiationError {
    /// The impulse file is not one discovered by the registry scan, or it
    /// resolves outside the impulse directory.
    #[error("impulse response '{name}' not found")]
    ImpulseResponseNotFound {
        /// Name as supplied.
        name: String,
    },

    /// The impulse file exists but cannot be decoded.
    #[error("impulse response '{name}' could not be read: {source}")]
    ImpulseResponseUnreadable {
        /// File name.
        name: String,
        /// Decoder error.
        #[source]
        source: pedalchain_io::Error,
    },

    /// The plugin did not finish loading within the deadline.
    #[error("plugin '{path}' did not load within {timeout:?}")]
    PluginLoadTimeout {
        /// Resolved plugin path.
        path: PathBuf,
        /// Deadline that elapsed.
        timeout: Duration,
    },

    /// The plugin path was refused, the load failed, or an override was rejected.
    #[error("plugin load failed: {reason}")]
    PluginLoadFailure {
        /// What went wrong.
        reason: String,
    },

    /// A parameter the constructor needs is absent or has the wrong shape.
    #[error("parameter '{0}' has no usable value")]
    MissingValue(String),
}

impl InstantiationError {
    pub(crate) fn plugin_failure(reason: impl Into<String>) -> Self {
        InstantiationError::PluginLoadFailure {
            reason: reason.into(),
        }
    }
}

/// The underlying cause of a failed chain step.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step's type is unknown or disabled.
    #[error(transparent)]
    UnknownEffectType(#[from] LookupError),
    /// Parameter validation failed.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// Construction failed.
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),
}

/// First failure of a chain build, with its 1-based step position.
#[derive(Debug, Error)]
#[error("step {step} ({type_id}): {source}")]
pub struct ChainBuildError {
    /// 1-based position of the failing step.
    pub step: usize,
    /// Type identifier as written in the step.
    pub type_id: String,
    /// Cause.
    #[source]
    pub source: StepError,
}

/// Whole-request failure of the processing pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The source bytes are not decodable audio.
    #[error("could not decode source audio: {0}")]
    Decode(#[source] pedalchain_io::Error),

    /// The result cannot be written in the requested format.
    #[error("could not encode output: {0}")]
    Encode(#[source] pedalchain_io::Error),

    /// Reading the source or publishing the output failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: pedalchain_io::Error,
    },
}

impl ProcessingError {
    pub(crate) fn unsupported_target(name: &str) -> Self {
        let supported: Vec<_> = AudioFormat::encodable().map(AudioFormat::extension).collect();
        ProcessingError::Encode(pedalchain_io::Error::UnsupportedFormat(format!(
            "cannot encode to '{name}'; supported output: {}",
            supported.join(", ")
        )))
    }
}

/// Any failure surfaced by the [`Engine`](crate::Engine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Chain build failure.
    #[error(transparent)]
    Build(#[from] ChainBuildError),
    /// Decode, encode or file failure.
    #[error(transparent)]
    Processing(#[from] ProcessingError),
    /// Preset store failure.
    #[error(transparent)]
    Preset(#[from] PresetError),
    /// Settings or directory failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A built-in parameter default fails its own schema.
    #[error(transparent)]
    Registry(#[from] SchemaDefect),
}

/// Stable, serializable error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ErrorKind {
    UnknownEffectType,
    MissingRequiredParameter,
    TypeMismatch,
    OutOfRange,
    InvalidEnumValue,
    UnknownParameter,
    PluginLoadTimeout,
    PluginLoadFailure,
    ImpulseResponseNotFound,
    InstantiationError,
    DecodeError,
    EncodeError,
    IoError,
    MissingPresetName,
    InvalidPresetId,
    PresetNotFound,
    InvalidPreset,
    UnsupportedSchemaVersion,
    ConfigError,
    RegistryDefect,
}

impl ErrorKind {
    /// The snake_case name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnknownEffectType => "unknown_effect_type",
            ErrorKind::MissingRequiredParameter => "missing_required_parameter",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::InvalidEnumValue => "invalid_enum_value",
            ErrorKind::UnknownParameter => "unknown_parameter",
            ErrorKind::PluginLoadTimeout => "plugin_load_timeout",
            ErrorKind::PluginLoadFailure => "plugin_load_failure",
            ErrorKind::ImpulseResponseNotFound => "impulse_response_not_found",
            ErrorKind::InstantiationError => "instantiation_error",
            ErrorKind::DecodeError => "decode_error",
            ErrorKind::EncodeError => "encode_error",
            ErrorKind::IoError => "io_error",
            ErrorKind::MissingPresetName => "missing_preset_name",
            ErrorKind::InvalidPresetId => "invalid_preset_id",
            ErrorKind::PresetNotFound => "preset_not_found",
            ErrorKind::InvalidPreset => "invalid_preset",
            ErrorKind::UnsupportedSchemaVersion => "unsupported_schema_version",
            ErrorKind::ConfigError => "config_error",
            ErrorKind::RegistryDefect => "registry_defect",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StepError {
    /// Category of this cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StepError::UnknownEffectType(_) => ErrorKind::UnknownEffectType,
            StepError::Param(err) => match err {
                ParamError::UnknownParameter { .. } => ErrorKind::UnknownParameter,
                ParamError::MissingRequiredParameter { .. } => ErrorKind::MissingRequiredParameter,
                ParamError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                ParamError::OutOfRange { .. } => ErrorKind::OutOfRange,
                ParamError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            },
            StepError::Instantiation(err) => match err {
                InstantiationError::ImpulseResponseNotFound { .. } => {
                    ErrorKind::ImpulseResponseNotFound
                }
                InstantiationError::PluginLoadTimeout { .. } => ErrorKind::PluginLoadTimeout,
                InstantiationError::PluginLoadFailure { .. } => ErrorKind::PluginLoadFailure,
                InstantiationError::ImpulseResponseUnreadable { .. }
                | InstantiationError::MissingValue(_) => ErrorKind::InstantiationError,
            },
        }
    }
}

impl EngineError {
    /// Category for presentation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Build(err) => err.source.kind(),
            EngineError::Processing(ProcessingError::Decode(_)) => ErrorKind::DecodeError,
            EngineError::Processing(ProcessingError::Encode(_)) => ErrorKind::EncodeError,
            EngineError::Processing(ProcessingError::Io { .. }) => ErrorKind::IoError,
            EngineError::Preset(err) => match err {
                PresetError::MissingName => ErrorKind::MissingPresetName,
                PresetError::UnknownEffectType { .. } => ErrorKind::UnknownEffectType,
                PresetError::InvalidId(_) => ErrorKind::InvalidPresetId,
                PresetError::NotFound(_) => ErrorKind::PresetNotFound,
                PresetError::Parse { .. } => ErrorKind::InvalidPreset,
                PresetError::UnsupportedSchemaVersion { .. } => ErrorKind::UnsupportedSchemaVersion,
                PresetError::Io(_) => ErrorKind::IoError,
            },
            EngineError::Config(_) => ErrorKind::ConfigError,
            EngineError::Registry(_) => ErrorKind::RegistryDefect,
        }
    }

    /// 1-based step the error is attributed to, if any.
    pub fn step(&self) -> Option<usize> {
        match self {
            EngineError::Build(err) => Some(err.step),
            EngineError::Preset(PresetError::UnknownEffectType { step, .. }) => Some(*step),
            _ => None,
        }
    }

    /// Structured form for an outer API layer.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            step: self.step(),
            message: self.to_string(),
        }
    }
}

/// Kind, step and message of a failure, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Category.
    pub kind: ErrorKind,
    /// 1-based step, for step-attributable failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
    /// Human-readable message.
    pub message: String,
}
