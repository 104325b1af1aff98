//! Validation, presets and settings for pedalchain.
//!
//! - **Validation**: [`validate`] checks a raw parameter mapping against an
//!   effect type's schema and returns typed [`ValidatedParams`]
//! - **Chains**: [`EffectStepSpec`] is the untrusted `{type, params}` unit
//! - **Presets**: [`PresetStore`] persists named chains as JSON documents
//! - **Settings**: [`Settings`] is the deployment's TOML configuration
//!
//! # Example
//!
//! ```rust
//! use pedalchain_config::{validate, parse_chain};
//! use pedalchain_registry::Catalog;
//!
//! let catalog = Catalog::new(Vec::new(), false);
//! let chain = parse_chain(r#"[{"type": "chorus", "params": {"depth": 1.5}}]"#).unwrap();
//! let chorus = catalog.lookup(&chain[0].type_id).unwrap();
//! let err = validate(chorus, &chain[0].params).unwrap_err();
//! assert_eq!(err.to_string(), "depth must be between 0 and 1, got 1.5");
//! ```

mod chain;
mod error;

/// Platform-specific default locations.
pub mod paths;

/// Preset documents and storage.
pub mod preset;

/// Deployment settings.
pub mod settings;

/// Parameter validation.
pub mod validation;

pub use chain::{EffectChainSpec, EffectStepSpec, parse_chain};
pub use error::ConfigError;
pub use preset::{Preset, PresetError, PresetStore, PresetSummary, SCHEMA_VERSION};
pub use settings::{OutputSettings, PluginSettings, Settings};
pub use validation::{ParamError, ValidatedParams, validate};
