//! Effect type registry for pedalchain.
//!
//! The registry maps effect identifiers (case-insensitive, with aliases) to
//! [`EffectTypeDescriptor`]s: display metadata, an ordered parameter schema and
//! the construction family the engine dispatches on.
//!
//! The convolution entry lists the impulse-response files found in a
//! configured directory. The external plugin host entry is gated by a
//! deployment flag; when switched off its identifiers still resolve to a
//! [`LookupError::Disabled`] so callers can tell "unavailable" from "typo".
//!
//! # Example
//!
//! ```rust
//! use pedalchain_registry::Catalog;
//!
//! let catalog = Catalog::new(vec!["hall.wav".into()], false);
//! let reverb = catalog.lookup("Reverb").unwrap();
//! assert_eq!(reverb.param_spec("room_size").unwrap().max, Some(1.0));
//! assert!(catalog.lookup("vst3").is_err());
//! ```

pub mod builtin;
pub mod catalog;
pub mod descriptor;
pub mod impulses;
pub mod registry;
pub mod schema;

pub use builtin::{CONVOLUTION_TYPE_ID, PLUGIN_HOST_TYPE_ID};
pub use catalog::{Catalog, LookupError, SchemaDefect};
pub use descriptor::{EffectFamily, EffectTypeDescriptor, NativeEffect};
pub use impulses::{IMPULSE_EXTENSIONS, scan_impulse_dir};
pub use registry::{EffectRegistry, RegistryOptions};
pub use schema::{ParamKind, ParamSpec, ParamValue};
