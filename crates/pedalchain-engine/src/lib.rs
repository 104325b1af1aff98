//! Effect chain construction and file processing for pedalchain.
//!
//! A request flows through four stages:
//!
//! 1. **Lookup**: each step's type is resolved in a registry snapshot
//! 2. **Validation**: its parameters are checked and defaults filled in
//! 3. **Instantiation**: a fresh effect is constructed ([`Instantiate`])
//! 4. **Processing**: the source is decoded, run through the chain in order,
//!    and encoded ([`pipeline::process`])
//!
//! The first failing step aborts the build with a [`ChainBuildError`] naming
//! its 1-based position. [`Engine`] wraps all of this behind the operations an
//! API layer needs, and every failure converts to an [`ErrorReport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use pedalchain_config::{EffectStepSpec, Settings};
//! use pedalchain_engine::{Engine, UnavailableLoader};
//!
//! let engine = Engine::new(Settings::default(), Arc::new(UnavailableLoader))?;
//! let chain = vec![
//!     EffectStepSpec::new("highpass").with_param("cutoff_frequency_hz", 300),
//!     EffectStepSpec::new("gsmfullratecompressor"),
//! ];
//! let (input, output) = (Path::new("voice.wav"), Path::new("out/voice.wav"));
//! let out = engine.build_and_run(input, &chain, None, output)?;
//! println!("wrote {}", out.display());
//! # Ok::<(), pedalchain_engine::EngineError>(())
//! ```

mod chain;
mod engine;
mod error;
mod instantiate;

/// Decode, apply and encode.
pub mod pipeline;

/// External plugin hosting seam.
pub mod plugin;

pub use chain::{ChainBuilder, ConstructedChain};
pub use engine::{BatchJob, Engine};
pub use error::{
    ChainBuildError, EngineError, ErrorKind, ErrorReport, InstantiationError, ProcessingError,
    StepError,
};
pub use instantiate::{ConstructedEffect, Instantiate, Instantiator, instantiate_native};
pub use plugin::{
    HostedPlugin, PluginLoadError, PluginLoadRequest, PluginLoader, PluginPolicy,
    UnavailableLoader, apply_overrides, load_with_timeout,
};
