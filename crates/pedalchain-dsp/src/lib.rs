//! Whole-file audio DSP for pedalchain.
//!
//! This crate is the signal-processing layer the effect chain runs on. It
//! knows nothing about parameter schemas or JSON; it exposes configured
//! processors that transform an [`AudioBuffer`] in place.
//!
//! ## Building blocks
//!
//! - [`Effect`]: mono, sample-at-a-time units
//! - [`Processor`]: whole-buffer operations, the unit an effect chain holds
//! - [`PerChannel`]: adapts an [`Effect`] into a [`Processor`]
//! - [`Biquad`], [`InterpolatedDelay`], [`CombFilter`], [`AllpassFilter`],
//!   [`EnvelopeFollower`], [`Lfo`]: primitives
//! - [`resample`]: sample-rate conversion at five qualities
//!
//! ## Example
//!
//! ```rust
//! use pedalchain_dsp::{AudioBuffer, PerChannel, Processor, effects::Gain};
//!
//! let mut buffer = AudioBuffer::new(vec![vec![0.5; 64]], 48000.0);
//! let mut gain = PerChannel::new(Gain::new(-6.0));
//! gain.process(&mut buffer);
//! assert!(buffer.peak() < 0.26);
//! ```

pub mod allpass;
pub mod biquad;
pub mod buffer;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod effects;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod resample;

pub use allpass::AllpassFilter;
pub use biquad::{Biquad, Coefficients};
pub use buffer::AudioBuffer;
pub use comb::CombFilter;
pub use delay::{InterpolatedDelay, Interpolation};
pub use effect::{Effect, PerChannel, Processor};
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{db_to_linear, flush_denormal, hard_clip, linear_to_db, ms_to_samples, wet_dry_mix};
pub use resample::Quality;
