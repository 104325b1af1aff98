//! Buffer processors for each native effect family.
//!
//! Mono effects implement [`Effect`](crate::Effect) and are lifted to buffers
//! with [`PerChannel`](crate::PerChannel); the rest implement
//! [`Processor`](crate::Processor) directly.

mod chorus;
mod clip;
mod convolution;
mod delay;
mod dynamics;
mod filter;
mod gain;
mod ladder;
mod lofi;
mod phaser;
mod pitch_shift;
mod resample;
mod reverb;

pub use chorus::Chorus;
pub use clip::{Bitcrush, Clipping, Distortion};
pub use convolution::Convolution;
pub use delay::{Delay, MAX_DELAY_SECONDS};
pub use dynamics::{Compressor, Limiter, NoiseGate};
pub use filter::{BiquadFilter, FilterShape};
pub use gain::{Gain, Invert};
pub use ladder::{LadderFilter, LadderMode};
pub use lofi::{GsmFullRateCompressor, Mp3Compressor};
pub use phaser::Phaser;
pub use pitch_shift::PitchShift;
pub use resample::Resample;
pub use reverb::{Reverb, ReverbSettings};
