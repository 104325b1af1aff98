//! Waveshaping: hard clipping, tanh drive and bit reduction.

use crate::{Effect, db_to_linear, hard_clip};
use libm::{exp2f, roundf, tanhf};

/// Hard clipper at a threshold in dBFS.
#[derive(Debug, Clone)]
pub struct Clipping {
    threshold: f32,
}

impl Clipping {
    /// Creates a clipper at `threshold_db`.
    pub fn new(threshold_db: f32) -> Self {
        Self {
            threshold: db_to_linear(threshold_db),
        }
    }
}

impl Effect for Clipping {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        hard_clip(input, self.threshold)
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

/// `tanh` saturation after `drive_db` of gain.
#[derive(Debug, Clone)]
pub struct Distortion {
    drive: f32,
}

impl Distortion {
    /// Creates a distortion with `drive_db` of pre-gain.
    pub fn new(drive_db: f32) -> Self {
        Self {
            drive: db_to_linear(drive_db),
        }
    }
}

impl Effect for Distortion {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        tanhf(input * self.drive)
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

/// Amplitude quantizer. Fractional bit depths give intermediate step sizes.
#[derive(Debug, Clone)]
pub struct Bitcrush {
    scale: f32,
}

impl Bitcrush {
    /// Creates a quantizer with `bit_depth` bits of resolution.
    pub fn new(bit_depth: f32) -> Self {
        Self {
            scale: exp2f(bit_depth.max(1.0) - 1.0),
        }
    }
}

impl Effect for Bitcrush {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        roundf(input * self.scale) / self.scale
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}
