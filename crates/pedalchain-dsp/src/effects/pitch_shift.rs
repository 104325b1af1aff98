//! Delay-line pitch shifter.
//!
//! Two read taps sweep through a short window at a rate set by the pitch
//! ratio, half a window apart, and are crossfaded with a raised-cosine so
//! each tap is silent when it wraps.

use crate::{Effect, InterpolatedDelay};
use core::f32::consts::PI;
use libm::{cosf, exp2f};

const WINDOW_MS: f32 = 50.0;

/// Granular pitch shifter.
#[derive(Debug, Clone)]
pub struct PitchShift {
    ratio: f32,
    window: f32,
    phase: f32,
    line: InterpolatedDelay,
}

impl PitchShift {
    /// Creates a shifter transposing by `semitones`.
    pub fn new(semitones: f32) -> Self {
        let mut shifter = Self {
            ratio: exp2f(semitones / 12.0),
            window: 0.0,
            phase: 0.0,
            line: InterpolatedDelay::new(4),
        };
        shifter.set_sample_rate(48000.0);
        shifter
    }

    fn is_unity(&self) -> bool {
        (self.ratio - 1.0).abs() < 1e-6
    }

    fn tap(&self, phase: f32) -> f32 {
        let gain = 0.5 - 0.5 * cosf(2.0 * PI * phase);
        self.line.read(phase * self.window) * gain
    }
}

impl Effect for PitchShift {
    fn process(&mut self, input: f32) -> f32 {
        if self.is_unity() {
            return input;
        }
        self.line.write(input);
        let out = self.tap(self.phase) + self.tap((self.phase + 0.5).fract());
        self.phase = (self.phase + (1.0 - self.ratio) / self.window).rem_euclid(1.0);
        out
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.window = WINDOW_MS * 0.001 * sample_rate;
        self.line = InterpolatedDelay::new(self.window as usize + 4);
        self.phase = 0.0;
    }

    fn reset(&mut self) {
        self.line.clear();
        self.phase = 0.0;
    }
}
