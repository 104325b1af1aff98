//! Low-frequency oscillator for modulation effects.

use core::f32::consts::PI;
use libm::sinf;

/// LFO waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoWaveform {
    /// Sine wave.
    #[default]
    Sine,
    /// Triangle wave.
    Triangle,
}

/// Phase-accumulator LFO producing values in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    increment: f32,
    frequency: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Lfo {
    /// Creates a sine LFO at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            increment: freq_hz / sample_rate,
            frequency: freq_hz,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Selects the waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Updates the sample rate, keeping the frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.increment = self.frequency / sample_rate;
    }

    /// Sets the starting phase in cycles (0 to 1).
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(1.0);
    }

    /// Rewinds to phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Returns the next bipolar value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let value = match self.waveform {
            LfoWaveform::Sine => sinf(2.0 * PI * self.phase),
            LfoWaveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
        };
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        value
    }

    /// Returns the next value mapped to `[0, 1]`.
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        (self.next() + 1.0) * 0.5
    }
}
