//! Dynamics: compressor, limiter and noise gate.
//!
//! All three share the same detector, an [`EnvelopeFollower`] feeding a
//! static gain curve evaluated in dB.

use crate::{Effect, EnvelopeFollower, db_to_linear, hard_clip, linear_to_db};

/// Downward compressor with a hard knee.
#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f32,
    ratio: f32,
    envelope: EnvelopeFollower,
}

impl Compressor {
    /// Creates a compressor.
    pub fn new(threshold_db: f32, ratio: f32, attack_ms: f32, release_ms: f32) -> Self {
        Self {
            threshold_db,
            ratio: ratio.max(1.0),
            envelope: EnvelopeFollower::with_times(48000.0, attack_ms, release_ms),
        }
    }

    fn gain_reduction_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        if over > 0.0 {
            over * (1.0 / self.ratio - 1.0)
        } else {
            0.0
        }
    }
}

impl Effect for Compressor {
    fn process(&mut self, input: f32) -> f32 {
        let level_db = linear_to_db(self.envelope.process(input));
        input * db_to_linear(self.gain_reduction_db(level_db))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope.reset();
    }
}

const LIMITER_ATTACK_MS: f32 = 1.0;

/// Brickwall limiter: infinite-ratio gain reduction followed by a safety
/// clip at the threshold, so no sample exceeds it.
#[derive(Debug, Clone)]
pub struct Limiter {
    threshold: f32,
    envelope: EnvelopeFollower,
}

impl Limiter {
    /// Creates a limiter.
    pub fn new(threshold_db: f32, release_ms: f32) -> Self {
        Self {
            threshold: db_to_linear(threshold_db),
            envelope: EnvelopeFollower::with_times(48000.0, LIMITER_ATTACK_MS, release_ms),
        }
    }
}

impl Effect for Limiter {
    fn process(&mut self, input: f32) -> f32 {
        let level = self.envelope.process(input);
        let gain = if level > self.threshold {
            self.threshold / level
        } else {
            1.0
        };
        hard_clip(input * gain, self.threshold)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope.reset();
    }
}

/// Downward expander: signal below the threshold is attenuated by `ratio`.
#[derive(Debug, Clone)]
pub struct NoiseGate {
    threshold_db: f32,
    ratio: f32,
    envelope: EnvelopeFollower,
}

impl NoiseGate {
    /// Creates a gate.
    pub fn new(threshold_db: f32, ratio: f32, attack_ms: f32, release_ms: f32) -> Self {
        Self {
            threshold_db,
            ratio: ratio.max(1.0),
            envelope: EnvelopeFollower::with_times(48000.0, attack_ms, release_ms),
        }
    }
}

impl Effect for NoiseGate {
    fn process(&mut self, input: f32) -> f32 {
        let level_db = linear_to_db(self.envelope.process(input));
        let under = level_db - self.threshold_db;
        if under >= 0.0 {
            input
        } else {
            // Floor keeps the multiplier representable for silent input.
            let gain_db = (under * (self.ratio - 1.0)).max(-200.0);
            input * db_to_linear(gain_db)
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.envelope.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle<E: Effect>(effect: &mut E, level: f32) -> f32 {
        effect.set_sample_rate(48000.0);
        let mut y = 0.0;
        for _ in 0..48000 {
            y = effect.process(level);
        }
        y
    }

    #[test]
    fn unity_ratio_compressor_is_transparent() {
        let mut comp = Compressor::new(-30.0, 1.0, 1.0, 100.0);
        assert!((settle(&mut comp, 0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn compressor_reduces_loud_signal() {
        let mut comp = Compressor::new(-20.0, 4.0, 1.0, 100.0);
        let out_db = linear_to_db(settle(&mut comp, 1.0));
        // 20 dB over at 4:1 -> 5 dB over.
        assert!((out_db - (-15.0)).abs() < 0.5, "{out_db}");
    }

    #[test]
    fn limiter_never_exceeds_threshold() {
        let mut limiter = Limiter::new(-10.0, 100.0);
        limiter.set_sample_rate(48000.0);
        let ceiling = db_to_linear(-10.0);
        for i in 0..4800 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            assert!(limiter.process(x).abs() <= ceiling + 1e-6);
        }
    }

    #[test]
    fn gate_attenuates_quiet_signal() {
        let mut gate = NoiseGate::new(-40.0, 10.0, 1.0, 100.0);
        let quiet = db_to_linear(-60.0);
        assert!(settle(&mut gate, quiet) < quiet * 0.01);
    }

    #[test]
    fn gate_passes_loud_signal() {
        let mut gate = NoiseGate::new(-40.0, 10.0, 1.0, 100.0);
        assert!((settle(&mut gate, 0.5) - 0.5).abs() < 1e-4);
    }
}
