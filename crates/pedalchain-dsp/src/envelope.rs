//! Peak envelope follower with separate attack and release.

use libm::expf;

/// Exponential attack/release peak detector.
///
/// ```rust
/// use pedalchain_dsp::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::with_times(48000.0, 1.0, 100.0);
/// let level = env.process(0.5);
/// assert!(level > 0.0 && level <= 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Creates a follower with explicit times. An attack of zero tracks peaks
    /// instantly.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: attack_ms.max(0.0),
            release_ms: release_ms.max(0.0),
        };
        follower.recalculate();
        follower
    }

    /// Updates the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Feeds one sample, returning the envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * level;
        self.envelope
    }

    /// Current level.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Resets to silence.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate(&mut self) {
        self.attack_coeff = time_coefficient(self.attack_ms, self.sample_rate);
        self.release_coeff = time_coefficient(self.release_ms, self.sample_rate);
    }
}

fn time_coefficient(ms: f32, sample_rate: f32) -> f32 {
    if ms <= 0.0 {
        0.0
    } else {
        expf(-1.0 / (ms * sample_rate / 1000.0))
    }
}
