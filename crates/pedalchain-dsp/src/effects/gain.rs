//! Level and polarity.

use crate::{Effect, db_to_linear};

/// Static gain in decibels.
#[derive(Debug, Clone)]
pub struct Gain {
    gain: f32,
}

impl Gain {
    /// Creates a gain stage of `gain_db`.
    pub fn new(gain_db: f32) -> Self {
        Self {
            gain: db_to_linear(gain_db),
        }
    }
}

impl Effect for Gain {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        input * self.gain
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

/// Polarity inversion.
#[derive(Debug, Clone, Default)]
pub struct Invert;

impl Effect for Invert {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        -input
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_db_is_unity() {
        assert_eq!(Gain::new(0.0).process(0.3), 0.3);
    }

    #[test]
    fn six_db_roughly_doubles() {
        let out = Gain::new(6.0).process(0.25);
        assert!((out - 0.499).abs() < 1e-2);
    }

    #[test]
    fn invert_flips_sign() {
        assert_eq!(Invert.process(0.5), -0.5);
    }
}
