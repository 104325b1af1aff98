//! Feedback echo.

use crate::{Effect, InterpolatedDelay, wet_dry_mix};

/// Longest supported echo time.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Single-tap feedback delay.
#[derive(Debug, Clone)]
pub struct Delay {
    delay_seconds: f32,
    feedback: f32,
    mix: f32,
    delay_samples: f32,
    line: InterpolatedDelay,
}

impl Delay {
    /// Creates a delay. `delay_seconds` is capped at [`MAX_DELAY_SECONDS`].
    pub fn new(delay_seconds: f32, feedback: f32, mix: f32) -> Self {
        let mut delay = Self {
            delay_seconds: delay_seconds.clamp(0.0, MAX_DELAY_SECONDS),
            feedback,
            mix,
            delay_samples: 0.0,
            line: InterpolatedDelay::new(4),
        };
        delay.set_sample_rate(48000.0);
        delay
    }
}

impl Effect for Delay {
    fn process(&mut self, input: f32) -> f32 {
        let delayed = if self.delay_samples < 1.0 {
            input
        } else {
            self.line.read(self.delay_samples - 1.0)
        };
        self.line.write(input + delayed * self.feedback);
        wet_dry_mix(input, delayed, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.delay_samples = self.delay_seconds * sample_rate;
        self.line = InterpolatedDelay::from_time(sample_rate, self.delay_seconds);
    }

    fn reset(&mut self) {
        self.line.clear();
    }
}
