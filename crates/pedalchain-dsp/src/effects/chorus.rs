//! Modulated-delay chorus.

use crate::{
    Effect, InterpolatedDelay, Interpolation, Lfo, flush_denormal, ms_to_samples, wet_dry_mix,
};

/// Chorus: a short delay swept by a sine LFO around `centre_delay_ms`.
#[derive(Debug, Clone)]
pub struct Chorus {
    rate_hz: f32,
    depth: f32,
    centre_delay_ms: f32,
    feedback: f32,
    mix: f32,
    sample_rate: f32,
    lfo: Lfo,
    line: InterpolatedDelay,
    last_wet: f32,
}

impl Chorus {
    /// Creates a chorus.
    pub fn new(rate_hz: f32, depth: f32, centre_delay_ms: f32, feedback: f32, mix: f32) -> Self {
        let mut chorus = Self {
            rate_hz,
            depth,
            centre_delay_ms,
            feedback,
            mix,
            sample_rate: 48000.0,
            lfo: Lfo::new(48000.0, rate_hz),
            line: InterpolatedDelay::new(4),
            last_wet: 0.0,
        };
        chorus.set_sample_rate(48000.0);
        chorus
    }
}

impl Effect for Chorus {
    fn process(&mut self, input: f32) -> f32 {
        let sweep = 1.0 + 0.9 * self.depth * self.lfo.next();
        let delay = ms_to_samples(self.centre_delay_ms * sweep, self.sample_rate);
        self.line.write(input + self.last_wet * self.feedback);
        let wet = self.line.read(delay);
        self.last_wet = flush_denormal(wet);
        wet_dry_mix(input, wet, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo = Lfo::new(sample_rate, self.rate_hz);
        let max_ms = self.centre_delay_ms * 2.0;
        self.line = InterpolatedDelay::from_time(sample_rate, max_ms / 1000.0);
        self.line.set_interpolation(Interpolation::Cubic);
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.line.clear();
        self.last_wet = 0.0;
    }
}
