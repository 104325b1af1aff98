//! Four-stage allpass phaser.

use crate::{Effect, Lfo, flush_denormal, wet_dry_mix};
use core::f32::consts::PI;
use libm::{exp2f, tanf};

const STAGES: usize = 4;
/// Sweep range in octaves either side of the centre at full depth.
const SWEEP_OCTAVES: f32 = 2.0;

/// Phaser: cascaded first-order allpasses with an LFO-swept break frequency.
#[derive(Debug, Clone)]
pub struct Phaser {
    rate_hz: f32,
    depth: f32,
    centre_hz: f32,
    feedback: f32,
    mix: f32,
    sample_rate: f32,
    lfo: Lfo,
    x1: [f32; STAGES],
    y1: [f32; STAGES],
    last: f32,
}

impl Phaser {
    /// Creates a phaser.
    pub fn new(
        rate_hz: f32,
        depth: f32,
        centre_frequency_hz: f32,
        feedback: f32,
        mix: f32,
    ) -> Self {
        Self {
            rate_hz,
            depth,
            centre_hz: centre_frequency_hz,
            feedback,
            mix,
            sample_rate: 48000.0,
            lfo: Lfo::new(48000.0, rate_hz),
            x1: [0.0; STAGES],
            y1: [0.0; STAGES],
            last: 0.0,
        }
    }
}

impl Effect for Phaser {
    fn process(&mut self, input: f32) -> f32 {
        let freq = (self.centre_hz * exp2f(SWEEP_OCTAVES * self.depth * self.lfo.next()))
            .clamp(20.0, self.sample_rate * 0.45);
        let t = tanf(PI * freq / self.sample_rate);
        let a = (t - 1.0) / (t + 1.0);

        let mut x = input + self.last * self.feedback;
        for (x1, y1) in self.x1.iter_mut().zip(self.y1.iter_mut()) {
            let y = a * x + *x1 - a * *y1;
            *x1 = x;
            *y1 = flush_denormal(y);
            x = y;
        }
        self.last = x;
        wet_dry_mix(input, x, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.x1 = [0.0; STAGES];
        self.y1 = [0.0; STAGES];
        self.last = 0.0;
    }
}
