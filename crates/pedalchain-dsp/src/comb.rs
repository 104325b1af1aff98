//! Feedback comb filter with one-pole damping, the Freeverb building block.

use crate::flush_denormal;

/// Comb filter with a low-pass in the feedback path.
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
    damp1: f32,
    damp2: f32,
    filterstore: f32,
}

impl CombFilter {
    /// Creates a comb with a fixed delay of `delay_samples`.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            feedback: 0.5,
            damp1: 0.5,
            damp2: 0.5,
            filterstore: 0.0,
        }
    }

    /// Feedback gain, 0 to 1. A value of 1 sustains indefinitely (freeze).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    /// High-frequency damping, 0 (bright) to 1 (dark).
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp.clamp(0.0, 1.0);
        self.damp2 = 1.0 - self.damp1;
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.filterstore = flush_denormal(output * self.damp2 + self.filterstore * self.damp1);
        self.buffer[self.index] = input + self.filterstore * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }

    /// Clears the delay line and damping state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filterstore = 0.0;
        self.index = 0;
    }
}
