//! Sample-rate change as a chain step.

use crate::resample::{Quality, resample_channel};
use crate::{AudioBuffer, Processor};

/// Converts the buffer to a new sample rate. Downstream steps see the new rate.
#[derive(Debug, Clone)]
pub struct Resample {
    target_rate: f32,
    quality: Quality,
}

impl Resample {
    /// Creates a resampler to `target_rate` Hz.
    pub fn new(target_rate: f32, quality: Quality) -> Self {
        Self {
            target_rate: target_rate.round(),
            quality,
        }
    }
}

impl Processor for Resample {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        let from = buffer.sample_rate();
        let channels = buffer
            .channels()
            .iter()
            .map(|c| resample_channel(c, from, self.target_rate, self.quality))
            .collect();
        buffer.replace(channels, self.target_rate);
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_rate_and_length() {
        let mut buffer = AudioBuffer::silent(2, 48000, 48000.0);
        Resample::new(8000.0, Quality::Linear).process(&mut buffer);
        assert_eq!(buffer.sample_rate(), 8000.0);
        assert_eq!(buffer.num_frames(), 8000);
        assert_eq!(buffer.num_channels(), 2);
    }
}
