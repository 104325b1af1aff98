//! Planar multi-channel audio buffer.
//!
//! [`AudioBuffer`] is the unit every [`Processor`](crate::Processor) works on:
//! one sample vector per channel, all of equal length, plus the sample rate
//! those samples were captured at. Processors may change the sample rate
//! (resampling) but must keep the channel lengths equal.

/// Planar audio samples with their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: f32,
}

impl AudioBuffer {
    /// Creates a buffer from planar channel data.
    ///
    /// Channels longer than the shortest one are truncated so every channel
    /// has the same frame count.
    pub fn new(mut channels: Vec<Vec<f32>>, sample_rate: f32) -> Self {
        let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
        for channel in &mut channels {
            channel.truncate(frames);
        }
        Self {
            channels,
            sample_rate,
        }
    }

    /// Creates a buffer of silence.
    pub fn silent(num_channels: usize, num_frames: usize, sample_rate: f32) -> Self {
        Self {
            channels: vec![vec![0.0; num_frames]; num_channels],
            sample_rate,
        }
    }

    /// De-interleaves `samples` (frame-major) into a planar buffer.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], num_channels: usize, sample_rate: f32) -> Self {
        let num_channels = num_channels.max(1);
        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self {
            channels,
            sample_rate,
        }
    }

    /// Interleaves the buffer into frame-major order.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let frames = self.num_frames();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.num_frames() as f32 / self.sample_rate
        } else {
            0.0
        }
    }

    /// Returns `true` if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Borrow one channel.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Mutably borrow one channel.
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Borrow all channels.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutably borrow all channels. Lengths are fixed; use
    /// [`replace`](Self::replace) to change the frame count.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Replaces the contents, e.g. after resampling.
    pub fn replace(&mut self, channels: Vec<Vec<f32>>, sample_rate: f32) {
        *self = Self::new(channels, sample_rate);
    }

    /// Absolute peak across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_round_trip() {
        let interleaved = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 48000.0);
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.num_frames(), 3);
        assert_eq!(buffer.channel(1), &[-0.1, -0.2, -0.3]);
        assert_eq!(buffer.to_interleaved(), interleaved);
    }

    #[test]
    fn new_truncates_ragged_channels() {
        let buffer = AudioBuffer::new(vec![vec![1.0; 4], vec![1.0; 3]], 44100.0);
        assert_eq!(buffer.num_frames(), 3);
        assert_eq!(buffer.channel(0).len(), 3);
    }

    #[test]
    fn partial_trailing_frame_dropped() {
        let buffer = AudioBuffer::from_interleaved(&[0.0, 1.0, 2.0], 2, 8000.0);
        assert_eq!(buffer.num_frames(), 1);
    }

    #[test]
    fn peak_and_duration() {
        let buffer = AudioBuffer::new(vec![vec![0.5, -0.75], vec![0.1, 0.2]], 2.0);
        assert_eq!(buffer.peak(), 0.75);
        assert_eq!(buffer.duration_secs(), 1.0);
    }
}
