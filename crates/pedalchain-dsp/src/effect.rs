//! Effect and processor traits.
//!
//! Two levels of abstraction live here:
//!
//! - [`Effect`]: a mono, sample-at-a-time DSP unit. Filters, delays and
//!   dynamics are written against this trait.
//! - [`Processor`]: a whole-buffer operation. This is what an effect chain
//!   holds. Mono effects become processors through [`PerChannel`]; effects that
//!   need all channels at once (stereo reverb) or change the buffer shape
//!   (resampling, convolution tails) implement [`Processor`] directly.

use crate::AudioBuffer;

/// Mono sample-at-a-time audio effect.
///
/// # Example
///
/// ```rust
/// use pedalchain_dsp::Effect;
///
/// #[derive(Clone)]
/// struct Half;
///
/// impl Effect for Half {
///     fn process(&mut self, input: f32) -> f32 {
///         input * 0.5
///     }
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate and recompute any rate-dependent state.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without changing parameters.
    fn reset(&mut self);
}

/// Whole-buffer audio operation.
///
/// A processor owns whatever state it needs across calls; a fresh processor
/// is expected per independent piece of audio.
pub trait Processor: Send {
    /// Transform `buffer` in place. May change its sample rate or length.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clear internal state.
    fn reset(&mut self);
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        (**self).process(buffer);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Runs an independent copy of a mono [`Effect`] on each channel.
///
/// Lanes are cloned from the prototype on first use, and again whenever the
/// channel count or sample rate of the incoming buffer changes.
#[derive(Debug, Clone)]
pub struct PerChannel<E> {
    prototype: E,
    lanes: Vec<E>,
    sample_rate: Option<f32>,
}

impl<E: Effect + Clone> PerChannel<E> {
    /// Wraps a configured effect.
    pub fn new(prototype: E) -> Self {
        Self {
            prototype,
            lanes: Vec::new(),
            sample_rate: None,
        }
    }

    fn prepare(&mut self, num_channels: usize, sample_rate: f32) {
        if self.lanes.len() == num_channels && self.sample_rate == Some(sample_rate) {
            return;
        }
        let mut lane = self.prototype.clone();
        lane.set_sample_rate(sample_rate);
        lane.reset();
        self.lanes = vec![lane; num_channels];
        self.sample_rate = Some(sample_rate);
    }
}

impl<E: Effect + Clone + Send> Processor for PerChannel<E> {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.prepare(buffer.num_channels(), buffer.sample_rate());
        for (lane, channel) in self.lanes.iter_mut().zip(buffer.channels_mut()) {
            lane.process_block_inplace(channel);
        }
    }

    fn reset(&mut self) {
        for lane in &mut self.lanes {
            lane.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Counter {
        n: f32,
        rate: f32,
    }

    impl Effect for Counter {
        fn process(&mut self, _input: f32) -> f32 {
            self.n += 1.0;
            self.n
        }
        fn set_sample_rate(&mut self, sample_rate: f32) {
            self.rate = sample_rate;
        }
        fn reset(&mut self) {
            self.n = 0.0;
        }
    }

    #[test]
    fn per_channel_keeps_independent_state() {
        let mut proc = PerChannel::new(Counter::default());
        let mut buffer = AudioBuffer::silent(2, 3, 48000.0);
        proc.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.channel(1), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn per_channel_rebuilds_lanes_on_rate_change() {
        let mut proc = PerChannel::new(Counter::default());
        let mut buffer = AudioBuffer::silent(1, 2, 48000.0);
        proc.process(&mut buffer);
        assert_eq!(proc.lanes[0].rate, 48000.0);

        let mut buffer = AudioBuffer::silent(1, 2, 22050.0);
        proc.process(&mut buffer);
        assert_eq!(proc.lanes[0].rate, 22050.0);
        assert_eq!(buffer.channel(0), &[1.0, 2.0]);
    }

    #[test]
    fn boxed_processor_delegates() {
        let mut boxed: Box<dyn Processor> = Box::new(PerChannel::new(Counter::default()));
        let mut buffer = AudioBuffer::silent(1, 1, 48000.0);
        boxed.process(&mut buffer);
        assert_eq!(buffer.channel(0), &[1.0]);
    }
}
