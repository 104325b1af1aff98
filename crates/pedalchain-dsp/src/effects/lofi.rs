//! Codec-character emulations.
//!
//! These reproduce the audible signature of lossy speech and music codecs
//! (band-limiting and coarse requantization) without running an encoder.

use crate::biquad::{self, Biquad};
use crate::resample::{Quality, resample_channel};
use crate::{AudioBuffer, Effect, Processor};
use libm::{exp2f, roundf};

/// Requantizes to `bits` of resolution.
fn quantize(x: f32, bits: f32) -> f32 {
    let scale = exp2f(bits - 1.0);
    roundf(x * scale) / scale
}

/// MP3-style band-limiting and requantization driven by VBR quality
/// (0 = best, 9.9 = worst).
#[derive(Debug, Clone)]
pub struct Mp3Compressor {
    cutoff_hz: f32,
    bits: f32,
    stages: [Biquad; 2],
}

impl Mp3Compressor {
    /// Creates the emulation for `vbr_quality`.
    pub fn new(vbr_quality: f32) -> Self {
        let q = vbr_quality.clamp(0.0, 10.0);
        let mut codec = Self {
            cutoff_hz: 19500.0 - q * 1100.0,
            bits: 16.0 - q * 0.8,
            stages: [Biquad::default(), Biquad::default()],
        };
        codec.set_sample_rate(48000.0);
        codec
    }
}

impl Effect for Mp3Compressor {
    fn process(&mut self, input: f32) -> f32 {
        let filtered = self.stages.iter_mut().fold(input, |x, s| s.process(x));
        quantize(filtered, self.bits)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let coefficients = biquad::lowpass(self.cutoff_hz, 0.7071, sample_rate);
        for stage in &mut self.stages {
            stage.set_coefficients(coefficients);
        }
    }

    fn reset(&mut self) {
        self.stages.iter_mut().for_each(Biquad::clear);
    }
}

const GSM_RATE: f32 = 8000.0;
const GSM_BITS: f32 = 13.0;
const GSM_LOW_HZ: f32 = 200.0;
const GSM_HIGH_HZ: f32 = 3400.0;

/// GSM full-rate telephone character: a round trip through 8 kHz with
/// telephone band-limiting and 13-bit PCM in between.
#[derive(Debug, Clone)]
pub struct GsmFullRateCompressor {
    quality: Quality,
}

impl GsmFullRateCompressor {
    /// Creates the emulation; `quality` picks both resampling stages.
    pub fn new(quality: Quality) -> Self {
        Self { quality }
    }
}

impl Processor for GsmFullRateCompressor {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        let rate = buffer.sample_rate();
        let frames = buffer.num_frames();
        let channels = buffer
            .channels()
            .iter()
            .map(|channel| {
                let mut narrow = resample_channel(channel, rate, GSM_RATE, self.quality);
                let mut high = Biquad::new(biquad::highpass(GSM_LOW_HZ, 0.7071, GSM_RATE));
                let mut low = Biquad::new(biquad::lowpass(GSM_HIGH_HZ, 0.7071, GSM_RATE));
                for sample in &mut narrow {
                    *sample = quantize(low.process(high.process(*sample)), GSM_BITS);
                }
                let mut restored = resample_channel(&narrow, GSM_RATE, rate, self.quality);
                restored.resize(frames, 0.0);
                restored
            })
            .collect();
        buffer.replace(channels, rate);
    }

    fn reset(&mut self) {}
}
