//! Impulse-response convolution by FFT overlap-add.
//!
//! The impulse response is resampled to the buffer's rate when the two
//! differ and normalized to unit energy per channel, so a single unit impulse
//! convolves to the identity. Output keeps the input's length; the tail past
//! the last input frame is dropped.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::resample::{Quality, resample_channel};
use crate::{AudioBuffer, Processor, wet_dry_mix};

const MIN_FFT_SIZE: usize = 1024;

struct FftConvolver {
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    fft_size: usize,
    block: usize,
}

impl FftConvolver {
    fn new(planner: &mut FftPlanner<f32>, kernel: &[f32]) -> Self {
        let taps = kernel.len().max(1);
        let fft_size = (2 * taps).next_power_of_two().max(MIN_FFT_SIZE);
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);

        let mut spectrum: Vec<Complex<f32>> = kernel
            .iter()
            .map(|&k| Complex::new(k, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(fft_size)
            .collect();
        fft.process(&mut spectrum);

        Self {
            fft,
            ifft,
            spectrum,
            fft_size,
            block: fft_size - taps + 1,
        }
    }

    fn convolve(&self, input: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; input.len()];
        let scale = 1.0 / self.fft_size as f32;
        let mut scratch = vec![Complex::new(0.0f32, 0.0); self.fft_size];

        for start in (0..input.len()).step_by(self.block) {
            let end = (start + self.block).min(input.len());
            scratch.fill(Complex::new(0.0, 0.0));
            for (slot, &x) in scratch.iter_mut().zip(&input[start..end]) {
                slot.re = x;
            }
            self.fft.process(&mut scratch);
            for (bin, h) in scratch.iter_mut().zip(&self.spectrum) {
                *bin = *bin * *h;
            }
            self.ifft.process(&mut scratch);
            for (o, y) in out[start..].iter_mut().zip(&scratch) {
                *o += y.re * scale;
            }
        }
        out
    }
}

/// Convolution reverb/cabinet processor.
#[derive(Debug, Clone)]
pub struct Convolution {
    impulse: AudioBuffer,
    mix: f32,
}

impl Convolution {
    /// Binds an impulse response and wet/dry mix.
    pub fn new(impulse: AudioBuffer, mix: f32) -> Self {
        Self { impulse, mix }
    }

    /// Impulse-response channels at `sample_rate`, each scaled to unit energy.
    fn kernels(&self, sample_rate: f32) -> Vec<Vec<f32>> {
        self.impulse
            .channels()
            .iter()
            .map(|channel| {
                let mut kernel = resample_channel(
                    channel,
                    self.impulse.sample_rate(),
                    sample_rate,
                    Quality::WindowedSinc,
                );
                let energy: f32 = kernel.iter().map(|k| k * k).sum();
                if energy > 1e-12 {
                    let gain = 1.0 / energy.sqrt();
                    kernel.iter_mut().for_each(|k| *k *= gain);
                }
                kernel
            })
            .collect()
    }
}

impl Processor for Convolution {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        let kernels = self.kernels(buffer.sample_rate());
        if kernels.is_empty() {
            return;
        }
        let mut planner = FftPlanner::new();
        let convolvers: Vec<FftConvolver> =
            kernels.iter().map(|k| FftConvolver::new(&mut planner, k)).collect();

        for (index, channel) in buffer.channels_mut().enumerate() {
            let wet = convolvers[index % convolvers.len()].convolve(channel);
            for (sample, w) in channel.iter_mut().zip(wet) {
                *sample = wet_dry_mix(*sample, w, self.mix);
            }
        }
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i % 97) as f32 / 97.0) - 0.5).collect()
    }

    #[test]
    fn unit_impulse_is_identity() {
        let ir = AudioBuffer::new(vec![vec![1.0, 0.0, 0.0]], 48000.0);
        let input = ramp(5000);
        let mut buffer = AudioBuffer::new(vec![input.clone()], 48000.0);
        Convolution::new(ir, 1.0).process(&mut buffer);
        for (a, b) in input.iter().zip(buffer.channel(0)) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn delayed_impulse_shifts_signal() {
        let mut taps = vec![0.0; 10];
        taps[9] = 1.0;
        let ir = AudioBuffer::new(vec![taps], 48000.0);
        let input = ramp(3000);
        let mut buffer = AudioBuffer::new(vec![input.clone()], 48000.0);
        Convolution::new(ir, 1.0).process(&mut buffer);
        assert_eq!(buffer.num_frames(), 3000);
        for i in 9..3000 {
            assert!((buffer.channel(0)[i] - input[i - 9]).abs() < 1e-4, "frame {i}");
        }
    }

    #[test]
    fn mono_ir_applies_to_every_channel() {
        let ir = AudioBuffer::new(vec![vec![0.5, 0.5]], 48000.0);
        let mut buffer = AudioBuffer::new(vec![ramp(100), ramp(100)], 48000.0);
        Convolution::new(ir, 1.0).process(&mut buffer);
        assert_eq!(buffer.channel(0), buffer.channel(1));
    }

    #[test]
    fn zero_mix_is_dry() {
        let ir = AudioBuffer::new(vec![vec![0.0, 1.0]], 48000.0);
        let input = ramp(64);
        let mut buffer = AudioBuffer::new(vec![input.clone()], 48000.0);
        Convolution::new(ir, 0.0).process(&mut buffer);
        assert_eq!(buffer.channel(0), input.as_slice());
    }
}
