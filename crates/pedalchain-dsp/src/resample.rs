//! Sample-rate conversion.
//!
//! Five interpolation qualities are offered. [`Quality::WindowedSinc`] is a
//! band-limited rational polyphase resampler: the rate pair is reduced by its
//! GCD to `P/Q`, a Blackman-windowed sinc prototype is designed at the lower of
//! the two Nyquist limits, and split into `P` sub-filters. The remaining
//! qualities are plain fractional-position interpolators with no anti-alias
//! filtering, cheaper and audibly rougher when downsampling.

use core::f32::consts::PI;
use libm::{cosf, sinf};

/// Zero crossings of the sinc kernel on each side, in units of the slower rate.
const SINC_HALF_WIDTH: usize = 16;

/// Resampling interpolation quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// Sample-and-hold.
    ZeroOrderHold,
    /// Two-point linear.
    Linear,
    /// Four-point Catmull-Rom spline.
    CatmullRom,
    /// Four-point third-order Lagrange.
    Lagrange,
    /// Band-limited windowed sinc.
    #[default]
    WindowedSinc,
}

impl Quality {
    /// Every quality, in catalog order.
    pub const ALL: [Quality; 5] = [
        Quality::ZeroOrderHold,
        Quality::Linear,
        Quality::CatmullRom,
        Quality::Lagrange,
        Quality::WindowedSinc,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Quality::ZeroOrderHold => "ZeroOrderHold",
            Quality::Linear => "Linear",
            Quality::CatmullRom => "CatmullRom",
            Quality::Lagrange => "Lagrange",
            Quality::WindowedSinc => "WindowedSinc",
        }
    }

    /// Parses a canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.name() == name)
    }
}

/// Designs a Blackman-windowed sinc low-pass with unity DC gain.
///
/// `cutoff` is normalized to Nyquist (0 to 1).
pub fn design_lowpass(num_taps: usize, cutoff: f32) -> Vec<f32> {
    if num_taps == 0 {
        return Vec::new();
    }
    let m = (num_taps - 1) as f32;
    let mut coeffs: Vec<f32> = (0..num_taps)
        .map(|n| {
            let x = n as f32 - m / 2.0;
            let sinc = if x.abs() < 1e-7 {
                cutoff
            } else {
                sinf(PI * cutoff * x) / (PI * x)
            };
            let window = if m == 0.0 {
                1.0
            } else {
                let phase = 2.0 * PI * n as f32 / m;
                0.42 - 0.5 * cosf(phase) + 0.08 * cosf(2.0 * phase)
            };
            sinc * window
        })
        .collect();

    let sum: f32 = coeffs.iter().sum();
    if sum.abs() > 1e-10 {
        for c in &mut coeffs {
            *c /= sum;
        }
    }
    coeffs
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Resamples one channel from `from_rate` to `to_rate` (both rounded to whole Hz).
///
/// Output length is `ceil(len * to / from)`. Identical rates return a copy.
pub fn resample_channel(
    signal: &[f32],
    from_rate: f32,
    to_rate: f32,
    quality: Quality,
) -> Vec<f32> {
    let from = from_rate.round().max(1.0) as usize;
    let to = to_rate.round().max(1.0) as usize;
    if from == to || signal.is_empty() {
        return signal.to_vec();
    }
    match quality {
        Quality::WindowedSinc => polyphase(signal, to, from),
        other => interpolate(signal, from, to, other),
    }
}

/// Rational polyphase resampling by `p/q` with group delay compensated.
fn polyphase(signal: &[f32], p: usize, q: usize) -> Vec<f32> {
    let g = gcd(p, q);
    let (p, q) = (p / g, q / g);

    let num_taps = 2 * SINC_HALF_WIDTH * p.max(q) + 1;
    let prototype = design_lowpass(num_taps, 0.95 / p.max(q) as f32);
    let taps_per_phase = num_taps.div_ceil(p);

    let mut phases = vec![vec![0.0f32; taps_per_phase]; p];
    for (index, &coeff) in prototype.iter().enumerate() {
        phases[index % p][index / p] = coeff * p as f32;
    }

    let delay = (num_taps - 1) / 2;
    let out_len = (signal.len() * p).div_ceil(q);
    let mut output = Vec::with_capacity(out_len);
    for m in 0..out_len {
        let upsampled = m * q + delay;
        let n = upsampled / p;
        let branch = &phases[upsampled % p];
        let mut acc = 0.0f32;
        for (i, &coeff) in branch.iter().enumerate() {
            if let Some(&x) = n.checked_sub(i).and_then(|idx| signal.get(idx)) {
                acc += coeff * x;
            }
        }
        output.push(acc);
    }
    output
}

fn interpolate(signal: &[f32], from: usize, to: usize, quality: Quality) -> Vec<f32> {
    let out_len = (signal.len() * to).div_ceil(from);
    let step = from as f64 / to as f64;
    let last = signal.len() as isize - 1;
    let at = |i: isize| signal[i.clamp(0, last) as usize];

    (0..out_len)
        .map(|m| {
            let pos = m as f64 * step;
            let i = pos.floor() as isize;
            let t = (pos - pos.floor()) as f32;
            let (y0, y1, y2, y3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
            match quality {
                Quality::ZeroOrderHold => y1,
                Quality::Linear => y1 + (y2 - y1) * t,
                Quality::CatmullRom => {
                    let a = -0.5 * y0 + 1.5 * y1 - 1.5 * y2 + 0.5 * y3;
                    let b = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
                    let c = -0.5 * y0 + 0.5 * y2;
                    ((a * t + b) * t + c) * t + y1
                }
                Quality::Lagrange | Quality::WindowedSinc => {
                    // Nodes at -1, 0, 1, 2.
                    let c0 = -t * (t - 1.0) * (t - 2.0) / 6.0;
                    let c1 = (t + 1.0) * (t - 1.0) * (t - 2.0) / 2.0;
                    let c2 = -(t + 1.0) * t * (t - 2.0) / 2.0;
                    let c3 = (t + 1.0) * t * (t - 1.0) / 6.0;
                    c0 * y0 + c1 * y1 + c2 * y2 + c3 * y3
                }
            }
        })
        .collect()
}
