//! Biquad (bi-quadratic) filter and RBJ cookbook coefficient designs.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Feedforward taps.
    pub b: [f32; 3],
    /// Feedback taps `a1`, `a2`.
    pub a: [f32; 2],
}

impl Coefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b: [1.0, 0.0, 0.0],
        a: [0.0, 0.0],
    };

    fn normalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let inv = 1.0 / a0;
        Self {
            b: [b0 * inv, b1 * inv, b2 * inv],
            a: [a1 * inv, a2 * inv],
        }
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Angular frequency and its sine/cosine, with the frequency clamped below
/// Nyquist so a design never goes unstable at low sample rates.
fn omega(frequency: f32, sample_rate: f32) -> (f32, f32) {
    let frequency = frequency.clamp(1.0, sample_rate * 0.49);
    let w = 2.0 * PI * frequency / sample_rate;
    (cosf(w), sinf(w))
}

/// Second-order low-pass.
pub fn lowpass(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);
    Coefficients::normalized(
        (1.0 - cos_w) / 2.0,
        1.0 - cos_w,
        (1.0 - cos_w) / 2.0,
        1.0 + alpha,
        -2.0 * cos_w,
        1.0 - alpha,
    )
}

/// Second-order high-pass.
pub fn highpass(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);
    Coefficients::normalized(
        (1.0 + cos_w) / 2.0,
        -(1.0 + cos_w),
        (1.0 + cos_w) / 2.0,
        1.0 + alpha,
        -2.0 * cos_w,
        1.0 - alpha,
    )
}

/// Band-pass with 0 dB peak gain.
pub fn bandpass(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);
    Coefficients::normalized(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
}

/// Peaking EQ: boost or cut of `gain_db` around `frequency`.
pub fn peaking(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);
    Coefficients::normalized(
        1.0 + alpha * a,
        -2.0 * cos_w,
        1.0 - alpha * a,
        1.0 + alpha / a,
        -2.0 * cos_w,
        1.0 - alpha / a,
    )
}

/// Low shelf: `gain_db` applied below `frequency`.
pub fn low_shelf(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);
    let k = 2.0 * sqrtf(a) * alpha;
    Coefficients::normalized(
        a * ((a + 1.0) - (a - 1.0) * cos_w + k),
        2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w),
        a * ((a + 1.0) - (a - 1.0) * cos_w - k),
        (a + 1.0) + (a - 1.0) * cos_w + k,
        -2.0 * ((a - 1.0) + (a + 1.0) * cos_w),
        (a + 1.0) + (a - 1.0) * cos_w - k,
    )
}

/// High shelf: `gain_db` applied above `frequency`.
pub fn high_shelf(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Coefficients {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_w, sin_w) = omega(frequency, sample_rate);
    let alpha = sin_w / (2.0 * q);
    let k = 2.0 * sqrtf(a) * alpha;
    Coefficients::normalized(
        a * ((a + 1.0) + (a - 1.0) * cos_w + k),
        -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w),
        a * ((a + 1.0) + (a - 1.0) * cos_w - k),
        (a + 1.0) - (a - 1.0) * cos_w + k,
        2.0 * ((a - 1.0) - (a + 1.0) * cos_w),
        (a + 1.0) - (a - 1.0) * cos_w - k,
    )
}

/// Direct Form I biquad.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coefficients: Coefficients,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a filter with the given coefficients and cleared state.
    pub fn new(coefficients: Coefficients) -> Self {
        Self {
            coefficients,
            ..Self::default()
        }
    }

    /// Swaps in new coefficients, keeping the filter history.
    pub fn set_coefficients(&mut self, coefficients: Coefficients) {
        self.coefficients = coefficients;
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let Coefficients { b, a } = self.coefficients;
        let output =
            b[0] * input + b[1] * self.x1 + b[2] * self.x2 - a[0] * self.y1 - a[1] * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::flush_denormal(output);
        output
    }

    /// Clears the delay lines.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
