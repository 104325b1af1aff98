//! Single-biquad filters: pass filters, shelves and peaking EQ.

use crate::biquad::{self, Biquad, Coefficients};
use crate::Effect;

const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Response shape of a [`BiquadFilter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterShape {
    /// Butterworth high-pass.
    Highpass,
    /// Butterworth low-pass.
    Lowpass,
    /// Low shelf with gain and Q.
    LowShelf {
        /// Shelf gain in dB.
        gain_db: f32,
        /// Shelf slope Q.
        q: f32,
    },
    /// High shelf with gain and Q.
    HighShelf {
        /// Shelf gain in dB.
        gain_db: f32,
        /// Shelf slope Q.
        q: f32,
    },
    /// Peaking bell with gain and Q.
    Peak {
        /// Bell gain in dB.
        gain_db: f32,
        /// Bandwidth Q.
        q: f32,
    },
}

/// Biquad filter whose coefficients follow the sample rate.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    shape: FilterShape,
    cutoff_hz: f32,
    biquad: Biquad,
}

impl BiquadFilter {
    /// Creates a filter of `shape` at `cutoff_hz`.
    pub fn new(shape: FilterShape, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            shape,
            cutoff_hz,
            biquad: Biquad::default(),
        };
        filter.set_sample_rate(48000.0);
        filter
    }

    fn design(&self, sample_rate: f32) -> Coefficients {
        let f = self.cutoff_hz;
        match self.shape {
            FilterShape::Highpass => biquad::highpass(f, BUTTERWORTH_Q, sample_rate),
            FilterShape::Lowpass => biquad::lowpass(f, BUTTERWORTH_Q, sample_rate),
            FilterShape::LowShelf { gain_db, q } => biquad::low_shelf(f, q, gain_db, sample_rate),
            FilterShape::HighShelf { gain_db, q } => biquad::high_shelf(f, q, gain_db, sample_rate),
            FilterShape::Peak { gain_db, q } => biquad::peaking(f, q, gain_db, sample_rate),
        }
    }
}

impl Effect for BiquadFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let coefficients = self.design(sample_rate);
        self.biquad.set_coefficients(coefficients);
    }

    fn reset(&mut self) {
        self.biquad.clear();
    }
}
