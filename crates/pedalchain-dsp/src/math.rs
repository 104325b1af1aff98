//! Mathematical utility functions for DSP.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`hard_clip`] - Symmetric clipping at a threshold
//! - [`wet_dry_mix`] - Linear crossfade between dry and processed signal
//! - [`ms_to_samples`] - Time conversion
//! - [`flush_denormal`] - Zero out subnormal feedback values

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// ```rust
/// use pedalchain_dsp::db_to_linear;
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_linear(-6.0) - 0.501).abs() < 1e-3);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(db/20) = e^(db * ln(10) / 20)
    expf(db * core::f32::consts::LN_10 / 20.0)
}

/// Convert linear gain to decibels. Values at or below zero map to -200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-10 {
        return -200.0;
    }
    20.0 * logf(linear) / core::f32::consts::LN_10
}

/// Clip `x` symmetrically to `[-threshold, threshold]`.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Linear crossfade: `mix = 0` is fully dry, `mix = 1` fully wet.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * 0.001 * sample_rate
}

/// Flush subnormal values to zero.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip() {
        for db in [-60.0, -12.0, 0.0, 6.0, 24.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
    }

    #[test]
    fn silence_is_floor() {
        assert_eq!(linear_to_db(0.0), -200.0);
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(wet_dry_mix(1.0, -1.0, 0.0), 1.0);
        assert_eq!(wet_dry_mix(1.0, -1.0, 1.0), -1.0);
    }
}
