//! Property-based tests for pedalchain-dsp processors.
//!
//! Covers filter stability across the catalog's parameter ranges and the
//! length contract of sample-rate conversion.

use pedalchain_dsp::effects::{
    BiquadFilter, Chorus, Compressor, FilterShape, LadderFilter, LadderMode, Phaser,
};
use pedalchain_dsp::resample::resample_channel;
use pedalchain_dsp::{Effect, Quality};
use proptest::prelude::*;

fn shape(variant: usize, gain_db: f32, q: f32) -> FilterShape {
    match variant % 5 {
        0 => FilterShape::Highpass,
        1 => FilterShape::Lowpass,
        2 => FilterShape::LowShelf { gain_db, q },
        3 => FilterShape::HighShelf { gain_db, q },
        _ => FilterShape::Peak { gain_db, q },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any cutoff in the catalog range stays stable at any common rate,
    /// including cutoffs above the rate's Nyquist.
    #[test]
    fn biquad_filters_stay_finite(
        cutoff in 20.0f32..20000.0,
        gain_db in -60.0f32..60.0,
        q in 0.1f32..10.0,
        variant in 0usize..5,
        rate in prop::sample::select(vec![8000.0f32, 22050.0, 44100.0, 96000.0]),
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut filter = BiquadFilter::new(shape(variant, gain_db, q), cutoff);
        filter.set_sample_rate(rate);
        for x in input {
            let y = filter.process(x);
            prop_assert!(y.is_finite());
        }
    }

    #[test]
    fn ladder_stays_finite(
        mode in 0usize..6,
        cutoff in 20.0f32..20000.0,
        resonance in 0.0f32..=1.0,
        drive in 1.0f32..=10.0,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut filter = LadderFilter::new(LadderMode::ALL[mode], cutoff, resonance, drive);
        filter.set_sample_rate(44100.0);
        for x in input {
            prop_assert!(filter.process(x).is_finite());
        }
    }

    #[test]
    fn modulation_effects_stay_finite(
        rate_hz in 0.0f32..=10.0,
        depth in 0.0f32..=1.0,
        feedback in 0.0f32..=0.95,
        centre in 1.0f32..=50.0,
        input in prop::collection::vec(-1.0f32..=1.0, 512),
    ) {
        let mut chorus = Chorus::new(rate_hz, depth, centre, feedback, 0.5);
        let mut phaser = Phaser::new(rate_hz, depth, centre * 100.0, feedback, 0.5);
        for x in input {
            prop_assert!(chorus.process(x).is_finite());
            prop_assert!(phaser.process(x).is_finite());
        }
    }

    #[test]
    fn compressor_never_amplifies(
        threshold in -60.0f32..=0.0,
        ratio in 1.0f32..=20.0,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut comp = Compressor::new(threshold, ratio, 1.0, 100.0);
        for x in input {
            prop_assert!(comp.process(x).abs() <= x.abs() + 1e-6);
        }
    }

    /// Output length is `ceil(len * to / from)` for every quality.
    #[test]
    fn resample_length_contract(
        len in 1usize..2000,
        from in prop::sample::select(vec![8000u32, 22050, 44100, 48000]),
        to in prop::sample::select(vec![4000u32, 8000, 16000, 44100, 96000]),
        quality in 0usize..5,
    ) {
        let signal = vec![0.25f32; len];
        let out = resample_channel(&signal, from as f32, to as f32, Quality::ALL[quality]);
        let expected = if from == to { len } else { (len * to as usize).div_ceil(from as usize) };
        prop_assert_eq!(out.len(), expected);
    }
}
