//! Freeverb stereo reverb.
//!
//! Eight parallel damped combs into four series allpasses per side, with the
//! right tank's delays offset by a fixed stereo spread. Channels are
//! processed in pairs; an odd final channel runs through a left tank alone.

use crate::{AllpassFilter, AudioBuffer, CombFilter, Processor};

/// Comb delay times at 44.1 kHz; mutually prime to avoid stacked resonances.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
/// Allpass delay times at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD_44K: usize = 23;
const REFERENCE_RATE: f32 = 44100.0;

const FIXED_GAIN: f32 = 0.015;
const SCALE_WET: f32 = 3.0;
const SCALE_DRY: f32 = 2.0;
const SCALE_DAMP: f32 = 0.4;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;

fn scaled(samples: usize, sample_rate: f32) -> usize {
    ((samples as f32 * sample_rate / REFERENCE_RATE) as usize).max(1)
}

/// Reverb parameters, all normalized 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    /// Comb feedback amount.
    pub room_size: f32,
    /// High-frequency absorption.
    pub damping: f32,
    /// Reverberant level.
    pub wet_level: f32,
    /// Direct level.
    pub dry_level: f32,
    /// Stereo width of the tail.
    pub width: f32,
    /// At 0.5 and above the tail sustains indefinitely and input is muted into it.
    pub freeze_mode: f32,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
            freeze_mode: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Tank {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl Tank {
    fn new(sample_rate: f32, spread: usize, feedback: f32, damp: f32) -> Self {
        let combs = COMB_TUNINGS_44K
            .iter()
            .map(|&t| {
                let mut comb = CombFilter::new(scaled(t + spread, sample_rate));
                comb.set_feedback(feedback);
                comb.set_damp(damp);
                comb
            })
            .collect();
        let allpasses = ALLPASS_TUNINGS_44K
            .iter()
            .map(|&t| {
                let mut allpass = AllpassFilter::new(scaled(t + spread, sample_rate));
                allpass.set_feedback(0.5);
                allpass
            })
            .collect();
        Self { combs, allpasses }
    }

    fn process(&mut self, input: f32) -> f32 {
        let mut out: f32 = self.combs.iter_mut().map(|c| c.process(input)).sum();
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn clear(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::clear);
        self.allpasses.iter_mut().for_each(AllpassFilter::clear);
    }
}

/// Freeverb processor.
#[derive(Debug, Clone)]
pub struct Reverb {
    settings: ReverbSettings,
    tanks: Vec<(Tank, Tank)>,
    sample_rate: f32,
}

impl Reverb {
    /// Creates a reverb.
    pub fn new(settings: ReverbSettings) -> Self {
        Self {
            settings,
            tanks: Vec::new(),
            sample_rate: 0.0,
        }
    }

    fn frozen(&self) -> bool {
        self.settings.freeze_mode >= 0.5
    }

    fn prepare(&mut self, pairs: usize, sample_rate: f32) {
        if self.tanks.len() == pairs && self.sample_rate == sample_rate {
            return;
        }
        let (feedback, damp) = if self.frozen() {
            (1.0, 0.0)
        } else {
            (
                self.settings.room_size * SCALE_ROOM + OFFSET_ROOM,
                self.settings.damping * SCALE_DAMP,
            )
        };
        let spread = STEREO_SPREAD_44K;
        self.tanks = (0..pairs)
            .map(|_| {
                (
                    Tank::new(sample_rate, 0, feedback, damp),
                    Tank::new(sample_rate, spread, feedback, damp),
                )
            })
            .collect();
        self.sample_rate = sample_rate;
    }
}

impl Processor for Reverb {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.num_channels();
        self.prepare(channels.div_ceil(2), buffer.sample_rate());

        let s = self.settings;
        let wet = s.wet_level * SCALE_WET;
        let dry = s.dry_level * SCALE_DRY;
        let wet1 = wet * (s.width / 2.0 + 0.5);
        let wet2 = wet * ((1.0 - s.width) / 2.0);
        let input_gain = if self.frozen() { 0.0 } else { FIXED_GAIN };

        for (pair, (left_tank, right_tank)) in self.tanks.iter_mut().enumerate() {
            let l = pair * 2;
            if l + 1 < channels {
                for i in 0..buffer.num_frames() {
                    let (in_l, in_r) = (buffer.channel(l)[i], buffer.channel(l + 1)[i]);
                    let feed = (in_l + in_r) * input_gain;
                    let out_l = left_tank.process(feed);
                    let out_r = right_tank.process(feed);
                    buffer.channel_mut(l)[i] = out_l * wet1 + out_r * wet2 + in_l * dry;
                    buffer.channel_mut(l + 1)[i] = out_r * wet1 + out_l * wet2 + in_r * dry;
                }
            } else {
                for sample in buffer.channel_mut(l) {
                    let out = left_tank.process(*sample * input_gain);
                    *sample = out * (wet1 + wet2) + *sample * dry;
                }
            }
        }
    }

    fn reset(&mut self) {
        for (left, right) in &mut self.tanks {
            left.clear();
            right.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(channels: usize, frames: usize) -> AudioBuffer {
        let mut buffer = AudioBuffer::silent(channels, frames, 44100.0);
        for c in 0..channels {
            buffer.channel_mut(c)[0] = 1.0;
        }
        buffer
    }

    #[test]
    fn produces_a_tail() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        let mut buffer = impulse(2, 44100);
        reverb.process(&mut buffer);
        let tail: f32 = buffer.channel(0)[4000..].iter().map(|s| s.abs()).sum();
        assert!(tail > 0.0);
    }

    #[test]
    fn dry_only_scales_input() {
        let settings = ReverbSettings {
            wet_level: 0.0,
            dry_level: 0.5,
            ..ReverbSettings::default()
        };
        let mut reverb = Reverb::new(settings);
        let mut buffer = impulse(1, 128);
        reverb.process(&mut buffer);
        assert_eq!(buffer.channel(0)[0], 1.0);
        assert!(buffer.channel(0)[1..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn frozen_tank_ignores_new_input() {
        let settings = ReverbSettings {
            freeze_mode: 1.0,
            dry_level: 0.0,
            ..ReverbSettings::default()
        };
        let mut reverb = Reverb::new(settings);
        let mut buffer = impulse(2, 2048);
        reverb.process(&mut buffer);
        assert!(buffer.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn handles_odd_channel_counts() {
        let mut reverb = Reverb::new(ReverbSettings::default());
        let mut buffer = impulse(3, 8192);
        reverb.process(&mut buffer);
        assert!(buffer.channels().iter().flatten().all(|s| s.is_finite()));
    }
}
