//! Four-stage transistor ladder filter with selectable response.
//!
//! Each stage is a one-pole low-pass; the mode picks a weighted sum of the
//! saturated input and the four stage outputs. Resonance feeds the last stage
//! back into the input.

use crate::Effect;
use core::f32::consts::PI;
use libm::{expf, tanhf};

/// Ladder filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderMode {
    /// 12 dB/oct low-pass.
    #[default]
    Lpf12,
    /// 12 dB/oct high-pass.
    Hpf12,
    /// 12 dB/oct band-pass.
    Bpf12,
    /// 24 dB/oct low-pass.
    Lpf24,
    /// 24 dB/oct high-pass.
    Hpf24,
    /// 24 dB/oct band-pass.
    Bpf24,
}

impl LadderMode {
    /// Every mode, in catalog order.
    pub const ALL: [LadderMode; 6] = [
        LadderMode::Lpf12,
        LadderMode::Hpf12,
        LadderMode::Bpf12,
        LadderMode::Lpf24,
        LadderMode::Hpf24,
        LadderMode::Bpf24,
    ];

    /// Canonical name (`LPF12`, ...).
    pub fn name(self) -> &'static str {
        match self {
            LadderMode::Lpf12 => "LPF12",
            LadderMode::Hpf12 => "HPF12",
            LadderMode::Bpf12 => "BPF12",
            LadderMode::Lpf24 => "LPF24",
            LadderMode::Hpf24 => "HPF24",
            LadderMode::Bpf24 => "BPF24",
        }
    }

    /// Parses a canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Mixing weights over `[input, y1, y2, y3, y4]`.
    fn weights(self) -> [f32; 5] {
        match self {
            LadderMode::Lpf12 => [0.0, 0.0, 1.0, 0.0, 0.0],
            LadderMode::Hpf12 => [1.0, -2.0, 1.0, 0.0, 0.0],
            LadderMode::Bpf12 => [0.0, 2.0, -2.0, 0.0, 0.0],
            LadderMode::Lpf24 => [0.0, 0.0, 0.0, 0.0, 1.0],
            LadderMode::Hpf24 => [1.0, -4.0, 6.0, -4.0, 1.0],
            LadderMode::Bpf24 => [0.0, 0.0, 4.0, -8.0, 4.0],
        }
    }
}

/// Moog-style ladder filter.
#[derive(Debug, Clone)]
pub struct LadderFilter {
    mode: LadderMode,
    cutoff_hz: f32,
    resonance: f32,
    drive: f32,
    g: f32,
    stages: [f32; 4],
}

impl LadderFilter {
    /// Creates a ladder filter.
    pub fn new(mode: LadderMode, cutoff_hz: f32, resonance: f32, drive: f32) -> Self {
        let mut filter = Self {
            mode,
            cutoff_hz,
            resonance: resonance.clamp(0.0, 1.0),
            drive: drive.max(1.0),
            g: 0.0,
            stages: [0.0; 4],
        };
        filter.set_sample_rate(48000.0);
        filter
    }
}

impl Effect for LadderFilter {
    fn process(&mut self, input: f32) -> f32 {
        let feedback = self.resonance * 4.0 * self.stages[3];
        let u = tanhf(self.drive * input - feedback);
        let mut previous = u;
        for stage in &mut self.stages {
            *stage += self.g * (previous - *stage);
            *stage = crate::flush_denormal(*stage);
            previous = *stage;
        }
        let taps = [u, self.stages[0], self.stages[1], self.stages[2], self.stages[3]];
        self.mode
            .weights()
            .iter()
            .zip(taps)
            .map(|(w, y)| w * y)
            .sum()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * 0.45);
        self.g = 1.0 - expf(-2.0 * PI * cutoff / sample_rate);
    }

    fn reset(&mut self) {
        self.stages = [0.0; 4];
    }
}
