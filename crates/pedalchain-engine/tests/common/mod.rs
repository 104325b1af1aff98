//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pedalchain_config::Settings;
use tempfile::TempDir;

/// Temporary deployment layout.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["impulses", "plugins", "presets"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            impulse_dir: self.path("impulses"),
            plugin_dir: self.path("plugins"),
            preset_dir: self.path("presets"),
            ..Settings::default()
        }
    }
}

/// Writes a 16-bit PCM WAV from interleaved samples.
pub fn write_wav(path: &Path, samples: &[i16], channels: u16, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// A stereo test signal: two detuned ramps, deterministic.
pub fn test_signal(frames: usize) -> Vec<i16> {
    (0..frames)
        .flat_map(|i| {
            let l = ((i * 37) % 2000) as i16 - 1000;
            let r = ((i * 53) % 3000) as i16 - 1500;
            [l * 8, r * 8]
        })
        .collect()
}

/// Reads a WAV's spec and integer samples.
pub fn read_wav(path: &Path) -> (hound::WavSpec, Vec<i32>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i32>().map(Result::unwrap).collect();
    (spec, samples)
}
