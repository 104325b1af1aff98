//! Container and sample-layout identifiers.

use std::fmt;
use std::path::Path;

/// Audio container formats known to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// RIFF WAVE.
    Wav,
    /// Free Lossless Audio Codec.
    Flac,
    /// MPEG-1/2 Layer III.
    Mp3,
    /// Ogg Vorbis.
    Ogg,
    /// MPEG-4 audio (AAC).
    M4a,
}

impl AudioFormat {
    /// Every known format.
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Mp3,
        AudioFormat::Ogg,
        AudioFormat::M4a,
    ];

    /// Parses a format name or file extension, case-insensitively, with or
    /// without a leading dot.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_start_matches('.').to_ascii_lowercase();
        match name.as_str() {
            "wav" | "wave" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            "ogg" | "oga" => Some(AudioFormat::Ogg),
            "m4a" | "mp4" | "aac" => Some(AudioFormat::M4a),
            _ => None,
        }
    }

    /// Infers the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::M4a => "m4a",
        }
    }

    /// Whether this crate can write the format.
    pub fn is_encodable(self) -> bool {
        matches!(self, AudioFormat::Wav | AudioFormat::Flac)
    }

    /// Formats [`encode`](crate::encode) accepts, in declaration order.
    pub fn encodable() -> impl Iterator<Item = AudioFormat> {
        Self::ALL.into_iter().filter(|format| format.is_encodable())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Sample representation inside a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Linear PCM integers.
    Int,
    /// IEEE 754 floats.
    Float,
}

/// WAV sample layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavEncoding {
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Integer or float samples.
    pub sample_format: SampleFormat,
}

impl WavEncoding {
    /// 16-bit integer PCM.
    pub const PCM16: Self = Self {
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    /// Layout for a configured bit depth: 32 means float, anything else integer.
    pub fn for_bit_depth(bits: u16) -> Self {
        Self {
            bits_per_sample: bits,
            sample_format: if bits == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

impl Default for WavEncoding {
    fn default() -> Self {
        Self::PCM16
    }
}

impl From<hound::WavSpec> for WavEncoding {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.sample_format {
                hound::SampleFormat::Int => SampleFormat::Int,
                hound::SampleFormat::Float => SampleFormat::Float,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_extensions() {
        assert_eq!(AudioFormat::from_name("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_name(".flac"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_name("aiff"), None);
        for format in AudioFormat::ALL {
            assert_eq!(AudioFormat::from_name(format.extension()), Some(format));
        }
    }

    #[test]
    fn from_path_uses_extension() {
        assert_eq!(
            AudioFormat::from_path(Path::new("dir/take.Mp3")),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(AudioFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn wav_and_flac_are_encodable() {
        let encodable: Vec<_> = AudioFormat::encodable().collect();
        assert_eq!(encodable, [AudioFormat::Wav, AudioFormat::Flac]);
        assert!(!AudioFormat::Mp3.is_encodable());
        assert!(!AudioFormat::Ogg.is_encodable());
    }

    #[test]
    fn bit_depth_32_is_float() {
        assert_eq!(WavEncoding::for_bit_depth(32).sample_format, SampleFormat::Float);
        assert_eq!(WavEncoding::for_bit_depth(24).sample_format, SampleFormat::Int);
    }
}
