//! Audio I/O for pedalchain.
//!
//! This crate provides:
//!
//! - **Decoding**: [`decode`] turns container bytes into an [`AudioBuffer`].
//!   WAV goes through `hound` for bit-exact integer PCM; FLAC, MP3, Ogg Vorbis
//!   and M4A/AAC go through `symphonia`.
//! - **Encoding**: [`encode`] writes WAV (8/16/24/32-bit integer or 32-bit
//!   float, via [`encode_wav`]) and FLAC (16 or 24-bit, via `flacenc`).
//! - **Output**: [`write_atomic`] publishes a file only once it is complete.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pedalchain_io::{AudioFormat, decode, encode, write_atomic};
//!
//! let bytes = std::fs::read("input.wav")?;
//! let decoded = decode(&bytes, Some(AudioFormat::Wav))?;
//! let encoding = decoded.wav.unwrap_or_default();
//! let out = encode(&decoded.buffer, AudioFormat::Flac, encoding)?;
//! write_atomic("output.flac", &out)?;
//! ```
//!
//! [`AudioBuffer`]: pedalchain_dsp::AudioBuffer

mod decode;
mod encode;
mod flac;
mod format;
mod output;
mod wav;

pub use decode::{DecodedAudio, decode, decode_file};
pub use encode::encode;
pub use flac::encode_flac;
pub use format::{AudioFormat, SampleFormat, WavEncoding};
pub use output::write_atomic;
pub use wav::encode_wav;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV read/write error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Container probe or codec failure from the general decoder.
    #[error("decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// The encoder rejected the audio.
    #[error("encode error: {0}")]
    Encode(String),

    /// The container holds no decodable audio track.
    #[error("no audio track found")]
    NoAudioTrack,

    /// The requested container or sample layout cannot be produced.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
