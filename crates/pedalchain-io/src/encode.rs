//! Container encoding.

use pedalchain_dsp::AudioBuffer;

use crate::flac::encode_flac;
use crate::wav::encode_wav;
use crate::{AudioFormat, Error, Result, WavEncoding};

/// Encodes `buffer` into `format` in memory.
///
/// `encoding` is the sample layout for WAV; FLAC takes its bit depth from
/// it, widening float to 24-bit integers. Formats without an encoder return
/// [`Error::UnsupportedFormat`].
pub fn encode(buffer: &AudioBuffer, format: AudioFormat, encoding: WavEncoding) -> Result<Vec<u8>> {
    match format {
        AudioFormat::Wav => encode_wav(buffer, encoding),
        AudioFormat::Flac => encode_flac(buffer, encoding),
        AudioFormat::Mp3 | AudioFormat::Ogg | AudioFormat::M4a => Err(Error::UnsupportedFormat(
            format!("no encoder for {format}"),
        )),
    }
}
