//! Container decoding.

use std::io::{Cursor, ErrorKind};
use std::path::Path;

use pedalchain_dsp::AudioBuffer;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::wav::decode_wav;
use crate::{AudioFormat, Error, Result, WavEncoding};

/// Decoded audio plus what is known about its source layout.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Planar samples at the source's native rate and channel count.
    pub buffer: AudioBuffer,
    /// Container the audio came from, when known.
    pub format: Option<AudioFormat>,
    /// Exact sample layout, for WAV sources.
    pub wav: Option<WavEncoding>,
    /// Source bit depth, when the container records one.
    pub bits_per_sample: Option<u16>,
}

/// Decodes an in-memory audio file.
///
/// `format` is a hint; WAV hints go through `hound` first and fall back to
/// the general decoder for encodings `hound` does not handle.
pub fn decode(bytes: &[u8], format: Option<AudioFormat>) -> Result<DecodedAudio> {
    if format == Some(AudioFormat::Wav) {
        match decode_wav(bytes) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => tracing::debug!(error = %err, "hound rejected WAV, probing"),
        }
    }
    decode_general(bytes, format)
}

/// Reads and decodes a file, inferring the format from its extension.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedAudio> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    decode(&bytes, AudioFormat::from_path(path))
}

fn decode_general(bytes: &[u8], format: Option<AudioFormat>) -> Result<DecodedAudio> {
    let mut hint = Hint::new();
    if let Some(format) = format {
        hint.with_extension(format.extension());
    }
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut reader = probed.format;
    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(Error::NoAudioTrack)?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());
    let bits_per_sample = track
        .codec_params
        .bits_per_sample
        .and_then(|bits| u16::try_from(bits).ok());

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    // Scratch buffer and the frame capacity it was sized for.
    let mut scratch: Option<(u64, SampleBuffer<f32>)> = None;
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = sample_rate.or(Some(spec.rate));
                channels = channels.or(Some(spec.channels.count()));
                let frames = decoded.capacity() as u64;
                if scratch.as_ref().is_none_or(|(cap, _)| *cap < frames) {
                    scratch = Some((frames, SampleBuffer::<f32>::new(frames, spec)));
                }
                if let Some((_, buf)) = scratch.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(buf.samples());
                }
            }
            Err(SymphoniaError::DecodeError(err)) => {
                tracing::warn!(error = err, "skipping undecodable packet");
            }
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        }
    }

    let sample_rate = sample_rate.ok_or(Error::NoAudioTrack)?;
    let channels = channels.unwrap_or(1);
    tracing::debug!(sample_rate, channels, samples = interleaved.len(), "decoded audio");
    Ok(DecodedAudio {
        buffer: AudioBuffer::from_interleaved(&interleaved, channels, sample_rate as f32),
        format,
        wav: None,
        bits_per_sample,
    })
}
