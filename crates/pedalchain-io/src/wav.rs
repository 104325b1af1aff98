//! WAV reading and writing through `hound`.

use std::io::Cursor;

use hound::{WavReader, WavWriter};
use pedalchain_dsp::AudioBuffer;

use crate::{AudioFormat, DecodedAudio, Error, Result, SampleFormat, WavEncoding};

/// Integer full-scale for `bits`: samples map to `[-1, 1)` as `v / 2^(bits-1)`.
fn full_scale(bits: u16) -> f32 {
    (1u64 << (bits - 1)) as f32
}

/// Rounds a float sample to a `bits`-wide integer, clamped to its range.
pub(crate) fn quantize(sample: f32, bits: u16) -> i32 {
    let max_val = f64::from(full_scale(bits));
    (f64::from(sample) * max_val).round().clamp(-max_val, max_val - 1.0) as i32
}

pub(crate) fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels);

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(DecodedAudio {
        buffer: AudioBuffer::from_interleaved(&samples, channels, spec.sample_rate as f32),
        format: Some(AudioFormat::Wav),
        wav: Some(WavEncoding::from(spec)),
        bits_per_sample: Some(spec.bits_per_sample),
    })
}

/// Encodes `buffer` as a WAV file in memory.
///
/// Integer layouts clamp to the representable range; float is written as-is.
/// The sample rate is rounded to whole Hz.
pub fn encode_wav(buffer: &AudioBuffer, encoding: WavEncoding) -> Result<Vec<u8>> {
    let bits = encoding.bits_per_sample;
    let valid = match encoding.sample_format {
        SampleFormat::Float => bits == 32,
        SampleFormat::Int => matches!(bits, 8 | 16 | 24 | 32),
    };
    if !valid {
        return Err(Error::UnsupportedFormat(format!(
            "{bits}-bit {:?} WAV",
            encoding.sample_format
        )));
    }
    let channels = u16::try_from(buffer.num_channels().max(1))
        .map_err(|_| Error::UnsupportedFormat(format!("{} channels", buffer.num_channels())))?;

    let spec = hound::WavSpec {
        channels,
        sample_rate: buffer.sample_rate().round() as u32,
        bits_per_sample: bits,
        sample_format: match encoding.sample_format {
            SampleFormat::Int => hound::SampleFormat::Int,
            SampleFormat::Float => hound::SampleFormat::Float,
        },
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        let interleaved = buffer.to_interleaved();
        match encoding.sample_format {
            SampleFormat::Float => {
                for sample in interleaved {
                    writer.write_sample(sample)?;
                }
            }
            SampleFormat::Int => {
                for sample in interleaved {
                    writer.write_sample(quantize(sample, bits))?;
                }
            }
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
