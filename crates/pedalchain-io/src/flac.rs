//! FLAC encoding through `flacenc`.

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::error::Verify;
use pedalchain_dsp::AudioBuffer;

use crate::wav::quantize;
use crate::{Error, Result, WavEncoding};

/// Most channels a FLAC frame header can describe.
const MAX_CHANNELS: usize = 8;

/// FLAC stores integers only: layouts up to 16 bits become 16-bit, wider
/// ones (including 32-bit float) become 24-bit.
pub(crate) fn flac_bits(encoding: WavEncoding) -> u16 {
    if encoding.bits_per_sample <= 16 { 16 } else { 24 }
}

/// Encodes `buffer` as a FLAC stream in memory.
pub fn encode_flac(buffer: &AudioBuffer, encoding: WavEncoding) -> Result<Vec<u8>> {
    let channels = buffer.num_channels().max(1);
    if channels > MAX_CHANNELS {
        return Err(Error::UnsupportedFormat(format!("{channels}-channel FLAC")));
    }
    let bits = flac_bits(encoding);
    let sample_rate = buffer.sample_rate().round() as usize;
    let samples: Vec<i32> = buffer
        .to_interleaved()
        .into_iter()
        .map(|sample| quantize(sample, bits))
        .collect();

    let config = flacenc::config::Encoder::default()
        .into_verified()
        .map_err(|_| Error::Encode("invalid FLAC encoder configuration".to_string()))?;
    let source = flacenc::source::MemSource::from_samples(
        &samples,
        channels,
        usize::from(bits),
        sample_rate,
    );
    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|err| Error::Encode(format!("{err:?}")))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|err| Error::Encode(err.to_string()))?;
    tracing::debug!(channels, bits, sample_rate, bytes = sink.as_slice().len(), "encoded FLAC");
    Ok(sink.as_slice().to_vec())
}
