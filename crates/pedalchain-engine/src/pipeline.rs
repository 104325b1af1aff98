//! Decode, apply, encode.

use pedalchain_io::{AudioFormat, WavEncoding, decode, encode};
use tracing::debug;

use crate::chain::ConstructedChain;
use crate::error::ProcessingError;

/// Processes one in-memory audio file through `chain`.
///
/// The output container is `target` if given, else the source's. WAV and
/// FLAC can be written. Bit depth is `bit_depth` if given, else the source's
/// own layout, else 16-bit.
pub fn process(
    source: &[u8],
    source_format: Option<AudioFormat>,
    chain: &mut ConstructedChain,
    target: Option<AudioFormat>,
    bit_depth: Option<u16>,
) -> Result<Vec<u8>, ProcessingError> {
    let decoded = decode(source, source_format).map_err(ProcessingError::Decode)?;
    let detected = source_format.or(decoded.format);
    let mut buffer = decoded.buffer;
    debug!(
        format = ?detected,
        channels = buffer.num_channels(),
        frames = buffer.num_frames(),
        sample_rate = buffer.sample_rate(),
        "decoded source"
    );

    chain.apply(&mut buffer);

    let output_format = match target.or(detected) {
        Some(format) if format.is_encodable() => format,
        Some(format) => return Err(ProcessingError::unsupported_target(format.extension())),
        None => return Err(ProcessingError::unsupported_target("unknown")),
    };
    let encoding = bit_depth
        .map(WavEncoding::for_bit_depth)
        .or(decoded.wav)
        .or(decoded.bits_per_sample.map(integer_layout))
        .unwrap_or_default();
    let bytes = encode(&buffer, output_format, encoding).map_err(ProcessingError::Encode)?;
    debug!(
        format = %output_format,
        bits = encoding.bits_per_sample,
        sample_rate = buffer.sample_rate(),
        bytes = bytes.len(),
        "encoded output"
    );
    Ok(bytes)
}

/// Integer layout nearest a non-WAV source's depth.
fn integer_layout(bits: u16) -> WavEncoding {
    WavEncoding::for_bit_depth(if bits <= 16 { 16 } else { 24 })
}
