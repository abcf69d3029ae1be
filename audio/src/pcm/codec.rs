//! Raw float32 byte and base64 transport encodings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::format::SAMPLE_BYTES;
use crate::AudioError;

/// Converts samples to raw little-endian float32 bytes.
pub fn f32_to_le_bytes(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * SAMPLE_BYTES);
    for sample in samples {
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

/// Reads raw little-endian float32 bytes.
///
/// The bit pattern of every sample is preserved, NaN payloads included.
/// Returns [`AudioError::Misaligned`] if the length is not a multiple of 4.
pub fn f32_from_le_bytes(data: &[u8]) -> Result<Vec<f32>, AudioError> {
    if data.len() % SAMPLE_BYTES != 0 {
        return Err(AudioError::Misaligned(data.len()));
    }
    Ok(data
        .chunks_exact(SAMPLE_BYTES)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Encodes samples as base64 raw float32 bytes.
pub fn encode_base64(samples: &[f32]) -> String {
    STANDARD.encode(f32_to_le_bytes(samples))
}

/// Decodes base64 raw float32 bytes.
pub fn decode_base64(encoded: &str) -> Result<Vec<f32>, AudioError> {
    let data = STANDARD.decode(encoded)?;
    f32_from_le_bytes(&data)
}
