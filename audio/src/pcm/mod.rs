//! Mono float32 PCM audio.
//!
//! # Key Types
//!
//! - [`Format`]: sample rate of a mono float32 stream
//! - [`AudioBuffer`]: an owned run of samples in a [`Format`]
//!
//! The wire encoding is raw little-endian float32 bytes, base64-encoded
//! with the standard padded alphabet. See [`encode_base64`] and
//! [`decode_base64`]; both are bit-exact.

mod buffer;
mod codec;
mod format;

pub use buffer::AudioBuffer;
pub use codec::{decode_base64, encode_base64, f32_from_le_bytes, f32_to_le_bytes};
pub use format::Format;
