//! Audio buffers and transport encodings for the XTTS voice service.
//!
//! This crate provides:
//!
//! - `pcm`: mono float32 [`AudioBuffer`]s, their [`Format`], and the raw
//!   little-endian byte and base64 transport encodings used on the wire
//! - `wav`: 16-bit mono WAV output for playable files
//! - `sine`: synthetic test tones
//!
//! # Example
//!
//! ```rust
//! use xtts_audio::pcm::{AudioBuffer, Format};
//! use xtts_audio::sine::sine_wave;
//!
//! // 4 seconds of a 220 Hz tone at 16kHz
//! let tone = sine_wave(Format::MONO_16K, 220.0, 0.5, 4.0);
//! assert_eq!(tone.len(), 64000);
//!
//! // Raw float32 PCM, base64-encoded for transport
//! let wire = tone.to_base64();
//! let back = AudioBuffer::from_base64(&wire, 16000).unwrap();
//! assert_eq!(back, tone);
//! ```

mod error;
pub mod pcm;
pub mod sine;
pub mod wav;

pub use error::AudioError;
pub use pcm::{AudioBuffer, Format};
