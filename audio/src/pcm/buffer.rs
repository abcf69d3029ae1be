//! Owned mono float32 audio.

use std::time::Duration;

use super::codec::{decode_base64, encode_base64};
use super::format::Format;
use crate::AudioError;

/// An ordered run of mono float32 samples at a declared sample rate.
///
/// The duration is always derived from the sample count and the declared
/// rate, never from the content.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    format: Format,
}

impl AudioBuffer {
    /// Creates a buffer from samples in the given format.
    pub fn new(format: Format, samples: Vec<f32>) -> Self {
        Self { samples, format }
    }

    /// Decodes base64 raw float32 bytes declared to be at `sample_rate`.
    pub fn from_base64(encoded: &str, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::ZeroSampleRate);
        }
        let samples = decode_base64(encoded)?;
        Ok(Self::new(Format::mono(sample_rate), samples))
    }

    /// Encodes the samples as base64 raw float32 bytes.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.samples)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consumes the buffer and returns the samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns `sample_count / sample_rate`.
    pub fn duration_seconds(&self) -> f64 {
        self.format.duration_seconds(self.samples.len())
    }

    pub fn duration(&self) -> Duration {
        self.format.duration(self.samples.len())
    }
}
