//! PCM audio format definitions.

use std::time::Duration;

/// Size in bytes of one float32 sample.
pub const SAMPLE_BYTES: usize = 4;

/// Describes a mono float32 audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Sample rate in Hz (e.g., 16000, 24000).
    pub sample_rate: u32,
}

impl Format {
    /// Creates a mono format with the given sample rate.
    pub const fn mono(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Returns the number of bytes per second of audio.
    pub fn bytes_rate(&self) -> usize {
        self.sample_rate as usize * SAMPLE_BYTES
    }

    /// Returns the number of whole samples in `seconds` of audio.
    /// Fractional samples are truncated.
    pub fn samples_in_duration(&self, seconds: f64) -> usize {
        (self.sample_rate as f64 * seconds) as usize
    }

    /// Returns the duration of `samples` samples in seconds.
    /// A zero sample rate yields zero.
    pub fn duration_seconds(&self, samples: usize) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        samples as f64 / self.sample_rate as f64
    }

    /// Returns the duration of `samples` samples.
    pub fn duration(&self, samples: usize) -> Duration {
        Duration::from_secs_f64(self.duration_seconds(samples))
    }
}

// Common format presets
impl Format {
    /// 16kHz mono (speaker encoder input)
    pub const MONO_16K: Format = Format::mono(16000);
    /// 22.05kHz mono
    pub const MONO_22K: Format = Format::mono(22050);
    /// 24kHz mono (XTTS output)
    pub const MONO_24K: Format = Format::mono(24000);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_properties() {
        let format = Format::MONO_16K;
        assert_eq!(format.sample_rate, 16000);
        assert_eq!(format.bytes_rate(), 64000);
    }

    #[test]
    fn test_samples_in_duration() {
        let format = Format::MONO_16K;
        assert_eq!(format.samples_in_duration(1.0), 16000);
        assert_eq!(format.samples_in_duration(4.0), 64000);
        // 0.1 ms is less than one sample
        assert_eq!(format.samples_in_duration(0.00005), 0);
    }

    #[test]
    fn test_duration() {
        let format = Format::MONO_24K;
        assert_eq!(format.duration_seconds(24000), 1.0);
        assert_eq!(format.duration_seconds(12000), 0.5);
        assert_eq!(format.duration(48000), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_rate_duration() {
        assert_eq!(Format::mono(0).duration_seconds(100), 0.0);
    }
}
