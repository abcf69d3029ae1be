//! Synthetic test tones.

use std::f64::consts::PI;

use crate::pcm::{AudioBuffer, Format};

/// Frequency of the verification tone (A3).
pub const TEST_TONE_HZ: f64 = 220.0;

/// Amplitude of the verification tone.
pub const TEST_TONE_AMPLITUDE: f64 = 0.5;

/// Generates a pure sine wave.
///
/// The sample count is `sample_rate * duration_seconds`, truncated. Samples
/// are computed in f64 and stored as f32.
pub fn sine_wave(format: Format, freq: f64, amplitude: f64, duration_seconds: f64) -> AudioBuffer {
    let count = format.samples_in_duration(duration_seconds);
    let rate = format.sample_rate as f64;
    let samples = (0..count)
        .map(|i| {
            let t = i as f64 / rate;
            (amplitude * (2.0 * PI * freq * t).sin()) as f32
        })
        .collect();
    AudioBuffer::new(format, samples)
}

/// Generates the 220 Hz, 0.5 amplitude verification tone.
pub fn test_tone(format: Format, duration_seconds: f64) -> AudioBuffer {
    sine_wave(format, TEST_TONE_HZ, TEST_TONE_AMPLITUDE, duration_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_shape() {
        let tone = test_tone(Format::MONO_16K, 4.0);
        assert_eq!(tone.len(), 64000);
        assert_eq!(tone.sample_rate(), 16000);
        assert!((tone.duration_seconds() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_tone_amplitude() {
        let tone = test_tone(Format::MONO_16K, 1.0);
        let peak = tone.samples().iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= 0.5);
        assert!(peak > 0.49);
        assert_eq!(tone.samples()[0], 0.0);
    }

    #[test]
    fn quarter_period_peak() {
        // 16000 / 220 / 4 is not integral; use a rate where it is.
        let tone = sine_wave(Format::mono(880), 220.0, 0.5, 1.0);
        assert!((tone.samples()[1] - 0.5).abs() < 1e-6);
        assert!((tone.samples()[3] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_duration() {
        assert!(test_tone(Format::MONO_16K, 0.0).is_empty());
    }
}
