//! 16-bit mono WAV output.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use crate::pcm::AudioBuffer;
use crate::AudioError;

/// Full scale of a 16-bit sample.
const PCM16_SCALE: f64 = 32767.0;

/// Converts a float sample to 16-bit PCM.
///
/// The sample is clamped to [-1, 1], scaled by 32767 and truncated toward
/// zero. NaN maps to silence.
pub fn to_pcm16(sample: f32) -> i16 {
    (f64::from(sample).clamp(-1.0, 1.0) * PCM16_SCALE) as i16
}

fn spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Writes the buffer as a 16-bit mono WAV stream.
pub fn write_wav<W: Write + Seek>(w: W, audio: &AudioBuffer) -> Result<(), AudioError> {
    let mut writer = hound::WavWriter::new(w, spec(audio.sample_rate()))?;
    for &sample in audio.samples() {
        writer.write_sample(to_pcm16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Saves the buffer as a 16-bit mono WAV file, creating parent
/// directories as needed. Returns the audio duration in seconds.
pub fn save_wav(path: &Path, audio: &AudioBuffer) -> Result<f64, AudioError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_wav(BufWriter::new(File::create(path)?), audio)?;
    Ok(audio.duration_seconds())
}
