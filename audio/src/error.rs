use thiserror::Error;

/// Errors returned by audio decoding and encoding.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),

    #[error("buffer size must be a multiple of 4 bytes, got {0}")]
    Misaligned(usize),

    #[error("sample rate must be positive")]
    ZeroSampleRate,

    #[error("wav: {0}")]
    Wav(#[from] hound::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
