use thiserror::Error;
use xtts_audio::AudioError;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine failed while computing a result.
    #[error("{0}")]
    Computation(String),

    /// The engine could not be initialized.
    #[error("engine load failed: {0}")]
    Load(String),

    #[error("embedding shape {shape:?} does not match {len} values")]
    ShapeMismatch { shape: Vec<usize>, len: usize },

    #[error(transparent)]
    Audio(#[from] AudioError),
}
