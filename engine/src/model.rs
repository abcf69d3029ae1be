use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use xtts_audio::AudioBuffer;

use crate::{Embedding, EngineError};

/// Arguments for a single synthesis call.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub text: &'a str,
    /// Engine language code (e.g., "es", "zh-cn", "ko").
    pub language: &'a str,
    /// Speaker conditioning. `None` selects the engine's default voice.
    pub embedding: Option<&'a Embedding>,
    /// Speech speed multiplier.
    pub speed: f64,
}

/// A speaker-embedding and speech-synthesis engine.
///
/// Engines are treated as black boxes. Errors carry the engine's own
/// message and are never retried.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Computes a speaker embedding from mono float32 audio.
    async fn extract_embedding(&self, audio: &AudioBuffer) -> Result<Embedding, EngineError>;

    /// Synthesizes speech. The returned buffer carries the engine's native
    /// output sample rate.
    async fn synthesize(&self, input: SynthesisInput<'_>) -> Result<AudioBuffer, EngineError>;
}

/// Creates the engine handle on first use.
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn Engine>, EngineError>;
}

/// A function that implements the EngineLoader trait.
pub struct LoaderFunc<F>(pub F);

#[async_trait]
impl<F, Fut> EngineLoader for LoaderFunc<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Arc<dyn Engine>, EngineError>> + Send,
{
    async fn load(&self) -> Result<Arc<dyn Engine>, EngineError> {
        (self.0)().await
    }
}
