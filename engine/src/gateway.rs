use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use xtts_audio::AudioBuffer;

use crate::model::{Engine, EngineLoader, SynthesisInput};
use crate::{Embedding, EngineError};

/// Owns the process-wide engine handle.
///
/// The handle is created by the configured [`EngineLoader`] the first time
/// it is needed. Concurrent callers wait for the same initialization. A
/// failed load leaves the gateway unloaded, so the next call tries again.
pub struct Gateway {
    loader: Box<dyn EngineLoader>,
    engine: OnceCell<Arc<dyn Engine>>,
}

struct Loaded(Arc<dyn Engine>);

#[async_trait]
impl EngineLoader for Loaded {
    async fn load(&self) -> Result<Arc<dyn Engine>, EngineError> {
        Ok(self.0.clone())
    }
}

impl Gateway {
    /// Creates a gateway that loads its engine lazily.
    pub fn new(loader: impl EngineLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            engine: OnceCell::new(),
        }
    }

    /// Creates a gateway around an already constructed engine.
    pub fn with_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            loader: Box::new(Loaded(engine.clone())),
            engine: OnceCell::new_with(Some(engine)),
        }
    }

    /// Reports whether the engine handle has been created.
    pub fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    /// Creates the engine handle now instead of on first use.
    pub async fn preload(&self) -> Result<(), EngineError> {
        self.engine().await.map(|_| ())
    }

    async fn engine(&self) -> Result<&Arc<dyn Engine>, EngineError> {
        self.engine
            .get_or_try_init(|| async {
                info!("loading inference engine");
                let start = Instant::now();
                match self.loader.load().await {
                    Ok(engine) => {
                        info!(elapsed = ?start.elapsed(), "inference engine loaded");
                        Ok(engine)
                    }
                    Err(e) => {
                        warn!(error = %e, "inference engine failed to load");
                        Err(e)
                    }
                }
            })
            .await
    }

    /// Computes a speaker embedding. Duration limits are the caller's
    /// responsibility.
    pub async fn extract_embedding(&self, audio: &AudioBuffer) -> Result<Embedding, EngineError> {
        self.engine().await?.extract_embedding(audio).await
    }

    /// Synthesizes speech, conditioned on `embedding` when given.
    ///
    /// 1-D embeddings are reshaped to `[1, n]` before they reach the engine.
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        embedding: Option<Embedding>,
        speed: f64,
    ) -> Result<AudioBuffer, EngineError> {
        let engine = self.engine().await?;
        let embedding = embedding.map(Embedding::into_row_matrix);
        engine
            .synthesize(SynthesisInput {
                text,
                language,
                embedding: embedding.as_ref(),
                speed,
            })
            .await
    }
}
