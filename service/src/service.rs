use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use xtts_audio::AudioBuffer;
use xtts_engine::{Embedding, Gateway};

use crate::error::ApiError;
use crate::language::Language;
use crate::schema::{
    ExtractEmbeddingRequest, ExtractEmbeddingResponse, HealthResponse, SynthesizeRequest,
    SynthesizeResponse,
};

/// Shortest accepted embedding input, in seconds.
pub const MIN_EMBEDDING_AUDIO_SECONDS: f64 = 1.0;

/// Longest accepted embedding input, in seconds.
pub const MAX_EMBEDDING_AUDIO_SECONDS: f64 = 30.0;

/// Default soft latency target for synthesis, in seconds.
pub const DEFAULT_LATENCY_WARNING_SECONDS: f64 = 4.0;

/// Validates requests, drives the [`Gateway`] and shapes responses.
///
/// Cloning is cheap; all clones share one gateway.
#[derive(Clone)]
pub struct VoiceService {
    gateway: Arc<Gateway>,
    latency_threshold: f64,
}

impl VoiceService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            latency_threshold: DEFAULT_LATENCY_WARNING_SECONDS,
        }
    }

    /// Sets the synthesis latency threshold in seconds.
    pub fn with_latency_threshold(mut self, seconds: f64) -> Self {
        self.latency_threshold = seconds;
        self
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Reports process status without touching the engine.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            model_loaded: self.gateway.is_loaded(),
            supported_languages: Language::engine_codes(),
        }
    }

    /// Extracts a speaker embedding from 1 to 30 seconds of audio.
    ///
    /// `processing_time_seconds` covers the engine call only.
    pub async fn extract_embedding(
        &self,
        req: ExtractEmbeddingRequest,
    ) -> Result<ExtractEmbeddingResponse, ApiError> {
        let audio = AudioBuffer::from_base64(&req.audio_base64, req.sample_rate)
            .map_err(|e| ApiError::client(format!("Invalid audio: {e}")))?;

        let duration_seconds = audio.duration_seconds();
        check_embedding_duration(duration_seconds)?;

        let start = Instant::now();
        let embedding = self.gateway.extract_embedding(&audio).await.map_err(|e| {
            warn!(error = %e, "embedding extraction failed");
            ApiError::server(format!("Embedding extraction failed: {e}"))
        })?;
        let processing_time_seconds = start.elapsed().as_secs_f64();

        info!(
            duration_seconds,
            shape = %embedding.shape(),
            processing_time_seconds,
            "extracted speaker embedding"
        );

        Ok(ExtractEmbeddingResponse {
            embedding_base64: embedding.to_base64(),
            embedding_shape: embedding.shape().dims().to_vec(),
            duration_seconds,
            processing_time_seconds,
        })
    }

    /// Synthesizes speech. Speed was range-checked when the request was
    /// parsed.
    pub async fn synthesize(&self, req: SynthesizeRequest) -> Result<SynthesizeResponse, ApiError> {
        let start = Instant::now();

        let language: Language = req
            .language
            .parse()
            .map_err(|e: crate::UnsupportedLanguage| ApiError::client(e.to_string()))?;

        if req.text.trim().is_empty() {
            return Err(ApiError::client("Text cannot be empty"));
        }

        let embedding = match req.embedding_base64.as_deref() {
            Some(encoded) if !encoded.is_empty() => Some(
                Embedding::from_base64(encoded)
                    .map_err(|e| ApiError::client(format!("Invalid embedding format: {e}")))?,
            ),
            _ => None,
        };
        let cloned = embedding.is_some();

        let audio = self
            .gateway
            .synthesize(
                &req.text,
                language.engine_code(),
                embedding,
                req.speed.value(),
            )
            .await
            .map_err(|e| {
                warn!(error = %e, %language, "synthesis failed");
                ApiError::server(format!("Synthesis failed: {e}"))
            })?;

        let duration_seconds = audio.duration_seconds();
        let audio_base64 = audio.to_base64();

        let processing_time_seconds = start.elapsed().as_secs_f64();
        let latency_warning = latency_warning(processing_time_seconds, self.latency_threshold);
        if let Some(w) = &latency_warning {
            warn!(%language, "{w}");
        }

        info!(
            %language,
            cloned,
            chars = req.text.chars().count(),
            duration_seconds,
            processing_time_seconds,
            "synthesized speech"
        );

        Ok(SynthesizeResponse {
            audio_base64,
            sample_rate: audio.sample_rate(),
            duration_seconds,
            processing_time_seconds,
            latency_warning,
        })
    }
}

fn check_embedding_duration(seconds: f64) -> Result<(), ApiError> {
    if seconds < MIN_EMBEDDING_AUDIO_SECONDS {
        return Err(ApiError::client(
            "Audio too short. Minimum 1 second required.",
        ));
    }
    if seconds > MAX_EMBEDDING_AUDIO_SECONDS {
        return Err(ApiError::client(
            "Audio too long. Maximum 30 seconds allowed.",
        ));
    }
    Ok(())
}

/// Returns a warning when `elapsed` seconds exceeds `threshold`.
pub fn latency_warning(elapsed: f64, threshold: f64) -> Option<String> {
    (elapsed > threshold).then(|| {
        format!("Processing time ({elapsed:.2}s) exceeded target threshold ({threshold:?}s)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Speed;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use xtts_audio::Format;
    use xtts_audio::sine::test_tone;
    use xtts_engine::{Engine, EngineError, SynthesisInput};

    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Engine for CountingEngine {
        async fn extract_embedding(&self, _audio: &AudioBuffer) -> Result<Embedding, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Embedding::from_vector(vec![0.25; 8]))
        }

        async fn synthesize(&self, input: SynthesisInput<'_>) -> Result<AudioBuffer, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if input.text == "explode" {
                return Err(EngineError::Computation("CUDA out of memory".into()));
            }
            let n = (24000.0 / input.speed) as usize;
            Ok(AudioBuffer::new(Format::MONO_24K, vec![0.0; n]))
        }
    }

    fn service() -> (VoiceService, Arc<CountingEngine>) {
        let engine = Arc::new(CountingEngine::default());
        let gw = Arc::new(Gateway::with_engine(engine.clone()));
        (VoiceService::new(gw), engine)
    }

    fn extract_req(seconds: f64) -> ExtractEmbeddingRequest {
        ExtractEmbeddingRequest {
            audio_base64: test_tone(Format::MONO_16K, seconds).to_base64(),
            sample_rate: 16000,
        }
    }

    fn synth_req(text: &str, language: &str) -> SynthesizeRequest {
        SynthesizeRequest {
            text: text.to_string(),
            language: language.to_string(),
            embedding_base64: None,
            speed: Speed::default(),
        }
    }

    #[test]
    fn duration_bounds() {
        assert!(check_embedding_duration(1.0).is_ok());
        assert!(check_embedding_duration(30.0).is_ok());
        assert!(check_embedding_duration(4.0).is_ok());
        assert!(check_embedding_duration(0.9999).is_err());
        assert!(check_embedding_duration(30.001).is_err());
        assert!(check_embedding_duration(0.0).is_err());
    }

    #[test]
    fn latency_warning_threshold() {
        assert!(latency_warning(4.0, 4.0).is_none());
        assert!(latency_warning(0.3, 4.0).is_none());
        assert_eq!(
            latency_warning(4.256, 4.0).unwrap(),
            "Processing time (4.26s) exceeded target threshold (4.0s)"
        );
        assert_eq!(
            latency_warning(5.0, 4.25).unwrap(),
            "Processing time (5.00s) exceeded target threshold (4.25s)"
        );
    }

    #[test]
    fn health_reports_languages() {
        let (svc, _) = service();
        let health = svc.health();
        assert_eq!(health.status, "healthy");
        assert!(health.model_loaded);
        assert_eq!(health.supported_languages, vec!["es", "zh-cn", "ko"]);
    }

    #[tokio::test]
    async fn extract_embedding_ok() {
        let (svc, _) = service();
        let resp = svc.extract_embedding(extract_req(4.0)).await.unwrap();
        assert!((resp.duration_seconds - 4.0).abs() < 1e-9);
        assert_eq!(resp.embedding_shape, vec![8]);
        assert_eq!(
            Embedding::from_base64(&resp.embedding_base64).unwrap().values(),
            &[0.25; 8]
        );
    }

    #[tokio::test]
    async fn extract_embedding_boundaries() {
        let (svc, engine) = service();
        // Exactly 1.0 s and 30.0 s are accepted.
        assert!(svc.extract_embedding(extract_req(1.0)).await.is_ok());
        assert!(svc.extract_embedding(extract_req(30.0)).await.is_ok());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);

        let err = svc.extract_embedding(extract_req(0.999)).await.unwrap_err();
        assert_eq!(err.to_string(), "Audio too short. Minimum 1 second required.");
        let err = svc.extract_embedding(extract_req(30.001)).await.unwrap_err();
        assert_eq!(err.to_string(), "Audio too long. Maximum 30 seconds allowed.");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn extract_embedding_uses_declared_rate() {
        let (svc, _) = service();
        // 16000 samples declared at 8 kHz is 2 seconds.
        let mut req = extract_req(1.0);
        req.sample_rate = 8000;
        let resp = svc.extract_embedding(req).await.unwrap();
        assert_eq!(resp.duration_seconds, 2.0);

        // ... and at 32 kHz only half a second.
        let mut req = extract_req(1.0);
        req.sample_rate = 32000;
        assert!(matches!(
            svc.extract_embedding(req).await,
            Err(ApiError::Client(_))
        ));
    }

    #[tokio::test]
    async fn extract_embedding_bad_payloads() {
        let (svc, engine) = service();
        for (audio, rate) in [("@@@", 16000), ("AQID", 16000), ("AACAPw==", 0)] {
            let err = svc
                .extract_embedding(ExtractEmbeddingRequest {
                    audio_base64: audio.to_string(),
                    sample_rate: rate,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Client(_)), "{audio}: {err}");
        }
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn synthesize_ok() {
        let (svc, _) = service();
        let resp = svc.synthesize(synth_req("Hola mundo", "es")).await.unwrap();
        assert_eq!(resp.sample_rate, 24000);
        assert_eq!(resp.duration_seconds, 1.0);
        assert!(!resp.audio_base64.is_empty());
        assert!(resp.latency_warning.is_none());
    }

    #[tokio::test]
    async fn synthesize_rejections_skip_engine() {
        let (svc, engine) = service();

        let err = svc.synthesize(synth_req("", "es")).await.unwrap_err();
        assert_eq!(err.to_string(), "Text cannot be empty");
        let err = svc.synthesize(synth_req(" \n\t", "ko")).await.unwrap_err();
        assert_eq!(err.to_string(), "Text cannot be empty");

        let err = svc.synthesize(synth_req("hi", "fr")).await.unwrap_err();
        assert_eq!(err.to_string(), "Unsupported language: fr. Supported: es, zh, ko");

        let mut req = synth_req("hi", "es");
        req.embedding_base64 = Some("AQID".into());
        let err = svc.synthesize(req).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid embedding format: "));

        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn language_checked_before_text() {
        let (svc, _) = service();
        let err = svc.synthesize(synth_req("", "fr")).await.unwrap_err();
        assert!(err.to_string().starts_with("Unsupported language"));
    }

    #[tokio::test]
    async fn empty_embedding_uses_default_voice() {
        let (svc, _) = service();
        let mut req = synth_req("你好世界", "zh");
        req.embedding_base64 = Some(String::new());
        assert!(svc.synthesize(req).await.is_ok());
    }

    #[tokio::test]
    async fn engine_failure_is_server_error() {
        let (svc, _) = service();
        let err = svc.synthesize(synth_req("explode", "es")).await.unwrap_err();
        assert!(matches!(err, ApiError::Server(_)));
        assert_eq!(err.to_string(), "Synthesis failed: CUDA out of memory");
    }

    #[tokio::test]
    async fn same_input_same_duration() {
        let (svc, _) = service();
        let mut req = synth_req("Hola mundo", "es");
        req.speed = Speed::new(1.5).unwrap();
        let a = svc.synthesize(req.clone()).await.unwrap();
        let b = svc.synthesize(req).await.unwrap();
        assert_eq!(a.duration_seconds, b.duration_seconds);
    }
}
