//! Request and response bodies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sample rate assumed for embedding input when the client omits it.
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub supported_languages: Vec<String>,
}

/// Request body for embedding extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractEmbeddingRequest {
    /// Base64-encoded raw float32 PCM samples, mono.
    /// 3-6 seconds of voiced audio gives the best embeddings.
    pub audio_base64: String,

    /// Sample rate of the input audio.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

/// Response containing the extracted speaker embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractEmbeddingResponse {
    /// Base64-encoded raw float32 embedding values.
    pub embedding_base64: String,
    pub embedding_shape: Vec<usize>,
    /// Duration of the input audio.
    pub duration_seconds: f64,
    /// Time spent in the engine.
    pub processing_time_seconds: f64,
}

/// Request body for speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,

    /// Target language code (es, zh, ko).
    pub language: String,

    /// Base64-encoded speaker embedding. The default voice is used when
    /// absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_base64: Option<String>,

    #[serde(default)]
    pub speed: Speed,
}

/// Response containing synthesized audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    /// Base64-encoded raw float32 PCM samples, mono.
    pub audio_base64: String,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    /// Time from request start to response.
    pub processing_time_seconds: f64,
    /// Set when processing time exceeded the latency threshold.
    pub latency_warning: Option<String>,
}

/// Speech speed multiplier, always within [0.5, 2.0].
///
/// Deserialization rejects out-of-range values, so an invalid speed never
/// gets past request parsing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed(f64);

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("speed must be between 0.5 and 2.0, got {0}")]
pub struct SpeedOutOfRange(pub f64);

impl Speed {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 2.0;

    pub fn new(value: f64) -> Result<Self, SpeedOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SpeedOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f64> for Speed {
    type Error = SpeedOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Speed> for f64 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_bounds() {
        assert!(Speed::new(0.5).is_ok());
        assert!(Speed::new(2.0).is_ok());
        assert!(Speed::new(1.25).is_ok());
        assert!(Speed::new(0.49).is_err());
        assert!(Speed::new(2.001).is_err());
        assert!(Speed::new(f64::NAN).is_err());
        assert_eq!(Speed::default().value(), 1.0);
    }

    #[test]
    fn synthesize_request_defaults() {
        let req: SynthesizeRequest =
            serde_json::from_str(r#"{"text":"Hola","language":"es"}"#).unwrap();
        assert_eq!(req.speed.value(), 1.0);
        assert!(req.embedding_base64.is_none());
    }

    #[test]
    fn synthesize_request_rejects_speed() {
        let err = serde_json::from_str::<SynthesizeRequest>(
            r#"{"text":"Hola","language":"es","speed":3.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("speed must be between 0.5 and 2.0"));
    }

    #[test]
    fn null_embedding_is_none() {
        let req: SynthesizeRequest =
            serde_json::from_str(r#"{"text":"Hola","language":"es","embedding_base64":null}"#)
                .unwrap();
        assert!(req.embedding_base64.is_none());
    }

    #[test]
    fn extract_request_default_rate() {
        let req: ExtractEmbeddingRequest =
            serde_json::from_str(r#"{"audio_base64":""}"#).unwrap();
        assert_eq!(req.sample_rate, 16000);
    }

    #[test]
    fn latency_warning_serializes_as_null() {
        let resp = SynthesizeResponse {
            audio_base64: String::new(),
            sample_rate: 24000,
            duration_seconds: 0.0,
            processing_time_seconds: 0.1,
            latency_warning: None,
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v["latency_warning"].is_null());
    }
}
