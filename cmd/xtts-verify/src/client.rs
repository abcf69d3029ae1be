//! HTTP client for the XTTS server API.

use std::time::Duration;

use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use xtts_audio::{AudioBuffer, AudioError};
use xtts_service::schema::{
    ExtractEmbeddingRequest, ExtractEmbeddingResponse, HealthResponse, SynthesizeRequest,
    SynthesizeResponse,
};

/// Per-endpoint request timeouts.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub health: Duration,
    pub extract: Duration,
    pub synthesize: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(10),
            extract: Duration::from_secs(30),
            synthesize: Duration::from_secs(60),
        }
    }
}

/// Errors returned by [`ServiceClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot connect to {0}")]
    Unreachable(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("HTTP {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("audio: {0}")]
    Audio(#[from] AudioError),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for the three service endpoints. Each call carries its own
/// timeout.
pub struct ServiceClient {
    client: ReqwestClient,
    base_url: String,
    timeouts: Timeouts,
}

impl ServiceClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: ReqwestClient::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeouts: Timeouts::default(),
        })
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        self.send(self.client.get(url), self.timeouts.health).await
    }

    pub async fn extract_embedding(
        &self,
        audio: &AudioBuffer,
    ) -> Result<ExtractEmbeddingResponse, ClientError> {
        let body = ExtractEmbeddingRequest {
            audio_base64: audio.to_base64(),
            sample_rate: audio.sample_rate(),
        };
        let url = format!("{}/extract-embedding", self.base_url);
        self.send(self.client.post(url).json(&body), self.timeouts.extract)
            .await
    }

    pub async fn synthesize(
        &self,
        req: &SynthesizeRequest,
    ) -> Result<SynthesizeResponse, ClientError> {
        let url = format!("{}/synthesize", self.base_url);
        self.send(self.client.post(url).json(req), self.timeouts.synthesize)
            .await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<R, ClientError> {
        let resp = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        let status = resp.status();
        debug!(url = %resp.url(), %status, "response");
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.detail)
                .unwrap_or(text);
            return Err(ClientError::Status { status, detail });
        }

        resp.json().await.map_err(|e| self.classify(e, timeout))
    }

    fn classify(&self, err: reqwest::Error, timeout: Duration) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(timeout)
        } else if err.is_connect() {
            ClientError::Unreachable(self.base_url.clone())
        } else {
            ClientError::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let client = ServiceClient::new("http://localhost:8000").unwrap();
        let t = client.timeouts();
        assert_eq!(t.health, Duration::from_secs(10));
        assert_eq!(t.extract, Duration::from_secs(30));
        assert_eq!(t.synthesize, Duration::from_secs(60));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ServiceClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn unreachable_server() {
        // Bind and drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ServiceClient::new(&format!("http://{addr}")).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Unreachable(_)), "{err}");
    }

    #[test]
    fn status_error_message() {
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            detail: "Text cannot be empty".into(),
        };
        assert_eq!(err.to_string(), "HTTP 400 Bad Request: Text cannot be empty");
    }
}
