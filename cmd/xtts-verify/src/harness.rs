//! Sequential end-to-end run: health, embedding extraction, then one
//! voice-cloned synthesis per language.

use std::path::{Path, PathBuf};

use tracing::debug;
use xtts_audio::sine::test_tone;
use xtts_audio::wav::save_wav;
use xtts_audio::{AudioBuffer, Format};
use xtts_service::schema::{Speed, SynthesizeRequest};

use crate::client::{ClientError, ServiceClient};

/// Languages and phrases synthesized with the extracted voice.
pub const SYNTHESIS_CASES: [(&str, &str); 3] = [
    ("es", "Hola mundo, esta es una prueba."),
    ("zh", "你好世界"),
    ("ko", "안녕하세요"),
];

const RULE: &str = "==================================================";

/// Harness settings.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub output_dir: PathBuf,
    /// Length of the generated test tone.
    pub duration_seconds: f64,
    /// Sample rate of the generated test tone.
    pub sample_rate: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test_output"),
            duration_seconds: 4.0,
            sample_rate: 16000,
        }
    }
}

/// Result of a harness run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every call passed.
    Success,
    /// Health and extraction passed but some languages failed.
    Partial { failed: Vec<String> },
    /// Health or extraction failed; nothing was synthesized.
    Aborted(String),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Aborted(_) => 1,
            Outcome::Partial { .. } => 2,
        }
    }
}

pub struct Harness {
    client: ServiceClient,
    config: HarnessConfig,
}

impl Harness {
    pub fn new(client: ServiceClient, config: HarnessConfig) -> Self {
        Self { client, config }
    }

    pub async fn run(&self) -> Outcome {
        println!("{RULE}");
        println!("XTTS Server Verification");
        println!("{RULE}");

        let outcome = self.run_steps().await;

        println!("\n{RULE}");
        match &outcome {
            Outcome::Success => println!("SUCCESS: All tests passed!"),
            Outcome::Partial { failed } => {
                println!("PARTIAL: Some tests failed ({})", failed.join(", "))
            }
            Outcome::Aborted(reason) => println!("FAILED: {reason}"),
        }
        println!("{RULE}");
        outcome
    }

    async fn run_steps(&self) -> Outcome {
        if let Err(e) = self.check_health().await {
            if matches!(e, ClientError::Unreachable(_)) {
                println!("   ERROR: Cannot connect to server. Is it running?");
            } else {
                println!("   ERROR: {e}");
            }
            return Outcome::Aborted("Server not running or not healthy".into());
        }

        let embedding = match self.extract_embedding().await {
            Ok(embedding) => embedding,
            Err(e) => {
                println!("   ERROR: {e}");
                return Outcome::Aborted("Could not extract embedding".into());
            }
        };

        let failed = self.synthesize_all(&embedding).await;
        if failed.is_empty() {
            Outcome::Success
        } else {
            Outcome::Partial { failed }
        }
    }

    async fn check_health(&self) -> Result<(), ClientError> {
        println!("\n1. Testing /health endpoint...");
        debug!(server = self.client.base_url(), "checking health");
        let health = self.client.health().await?;
        println!("   Status: {}", health.status);
        println!("   Model loaded: {}", health.model_loaded);
        println!("   Supported languages: {:?}", health.supported_languages);
        Ok(())
    }

    async fn extract_embedding(&self) -> Result<String, ClientError> {
        println!("\n2. Testing /extract-embedding endpoint...");
        let tone = test_tone(
            Format::mono(self.config.sample_rate),
            self.config.duration_seconds,
        );
        debug!(samples = tone.len(), "generated test tone");

        let resp = self.client.extract_embedding(&tone).await?;
        println!("   Embedding shape: {:?}", resp.embedding_shape);
        println!(
            "   Embedding size: {} bytes",
            xtts_audio::pcm::decode_base64(&resp.embedding_base64)?.len() * 4
        );
        println!("   Input duration: {:.2}s", resp.duration_seconds);
        println!("   Processing time: {:.2}s", resp.processing_time_seconds);
        Ok(resp.embedding_base64)
    }

    /// Returns the languages that failed.
    async fn synthesize_all(&self, embedding: &str) -> Vec<String> {
        println!("\n3. Testing /synthesize endpoint with captured embedding...");
        let mut failed = Vec::new();
        for (lang, text) in SYNTHESIS_CASES {
            println!("   Synthesizing [{lang}]: '{text}'...");
            match self.synthesize_one(lang, text, embedding).await {
                Ok(path) => println!("      Saved to: {}", path.display()),
                Err(ClientError::Timeout(_)) => {
                    println!(
                        "      TIMEOUT: Synthesis took too long (>{:?})",
                        self.client.timeouts().synthesize
                    );
                    failed.push(lang.to_string());
                }
                Err(e) => {
                    println!("      ERROR: {e}");
                    failed.push(lang.to_string());
                }
            }
        }
        println!("\n   Audio files saved to: {}", self.config.output_dir.display());
        failed
    }

    async fn synthesize_one(
        &self,
        lang: &str,
        text: &str,
        embedding: &str,
    ) -> Result<PathBuf, ClientError> {
        let req = SynthesizeRequest {
            text: text.to_string(),
            language: lang.to_string(),
            embedding_base64: Some(embedding.to_string()),
            speed: Speed::default(),
        };
        let resp = self.client.synthesize(&req).await?;

        let audio = AudioBuffer::from_base64(&resp.audio_base64, resp.sample_rate)?;
        let path = wav_path(&self.config.output_dir, lang);
        save_wav(&path, &audio)?;

        if let Some(warning) = &resp.latency_warning {
            println!("      WARNING: {warning}");
        }
        println!(
            "      Duration: {:.2}s, processing: {:.2}s",
            resp.duration_seconds, resp.processing_time_seconds
        );
        Ok(path)
    }
}

/// Output file for one synthesized language.
pub fn wav_path(output_dir: &Path, lang: &str) -> PathBuf {
    output_dir.join(format!("test_{lang}_with_embedding.wav"))
}
