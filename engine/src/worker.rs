//! [`Engine`] implementation backed by an external inference worker.
//!
//! The worker is a long-lived child process that hosts the model. Requests
//! and responses are single-line JSON objects on the worker's stdin and
//! stdout; stderr is passed through to the service's own stderr.
//!
//! ```text
//! -> {"op":"check"}
//! <- {"status":"ready"}
//! -> {"op":"extract_embedding","audio_base64":"...","sample_rate":16000}
//! <- {"embedding_base64":"...","embedding_shape":[1,512,1]}
//! -> {"op":"synthesize","text":"...","language":"es","embedding_base64":null,"embedding_shape":null,"speed":1.0}
//! <- {"audio_base64":"...","sample_rate":24000}
//! ```
//!
//! Any response may be `{"error":"..."}` instead.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info};
use xtts_audio::AudioBuffer;

use crate::model::{Engine, EngineLoader, SynthesisInput};
use crate::{Embedding, EmbeddingShape, EngineError};

/// Configuration for [`WorkerEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker executable (default: "python3").
    pub program: String,
    /// Worker arguments (default: ["xtts_worker.py"]).
    pub args: Vec<String>,
    /// Extra environment variables.
    pub env: HashMap<String, String>,
    /// Working directory; inherits the service's when unset.
    pub dir: Option<PathBuf>,
    /// Seconds to wait for the readiness handshake (default: 300).
    /// Model weights are loaded during this window.
    pub startup_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["xtts_worker.py".to_string()],
            env: HashMap::new(),
            dir: None,
            startup_timeout_secs: 300,
        }
    }
}

#[async_trait]
impl EngineLoader for WorkerConfig {
    async fn load(&self) -> Result<Arc<dyn Engine>, EngineError> {
        Ok(Arc::new(WorkerEngine::spawn(self).await?))
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum WorkerRequest<'a> {
    Check,
    ExtractEmbedding {
        audio_base64: String,
        sample_rate: u32,
    },
    Synthesize {
        text: &'a str,
        language: &'a str,
        embedding_base64: Option<String>,
        embedding_shape: Option<&'a EmbeddingShape>,
        speed: f64,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkerResponse {
    status: Option<String>,
    error: Option<String>,
    embedding_base64: Option<String>,
    embedding_shape: Option<EmbeddingShape>,
    audio_base64: Option<String>,
    sample_rate: Option<u32>,
}

struct WorkerIo {
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl WorkerIo {
    async fn round_trip(&mut self, line: &str) -> Result<String, EngineError> {
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| EngineError::Computation(format!("write to inference worker: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| EngineError::Computation(format!("write to inference worker: {e}")))?;

        self.stdout
            .next_line()
            .await
            .map_err(|e| EngineError::Computation(format!("read from inference worker: {e}")))?
            .ok_or_else(|| EngineError::Computation("inference worker closed its output".into()))
    }
}

/// [`Engine`] that forwards every call to an inference worker process.
///
/// One request is in flight at a time; concurrent callers queue on an
/// internal lock. Each round trip runs to completion on its own task, so a
/// caller that gives up early never leaves an unread reply or a partial
/// request line behind.
pub struct WorkerEngine {
    io: Arc<Mutex<WorkerIo>>,
    // Killed on drop, which also ends any round trip still in flight.
    _child: std::sync::Mutex<Child>,
}

impl WorkerEngine {
    /// Starts the worker and waits for it to report ready.
    pub async fn spawn(cfg: &WorkerConfig) -> Result<Self, EngineError> {
        if cfg.program.is_empty() {
            return Err(EngineError::Load("worker program is empty".into()));
        }

        let mut cmd = Command::new(&cfg.program);
        cmd.args(&cfg.args)
            .envs(&cfg.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &cfg.dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| EngineError::Load(format!("start {}: {e}", cfg.program)))?;
        info!(program = %cfg.program, pid = ?child.id(), "inference worker started");

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Load("worker stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Load("worker stdout unavailable".into()))?;

        let engine = Self {
            io: Arc::new(Mutex::new(WorkerIo {
                stdin,
                stdout: BufReader::new(stdout).lines(),
            })),
            _child: std::sync::Mutex::new(child),
        };

        let timeout = Duration::from_secs(cfg.startup_timeout_secs);
        let resp = tokio::time::timeout(timeout, engine.call(&WorkerRequest::Check))
            .await
            .map_err(|_| {
                EngineError::Load(format!(
                    "worker not ready after {}s",
                    cfg.startup_timeout_secs
                ))
            })?
            .map_err(|e| EngineError::Load(e.to_string()))?;

        match resp.status.as_deref() {
            Some("ready") => {
                info!("inference worker ready");
                Ok(engine)
            }
            other => Err(EngineError::Load(format!(
                "unexpected worker status: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    async fn call(&self, req: &WorkerRequest<'_>) -> Result<WorkerResponse, EngineError> {
        let mut line = serde_json::to_string(req)
            .map_err(|e| EngineError::Computation(format!("encode worker request: {e}")))?;
        line.push('\n');

        let request_bytes = line.len();

        let mut io = self.io.clone().lock_owned().await;
        let reply = tokio::spawn(async move { io.round_trip(&line).await })
            .await
            .map_err(|e| EngineError::Computation(format!("inference worker task: {e}")))??;
        debug!(request_bytes, reply_bytes = reply.len(), "worker round trip");

        let resp: WorkerResponse = serde_json::from_str(&reply)
            .map_err(|e| EngineError::Computation(format!("decode worker reply: {e}")))?;
        if let Some(err) = resp.error {
            return Err(EngineError::Computation(err));
        }
        Ok(resp)
    }
}

fn missing(field: &str) -> EngineError {
    EngineError::Computation(format!("worker reply missing {field}"))
}

#[async_trait]
impl Engine for WorkerEngine {
    async fn extract_embedding(&self, audio: &AudioBuffer) -> Result<Embedding, EngineError> {
        let resp = self
            .call(&WorkerRequest::ExtractEmbedding {
                audio_base64: audio.to_base64(),
                sample_rate: audio.sample_rate(),
            })
            .await?;

        let encoded = resp.embedding_base64.ok_or_else(|| missing("embedding_base64"))?;
        let flat = Embedding::from_base64(&encoded)?;
        match resp.embedding_shape {
            Some(shape) => Embedding::new(flat.values().to_vec(), shape),
            None => Ok(flat),
        }
    }

    async fn synthesize(&self, input: SynthesisInput<'_>) -> Result<AudioBuffer, EngineError> {
        let resp = self
            .call(&WorkerRequest::Synthesize {
                text: input.text,
                language: input.language,
                embedding_base64: input.embedding.map(Embedding::to_base64),
                embedding_shape: input.embedding.map(Embedding::shape),
                speed: input.speed,
            })
            .await?;

        let encoded = resp.audio_base64.ok_or_else(|| missing("audio_base64"))?;
        let sample_rate = resp.sample_rate.ok_or_else(|| missing("sample_rate"))?;
        Ok(AudioBuffer::from_base64(&encoded, sample_rate)?)
    }
}
