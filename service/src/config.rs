//! Server configuration.
//!
//! Configuration is read from an optional YAML file. Every field has a
//! default, so an empty file (or no file) is a valid configuration.
//!
//! ```yaml
//! addr: ":8000"
//! preload: true
//! latency_warning_secs: 4.0
//! worker:
//!   program: python3
//!   args: ["workers/xtts_worker.py"]
//!   env:
//!     COQUI_TOS_AGREED: "1"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xtts_engine::WorkerConfig;

use crate::server::parse_addr;
use crate::service::DEFAULT_LATENCY_WARNING_SECONDS;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address. `:PORT` binds every interface.
    pub addr: String,

    /// Load the engine before accepting requests.
    pub preload: bool,

    /// Allow any origin, method and header.
    pub cors: bool,

    /// Synthesis time, in seconds, above which a latency warning is
    /// attached to the response.
    pub latency_warning_secs: f64,

    /// Inference worker settings.
    pub worker: WorkerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
            preload: false,
            cors: true,
            latency_warning_secs: DEFAULT_LATENCY_WARNING_SECONDS,
            worker: WorkerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&data)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    /// Checks field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency_warning_secs.is_nan() || self.latency_warning_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "latency_warning_secs must be positive, got {}",
                self.latency_warning_secs
            )));
        }
        if self.worker.program.trim().is_empty() {
            return Err(ConfigError::Invalid("worker.program is empty".into()));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Returns the parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr(&self.addr)
            .map_err(|e| ConfigError::Invalid(format!("addr {:?}: {e}", self.addr)))
    }
}
