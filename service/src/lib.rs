//! Request Service for the XTTS voice service.
//!
//! API endpoints:
//! - GET  /health            - Process status, model state, languages
//! - POST /extract-embedding - Speaker embedding from float32 PCM audio
//! - POST /synthesize        - Speech from text, optionally voice-cloned
//!
//! Audio and embeddings travel as base64-encoded raw little-endian float32.
//! Client errors are reported as 400 (422 for schema violations) and
//! engine failures as 500, always with a `{"detail": "..."}` body.

pub mod config;
mod error;
mod language;
pub mod schema;
mod server;
mod service;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use language::{Language, UnsupportedLanguage};
pub use server::{parse_addr, router};
pub use service::{VoiceService, latency_warning};
