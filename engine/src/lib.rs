//! Model gateway for the XTTS voice service.
//!
//! # Architecture
//!
//! The inference engine is an opaque black box behind the [`Engine`] trait:
//!
//! 1. [`Engine::extract_embedding`]: mono float32 audio -> [`Embedding`]
//! 2. [`Engine::synthesize`]: text + language + optional [`Embedding`] -> audio
//!
//! A [`Gateway`] owns the engine handle. The handle is created on first use
//! through an [`EngineLoader`] (or eagerly via [`Gateway::preload`]) and lives
//! for the rest of the process. Initialization happens at most once even when
//! several requests arrive before the engine is ready.
//!
//! # Embedding Shapes
//!
//! Embeddings carry an explicit [`EmbeddingShape`]. Before synthesis the
//! gateway converts 1-D embeddings to row matrices:
//!
//! ```text
//! [512]      -> [1, 512]
//! [1, 512]   -> [1, 512]
//! [1, 512, 1] -> [1, 512, 1]
//! ```
//!
//! # Backends
//!
//! [`WorkerEngine`] drives an external inference process over a
//! line-delimited JSON protocol on its stdin/stdout.

mod embedding;
mod error;
mod gateway;
mod model;
mod worker;

pub use embedding::{Embedding, EmbeddingShape};
pub use error::EngineError;
pub use gateway::Gateway;
pub use model::{Engine, EngineLoader, LoaderFunc, SynthesisInput};
pub use worker::{WorkerConfig, WorkerEngine};
