//! HTTP routing.

use std::any::Any;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::ApiError;
use crate::schema::{
    ExtractEmbeddingRequest, ExtractEmbeddingResponse, HealthResponse, SynthesizeRequest,
    SynthesizeResponse,
};
use crate::service::VoiceService;

/// Request body cap. Thirty seconds of 48 kHz float32 audio is about
/// 7.7 MB once base64-encoded.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Builds the API router. With `cors` set, any origin, method and header
/// is allowed.
pub fn router(service: VoiceService, cors: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/extract-embedding", post(extract_embedding))
        .route("/synthesize", post(synthesize))
        .with_state(service)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    if cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        );
    }
    app
}

/// Parse address string to SocketAddr.
pub fn parse_addr(addr: &str) -> Result<SocketAddr, std::net::AddrParseError> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    addr.parse()
}

async fn health(State(service): State<VoiceService>) -> Json<HealthResponse> {
    Json(service.health())
}

async fn extract_embedding(
    State(service): State<VoiceService>,
    payload: Result<Json<ExtractEmbeddingRequest>, JsonRejection>,
) -> Result<Json<ExtractEmbeddingResponse>, ApiError> {
    let Json(req) = payload?;
    service.extract_embedding(req).await.map(Json)
}

async fn synthesize(
    State(service): State<VoiceService>,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    let Json(req) = payload?;
    service.synthesize(req).await.map(Json)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%detail, "request handler panicked");
    ApiError::server(format!("Internal error: {detail}")).into_response()
}
