//! API error handling

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients.
///
/// Every variant renders as `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input (400).
    #[error("{0}")]
    Client(String),

    /// Engine or other internal failure (500).
    #[error("{0}")]
    Server(String),

    /// Request body that does not fit the schema (unparseable JSON, missing
    /// or ill-typed fields, out-of-range speed).
    #[error("{message}")]
    Schema { status: StatusCode, message: String },
}

impl ApiError {
    pub fn client(msg: impl Into<String>) -> Self {
        Self::Client(msg.into())
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Client(_) => StatusCode::BAD_REQUEST,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Schema { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Schema {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
