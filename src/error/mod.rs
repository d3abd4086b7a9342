//! Error types for the forwarding proxy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// What can go wrong while relaying a request upstream.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Upstream answered with a non-success status; status and payload are
    /// relayed to the caller verbatim.
    #[error("upstream rejected the request with status {status}")]
    UpstreamRejected { status: StatusCode, body: Value },

    /// The outbound call never produced a usable response.
    #[error("upstream call failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Transport(err.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::UpstreamRejected { status, body } => (status, Json(body)).into_response(),
            ProxyError::Transport(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}
