//! Forwarding proxy module
//!
//! Re-issues inbound task and auth requests against the upstream API and
//! relays status and body back to the caller.

use crate::config::AppConfig;
use crate::error::ProxyError;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::sync::Arc;

/// Proxy state containing the startup configuration and HTTP client
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub client: Client,
}

impl ProxyState {
    /// Create a new proxy state
    ///
    /// The client carries no timeout: a hung upstream hangs the inbound
    /// request. TODO: make the upstream timeout configurable.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

/// A decoded upstream answer, ready to relay to the caller.
#[derive(Debug)]
pub enum UpstreamReply {
    /// Upstream answered 204; relay it with an empty body.
    NoContent,
    /// Upstream answered with a JSON body to relay under its status.
    Body { status: StatusCode, body: Value },
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        match self {
            UpstreamReply::NoContent => StatusCode::NO_CONTENT.into_response(),
            UpstreamReply::Body { status, body } => (status, Json(body)).into_response(),
        }
    }
}

/// Issue exactly one upstream request mirroring the inbound method, path
/// and body, optionally carrying the caller's `Authorization` header.
pub async fn forward(
    state: &ProxyState,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
    auth: Option<&str>,
) -> Result<UpstreamReply, ProxyError> {
    let url = format!(
        "{}{}",
        state.config.upstream.base_url.trim_end_matches('/'),
        endpoint
    );

    let mut builder = state.client.request(method.clone(), &url);
    if let Some(body) = body {
        builder = builder.json(body);
    }
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    let response = builder.send().await.map_err(|e| {
        tracing::error!(url = %url, error = %e, "Upstream call failed");
        ProxyError::Transport(e.to_string())
    })?;

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    tracing::info!(
        method = %method,
        url = %url,
        status = %status,
        "Relayed upstream response"
    );

    if status == StatusCode::NO_CONTENT {
        return Ok(UpstreamReply::NoContent);
    }

    if status.is_success() {
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;
        Ok(UpstreamReply::Body { status, body })
    } else {
        // Non-JSON error bodies degrade to a status-text message.
        let body: Value = response.json().await.unwrap_or_else(|_| {
            json!({ "detail": status.canonical_reason().unwrap_or("upstream error") })
        });
        Err(ProxyError::UpstreamRejected { status, body })
    }
}

/// Inbound `Authorization` header value, when present and forwarding is
/// enabled.
fn auth_header(state: &ProxyState, headers: &HeaderMap) -> Option<String> {
    if !state.config.upstream.forward_auth {
        return None;
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn register(
    State(state): State<Arc<ProxyState>>,
    Json(body): Json<Value>,
) -> Result<UpstreamReply, ProxyError> {
    tracing::debug!("Registering user");
    forward(&state, Method::POST, "/auth/register", Some(&body), None).await
}

async fn login(
    State(state): State<Arc<ProxyState>>,
    Json(body): Json<Value>,
) -> Result<UpstreamReply, ProxyError> {
    tracing::debug!("Logging in user");
    forward(&state, Method::POST, "/auth/login", Some(&body), None).await
}

async fn list_tasks(
    State(state): State<Arc<ProxyState>>,
    headers: HeaderMap,
) -> Result<UpstreamReply, ProxyError> {
    let auth = auth_header(&state, &headers);
    forward(&state, Method::GET, "/tasks/", None, auth.as_deref()).await
}

async fn create_task(
    State(state): State<Arc<ProxyState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<UpstreamReply, ProxyError> {
    let auth = auth_header(&state, &headers);
    let reply = forward(&state, Method::POST, "/tasks/", Some(&body), auth.as_deref()).await?;

    // Creation always answers 201 on success.
    Ok(match reply {
        UpstreamReply::Body { body, .. } => UpstreamReply::Body {
            status: StatusCode::CREATED,
            body,
        },
        other => other,
    })
}

async fn update_task(
    State(state): State<Arc<ProxyState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<UpstreamReply, ProxyError> {
    let auth = auth_header(&state, &headers);
    forward(
        &state,
        Method::PATCH,
        &format!("/tasks/{id}"),
        Some(&body),
        auth.as_deref(),
    )
    .await
}

async fn delete_task(
    State(state): State<Arc<ProxyState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<UpstreamReply, ProxyError> {
    let auth = auth_header(&state, &headers);
    forward(
        &state,
        Method::DELETE,
        &format!("/tasks/{id}"),
        None,
        auth.as_deref(),
    )
    .await
}

/// Routes mirroring the upstream task and auth endpoints, mounted under
/// the versioned prefix the browser client expects.
pub fn create_proxy_router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route("/api/v1/tasks/:id", patch(update_task).delete(delete_task))
        .with_state(state)
}
