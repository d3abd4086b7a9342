//! HTTP server module
//!
//! Assembles the proxy routes with CORS, request tracing and static asset
//! serving, and runs the listener.

use crate::config::AppConfig;
use crate::proxy::{create_proxy_router, ProxyState};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the main server router
///
/// Proxy routes take precedence; anything else falls through to the
/// static frontend bundle.
pub fn create_server_router(config: Arc<AppConfig>) -> Router {
    let proxy_state = Arc::new(ProxyState::new(config.clone()));

    create_proxy_router(proxy_state)
        .fallback_service(ServeDir::new(&config.assets.dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_server_router(config.clone());

    tracing::info!(
        addr = %addr,
        upstream = %config.upstream.base_url,
        "Starting taskgate server"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
