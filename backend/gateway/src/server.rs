//! Main HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tracing::{info, instrument};
use tutorbridge_config::TutorConfig;
use tutorbridge_dialog::DialogHandler;

use crate::{health_api, webhook};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub handler: Arc<DialogHandler>,
    /// Effective config the process started with.
    pub config: Arc<TutorConfig>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(handler: DialogHandler, config: TutorConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

/// All gateway routes. The webhook answers on both `/post` and `/`.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/post", post(webhook::post_webhook))
        .route("/", post(webhook::post_webhook))
        .route("/health", get(health_api::get_health))
        .route("/config", get(health_api::get_config))
        .with_state(state)
}

/// Serve `app` on `addr` until Ctrl-C.
#[instrument(skip(app))]
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
