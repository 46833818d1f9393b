//! Main HTTP gateway server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use facegate_config::FaceGateConfig;
use facegate_core::FaceAnalyzer;
use facegate_relay::WebhookRelay;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

use crate::{analyze, control_ui, detect, health_api, verify};

/// Application state shared across routes. Immutable after startup.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<FaceGateConfig>,
    pub analyzer: Arc<dyn FaceAnalyzer>,
    pub relay: Option<WebhookRelay>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(
        config: FaceGateConfig,
        analyzer: Arc<dyn FaceAnalyzer>,
        relay: Option<WebhookRelay>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            analyzer,
            relay,
            started_at: Utc::now(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: GatewayState) -> Router {
    let server = &state.config.server;

    let mut app = Router::new()
        .route("/", get(control_ui::serve_home))
        .route("/analyze", post(analyze::analyze_face))
        .route("/detect", post(detect::detect_face))
        .route("/verify", post(verify::verify_faces))
        .route("/api/health", get(health_api::get_health))
        .nest_service(&server.static_prefix, control_ui::static_service(&server.static_dir))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if server.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}

/// Bind and serve until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
