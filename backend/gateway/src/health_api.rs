//! Gateway Health API

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub analyzer: String,
    pub relay_enabled: bool,
    pub uptime_seconds: i64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let now = Utc::now();
    Json(HealthReport {
        status: "ok",
        service: "facegate",
        version: env!("CARGO_PKG_VERSION"),
        analyzer: state.analyzer.name().to_string(),
        relay_enabled: state.relay.is_some(),
        uptime_seconds: (now - state.started_at).num_seconds(),
        timestamp: now,
    })
}
