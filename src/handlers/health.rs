//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    /// Whether AI adjudication is configured
    ai_enabled: bool,
    /// Whether the monitoring reputation lookup is configured
    monitoring_enabled: bool,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        ai_enabled: state.config.ai_enabled(),
        monitoring_enabled: state.config.monitoring_enabled(),
    })
}
