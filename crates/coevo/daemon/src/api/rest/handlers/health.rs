//! Health and status handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use coevo_types::{EvolutionConfig, RunPhase};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime: String,
    pub phase: RunPhase,
    pub generations_completed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<EvolutionConfig>,
}

/// Daemon and run status
pub async fn daemon_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.controller.status().await;
    Json(StatusResponse {
        version: state.version.clone(),
        uptime: state.uptime(),
        phase: status.phase,
        generations_completed: status.generations_completed,
        config: status.config,
    })
}
