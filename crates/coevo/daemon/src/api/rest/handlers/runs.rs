//! Run lifecycle handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use coevo_types::{Dataset, EvolutionConfig, FinalReport, GenerationData, ModelArch, RunPhase};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub datasets: Vec<Dataset>,
    pub models: Vec<ModelArch>,
    pub default_config: EvolutionConfig,
}

/// Fixed choices for the configuration form
pub async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        datasets: Dataset::ALL.to_vec(),
        models: ModelArch::ALL.to_vec(),
        default_config: EvolutionConfig::default(),
    })
}

#[derive(Debug, Serialize)]
pub struct PhaseResponse {
    pub phase: RunPhase,
}

/// Start a run with the posted configuration
pub async fn start_run(
    State(state): State<AppState>,
    Json(config): Json<EvolutionConfig>,
) -> ApiResult<Json<PhaseResponse>> {
    state.controller.start(config).await?;
    Ok(Json(PhaseResponse {
        phase: state.controller.phase().await,
    }))
}

/// Request cooperative cancellation of the active run
pub async fn stop_run(State(state): State<AppState>) -> Json<PhaseResponse> {
    state.controller.request_stop().await;
    Json(PhaseResponse {
        phase: state.controller.phase().await,
    })
}

/// Clear run state and return to CONFIGURING
pub async fn reset_run(State(state): State<AppState>) -> ApiResult<Json<PhaseResponse>> {
    state.controller.reset().await?;
    Ok(Json(PhaseResponse {
        phase: state.controller.phase().await,
    }))
}

/// Snapshot of the generations completed so far
pub async fn get_log(State(state): State<AppState>) -> Json<Vec<GenerationData>> {
    Json(state.controller.log_snapshot().await)
}

/// The final report, once a run has finished
pub async fn get_report(State(state): State<AppState>) -> ApiResult<Json<FinalReport>> {
    state
        .controller
        .report()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no finished run".to_string()))
}
