use axum::{extract::State, Json};

use crate::api::{
    state::AppState,
    types::{HealthResponse, ModelStatus},
};

/// GET /healthz -- liveness probe listing the loaded artifacts
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let models = state
        .registry
        .models()
        .iter()
        .map(|m| ModelStatus {
            name: m.kind.name(),
            backend: m.backend(),
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        scaler: state.registry.scaler().kind(),
        models,
        uptime_secs: state.uptime_seconds(),
    })
}
