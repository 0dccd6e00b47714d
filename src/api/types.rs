use serde::Serialize;

use crate::ml::PredictionSet;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub predictions: PredictionSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub name: &'static str,
    pub backend: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub scaler: &'static str,
    pub models: Vec<ModelStatus>,
    pub uptime_secs: i64,
}

impl axum::response::IntoResponse for crate::error::HealError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), axum::Json(body)).into_response()
    }
}
