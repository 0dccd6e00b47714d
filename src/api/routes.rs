use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::entry))
        .route("/index", get(handlers::index))
        // Inference
        .route("/predict", post(handlers::predict))
        // Liveness
        .route("/healthz", get(handlers::health_handler))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
