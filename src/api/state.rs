use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::ml::ModelRegistry;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Fitted artifacts, loaded before serving and never mutated
    pub registry: Arc<ModelRegistry>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            start_time: Utc::now(),
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
