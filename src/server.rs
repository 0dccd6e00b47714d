//! HTTP server lifecycle: bind, serve until a shutdown signal, drain.

use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::error::{HealError, Result};
use crate::ml::ModelRegistry;

/// Serve the prediction API with an already loaded registry.
pub async fn serve(config: &AppConfig, registry: ModelRegistry) -> Result<()> {
    let state = AppState::new(registry);
    let mut app = create_router(state);
    if config.server.debug {
        app = app.layer(TraceLayer::new_for_http());
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Serving on http://{} (debug={})",
        listener.local_addr()?,
        config.server.debug
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HealError::Internal(format!("server error: {}", e)))?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
