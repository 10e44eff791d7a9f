//! HTTP API server for the assistant

pub mod health;
pub mod speak;
pub mod think;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::brain::ResponseEngine;
use crate::voice::Synthesizer;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub synthesizer: Arc<dyn Synthesizer>,
    pub engine: Arc<ResponseEngine>,
    /// Whether a provider API key was configured
    pub tts_configured: bool,
    pub static_dir: Option<PathBuf>,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub const fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(&self.state)
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "server ready → http://localhost:{}", self.port);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// Build the application router
pub fn build_router(state: &Arc<ApiState>) -> Router {
    let mut router = Router::new()
        .merge(speak::router(state.clone()))
        .merge(think::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state.clone()));

    // Serve static files if the directory exists
    if let Some(static_dir) = &state.static_dir {
        if static_dir.is_dir() {
            let index_file = static_dir.join("index.html");
            let serve_dir =
                ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file));

            router = router.fallback_service(serve_dir);
            tracing::info!(path = %static_dir.display(), "serving static files");
        } else {
            tracing::warn!(path = %static_dir.display(), "static directory not found, UI not served");
        }
    }

    // CORS layer for cross-origin requests from the UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
