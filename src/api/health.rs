//! Liveness and readiness probes

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// `/health` body
#[derive(Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

/// `/ready` body
#[derive(Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub checks: Checks,
}

#[derive(Serialize)]
pub struct Checks {
    /// Provider API key present
    pub tts: Check,
    /// Web UI directory present
    pub static_assets: Check,
}

#[derive(Serialize)]
pub struct Check {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Check {
    const fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            status: "unavailable",
            message: Some(reason.into()),
        }
    }
}

async fn health() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// A missing API key or asset directory degrades the service but `/think`
/// keeps working, so this always answers 200 and reports per-check status.
async fn ready(State(state): State<Arc<ApiState>>) -> Json<Readiness> {
    let tts = if state.tts_configured {
        Check::ok()
    } else {
        Check::unavailable("ELEVENLABS_API_KEY not set")
    };

    let static_assets = match &state.static_dir {
        Some(dir) if dir.is_dir() => Check::ok(),
        Some(dir) => Check::unavailable(format!("{} not found", dir.display())),
        None => Check::unavailable("not configured"),
    };

    Json(Readiness {
        status: "ok",
        checks: Checks { tts, static_assets },
    })
}

/// `/health`, stateless
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// `/ready`
pub fn ready_router(state: Arc<ApiState>) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
