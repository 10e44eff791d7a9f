//! Reply endpoint for browser front ends

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use super::ApiState;
use crate::brain::Reply;

/// Build think router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/think", post(think))
        .with_state(state)
}

/// Think request body
#[derive(Debug, Default, Deserialize)]
pub struct ThinkRequest {
    #[serde(default)]
    pub text: String,
}

/// Compute the assistant's reply to a transcript
async fn think(State(state): State<Arc<ApiState>>, Json(request): Json<ThinkRequest>) -> Json<Reply> {
    Json(state.engine.respond(&request.text))
}
