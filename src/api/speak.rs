//! Text-to-speech proxy endpoint

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::Error;

/// Message returned when `text` is absent or blank
pub const MISSING_TEXT: &str = "Missing required field: text";

/// Message returned for transport and other unexpected failures
pub const TTS_FAILED: &str = "Text-to-speech failed";

/// Build speak router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/speak", post(speak))
        .with_state(state)
}

/// Speak request body
#[derive(Debug, Default, Deserialize)]
pub struct SpeakRequest {
    pub text: Option<String>,
    pub voice_id: Option<String>,
}

/// Synthesize text through the TTS provider
///
/// Returns the provider's MP3 bytes unchanged
async fn speak(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<SpeakRequest>, JsonRejection>,
) -> Result<Response, SpeakError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected speak body");
        SpeakError::Validation(MISSING_TEXT.to_string())
    })?;

    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| SpeakError::Validation(MISSING_TEXT.to_string()))?;

    let audio = state
        .synthesizer
        .synthesize(&text, request.voice_id.as_deref())
        .await?;

    tracing::debug!(bytes = audio.len(), "speech synthesized");

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// Speak endpoint errors
#[derive(Debug)]
pub enum SpeakError {
    /// Bad or missing input, nothing was forwarded
    Validation(String),
    /// Provider failure, passed through verbatim
    Upstream { status: StatusCode, body: String },
    /// Anything else; details stay in the log
    Internal,
}

impl From<Error> for SpeakError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => Self::Validation(message),
            Error::Upstream { status, body } => {
                tracing::warn!(status, "TTS provider returned an error");
                Self::Upstream {
                    status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    body,
                }
            }
            other => {
                tracing::error!(error = %other, "text-to-speech failed");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for SpeakError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        match self {
            Self::Validation(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            Self::Upstream { status, body } => (status, body).into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: TTS_FAILED.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
