// HTTP routes for the interpretation API

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::AppState;
use crate::error::VerseenError;

#[derive(Debug, Clone, Deserialize)]
pub struct InterpretationRequest {
    #[serde(default)]
    pub artist: Option<String>,
    pub lyrics: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterpretationResponse {
    pub interpretation: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/interpret", post(interpret_lyrics))
}

/// 200 with the interpretation, 204 when the model produced none.
async fn interpret_lyrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InterpretationRequest>, JsonRejection>,
) -> Result<Response, VerseenError> {
    let Json(request) = payload?;
    if request.lyrics.trim().is_empty() {
        return Err(VerseenError::Validation("lyrics must not be empty".to_string()));
    }

    let artist = request
        .artist
        .as_deref()
        .map(str::trim)
        .filter(|artist| !artist.is_empty());

    let outcome = state.interpreter.interpret(&request.lyrics, artist).await?;

    match outcome {
        Some(interpretation) => Ok((
            StatusCode::OK,
            Json(InterpretationResponse {
                interpretation: interpretation.interpretation,
            }),
        )
            .into_response()),
        None => {
            debug!("No interpretation produced for request");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}
