//! Standalone intent and sentiment classification.
//!
//! Unlike the agent flow, these endpoints have no fallback: extraction
//! failures are returned to the caller.

use axum::extract::State;
use axum::Json;
use orchestrator::{IntentResult, SentimentResult};
use serde::Deserialize;

use super::required;
use crate::error::{ApiError, Result};
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

pub async fn intent(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TextRequest>,
) -> Result<Json<IntentResult>> {
    let text = required(req.text).ok_or_else(|| ApiError::validation("text required"))?;

    state
        .extractor
        .extract(&state.prompts.intent, &text)
        .await
        .map(Json)
        .map_err(|e| ApiError::extraction("NLU LLM error", e))
}

pub async fn sentiment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TextRequest>,
) -> Result<Json<SentimentResult>> {
    let text = required(req.text).ok_or_else(|| ApiError::validation("text required"))?;

    state
        .extractor
        .extract(&state.prompts.sentiment, &text)
        .await
        .map(Json)
        .map_err(|e| ApiError::extraction("Sentiment LLM error", e))
}
