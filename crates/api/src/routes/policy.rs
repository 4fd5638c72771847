//! Policy document parsing.

use axum::extract::State;
use axum::Json;
use database::policy;
use orchestrator::PolicyExtraction;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::required;
use crate::error::{ApiError, Result};
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ParsePolicyRequest {
    /// Text extracted from a policy document.
    pub text: Option<String>,
    /// Accepted in place of `text`; its value is parsed as text.
    pub file_url: Option<String>,
}

/// Extract policy fields from text, store them as a new record, and return
/// the extraction with the record id under `_db_id`.
pub async fn parse_policy(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ParsePolicyRequest>,
) -> Result<Json<Value>> {
    let text = required(req.text)
        .or_else(|| required(req.file_url))
        .ok_or_else(|| {
            ApiError::validation("Provide 'text' (extracted PDF text) or 'file_url' (text).")
        })?;

    let extraction: PolicyExtraction = state
        .extractor
        .extract(&state.prompts.policy, &text)
        .await
        .map_err(|e| ApiError::extraction("LLM parsing failed", e))?;

    let record = policy::insert_policy(state.db.pool(), &extraction.to_new_policy()).await?;
    info!(
        policy_id = %record.id,
        policy_number = ?record.policy_number,
        "Parsed and stored policy"
    );

    let mut body = extraction.to_value();
    if let Value::Object(map) = &mut body {
        map.insert("_db_id".to_string(), Value::String(record.id));
    }

    Ok(Json(body))
}
