//! Agent conversation endpoint.

use axum::extract::State;
use axum::Json;
use orchestrator::{AgentReply, AgentRequest, Language};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MessageRequest {
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub policy_number: Option<String>,
    /// `en` or `hi`; anything else reads as English.
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub language: Option<String>,
    pub message: Option<String>,
}

impl From<MessageRequest> for AgentRequest {
    fn from(req: MessageRequest) -> Self {
        let language = req
            .language
            .as_deref()
            .and_then(|code| {
                let parsed = Language::from_code(code);
                if parsed.is_none() {
                    debug!(language = %code, "Unsupported language, using English");
                }
                parsed
            })
            .unwrap_or_default();

        AgentRequest {
            session_id: req.session_id,
            policy_number: req.policy_number,
            language,
            message: req.message.unwrap_or_default(),
        }
    }
}

/// Run one dialogue turn. Only an empty message is an error.
pub async fn message(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<MessageRequest>,
) -> Result<Json<AgentReply>> {
    let reply = state.dialogue.handle_message(req.into()).await?;
    Ok(Json(reply))
}
