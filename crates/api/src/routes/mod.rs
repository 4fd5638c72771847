//! Route handlers.

pub mod agent;
pub mod health;
pub mod nlp;
pub mod notify;
pub mod payments;
pub mod policy;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/policy/parse", post(policy::parse_policy))
        .route("/v1/nlp/intent", post(nlp::intent))
        .route("/v1/nlp/sentiment", post(nlp::sentiment))
        .route("/v1/agent/message", post(agent::message))
        .route("/v1/payments/initiate", post(payments::initiate))
        .route("/v1/notify/sms", post(notify::sms))
}

/// Present and non-empty text.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Optional identifier field that also accepts JSON numbers and booleans.
///
/// Objects and arrays read as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Ids {
        #[serde(default, deserialize_with = "lenient_string")]
        policy_number: Option<String>,
    }

    fn ids(body: &str) -> Option<String> {
        serde_json::from_str::<Ids>(body).unwrap().policy_number
    }

    #[test]
    fn test_lenient_string_accepts_scalars() {
        assert_eq!(ids(r#"{"policy_number":"POL1"}"#).as_deref(), Some("POL1"));
        assert_eq!(ids(r#"{"policy_number":123}"#).as_deref(), Some("123"));
        assert_eq!(ids(r#"{"policy_number":true}"#).as_deref(), Some("true"));
        assert_eq!(ids(r#"{"policy_number":null}"#), None);
        assert_eq!(ids(r#"{"policy_number":{"a":1}}"#), None);
        assert_eq!(ids("{}"), None);
    }

    #[test]
    fn test_required_rejects_only_empty() {
        assert_eq!(required(None), None);
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(Some(" ".to_string())).as_deref(), Some(" "));
    }
}
