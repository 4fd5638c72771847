//! Structured extraction on top of a free-text model.

use std::sync::Arc;

use invoker_core::{CompletionRequest, ModelInvoker};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::ExtractError;
use crate::prompts::PromptTemplate;
use crate::schema::Schema;

/// Enforces "reply with a single JSON object matching the schema" on a model,
/// with exactly one corrective retry.
///
/// Cloning is cheap; clones share the invoker.
#[derive(Clone)]
pub struct StructuredExtractor {
    invoker: Arc<dyn ModelInvoker>,
}

impl StructuredExtractor {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    /// Name of the underlying invoker.
    pub fn invoker_name(&self) -> &str {
        self.invoker.name()
    }

    /// Extract a `T` from `payload` using `template`'s instructions.
    ///
    /// 1. Invoke with the system prompt and payload at temperature 0.
    /// 2. Parse and validate the output.
    /// 3. On failure, invoke once more with the parse error and the original
    ///    payload, asking for the JSON object only.
    /// 4. A second failure is [`ExtractError::ExtractionFailed`].
    ///
    /// Invocation errors are returned immediately at either step.
    pub async fn extract<T: Schema>(
        &self,
        template: &PromptTemplate,
        payload: &str,
    ) -> Result<T, ExtractError> {
        let first = self
            .invoker
            .invoke(CompletionRequest::new(&template.system, payload, template.max_tokens))
            .await?;
        trace!(schema = T::NAME, raw = %first, "EXTRACT_RAW_RESPONSE");

        let error = match Self::parse::<T>(&first) {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        warn!(schema = T::NAME, error = %error, "EXTRACT_PARSE_FAILED, retrying once");

        let retry = self
            .invoker
            .invoke(CompletionRequest::new(
                &template.system,
                Self::corrective_payload(payload, &error),
                template.max_tokens,
            ))
            .await?;
        trace!(schema = T::NAME, raw = %retry, "EXTRACT_RETRY_RAW_RESPONSE");

        match Self::parse::<T>(&retry) {
            Ok(value) => {
                debug!(schema = T::NAME, "EXTRACT_RETRY_SUCCEEDED");
                Ok(value)
            }
            Err(detail) => {
                warn!(schema = T::NAME, error = %detail, "EXTRACT_RETRY_FAILED");
                Err(ExtractError::ExtractionFailed {
                    schema: T::NAME,
                    detail,
                })
            }
        }
    }

    /// Parse model output into a validated `T`.
    ///
    /// The output must contain a JSON object; surrounding prose or a markdown
    /// fence is tolerated.
    pub fn parse<T: Schema>(raw: &str) -> Result<T, String> {
        let candidate = locate_json_object(raw);
        let value: Value = serde_json::from_str(candidate).map_err(|e| e.to_string())?;

        if !value.is_object() {
            return Err("expected a single JSON object".to_string());
        }

        let parsed: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
        parsed
            .validate()
            .map_err(|e| format!("schema violation: {}", e))?;
        Ok(parsed)
    }

    /// The user message for the corrective retry.
    pub fn corrective_payload(payload: &str, error: &str) -> String {
        format!(
            "Please re-output ONLY the JSON object. Previous attempt error: {}\n\nOriginal text:\n{}",
            error, payload
        )
    }
}

/// Find the JSON object inside a model response.
///
/// Handles bare objects, fenced code blocks, and objects preceded by prose.
/// Returns the trimmed input unchanged when no `{` is present so the parser
/// reports a meaningful error.
fn locate_json_object(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with('{') {
        return balanced_object(trimmed);
    }

    if let Some(fenced) = fenced_block(trimmed) {
        if let Some(start) = fenced.find('{') {
            return balanced_object(&fenced[start..]);
        }
        return fenced;
    }

    match trimmed.find('{') {
        Some(start) => balanced_object(&trimmed[start..]),
        None => trimmed,
    }
}

/// Body of the first ``` fenced block, skipping an optional language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Cut `s` (which starts with `{`) at the brace that closes the first object.
///
/// Models sometimes append stray braces or commentary after the object.
/// Braces inside string literals are ignored. Unbalanced input is returned
/// whole.
fn balanced_object(s: &str) -> &str {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptSet;
    use crate::schema::{Intent, IntentResult, PolicyExtraction, Sentiment, SentimentResult};
    use invoker_core::InvokerError;
    use mock_invoker::ScriptedInvoker;

    fn extractor(invoker: Arc<ScriptedInvoker>) -> StructuredExtractor {
        StructuredExtractor::new(invoker)
    }

    #[test]
    fn test_balanced_object_trailing_braces() {
        let input = r#"{"intent": "renew_now", "entities": {}}}}"#;
        assert_eq!(balanced_object(input), r#"{"intent": "renew_now", "entities": {}}"#);
    }

    #[test]
    fn test_balanced_object_ignores_braces_in_strings() {
        let input = r#"{"reply": "use code {SAVE10} \"now\"", "action": "none"} thanks"#;
        assert_eq!(
            balanced_object(input),
            r#"{"reply": "use code {SAVE10} \"now\"", "action": "none"}"#
        );
    }

    #[test]
    fn test_locate_json_in_fence_and_prose() {
        let fenced = "Here you go:\n```json\n{\"sentiment\": \"positive\", \"score\": 0.9}\n```";
        assert_eq!(locate_json_object(fenced), r#"{"sentiment": "positive", "score": 0.9}"#);

        let prose = r#"Sure! {"sentiment": "neutral", "score": 0.4} Hope that helps."#;
        assert_eq!(locate_json_object(prose), r#"{"sentiment": "neutral", "score": 0.4}"#);

        assert_eq!(locate_json_object("  no json here "), "no json here");
    }

    #[test]
    fn test_parse_rejects_arrays_and_schema_violations() {
        assert!(StructuredExtractor::parse::<SentimentResult>(r#"["positive", 0.9]"#).is_err());

        let err = StructuredExtractor::parse::<SentimentResult>(r#"{"sentiment": "positive", "score": 7}"#)
            .unwrap_err();
        assert!(err.starts_with("schema violation"));
    }

    #[tokio::test]
    async fn test_first_attempt_success_makes_one_call() {
        let invoker = Arc::new(ScriptedInvoker::new().reply(r#"{"sentiment":"positive","score":0.91}"#));
        let prompts = PromptSet::default();

        let result: SentimentResult = extractor(invoker.clone())
            .extract(&prompts.sentiment, "love it")
            .await
            .unwrap();

        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(invoker.call_count(), 1);

        let request = &invoker.requests()[0];
        assert_eq!(request.system_prompt(), Some(prompts.sentiment.system.as_str()));
        assert_eq!(request.user_content(), Some("love it"));
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, 100);
    }

    #[tokio::test]
    async fn test_retry_carries_error_and_original_payload() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("Sure, the intent is renew_now.")
                .reply(r#"{"intent":"renew_now","confidence":0.8,"entities":{"policy_number":"POL123"}}"#),
        );
        let prompts = PromptSet::default();

        let result: IntentResult = extractor(invoker.clone())
            .extract(&prompts.intent, "renew POL123 please")
            .await
            .unwrap();

        assert_eq!(result.intent, Intent::RenewNow);
        assert_eq!(result.entities["policy_number"], "POL123");
        assert_eq!(invoker.call_count(), 2);

        let retry = &invoker.requests()[1];
        let content = retry.user_content().unwrap();
        assert!(content.starts_with("Please re-output ONLY the JSON object. Previous attempt error:"));
        assert!(content.ends_with("Original text:\nrenew POL123 please"));
        assert_eq!(retry.system_prompt(), Some(prompts.intent.system.as_str()));
        assert_eq!(retry.max_tokens, 200);
    }

    #[tokio::test]
    async fn test_schema_violation_triggers_retry() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply(r#"{"premium_amount": -5}"#)
                .reply(r#"{"policy_number": "POL9", "premium_amount": 5}"#),
        );

        let result: PolicyExtraction = extractor(invoker.clone())
            .extract(&PromptSet::default().policy, "policy text")
            .await
            .unwrap();

        assert_eq!(result.policy_number.as_deref(), Some("POL9"));
        assert_eq!(invoker.call_count(), 2);
        assert!(invoker.requests()[1]
            .user_content()
            .unwrap()
            .contains("premium_amount must be non-negative"));
    }

    #[tokio::test]
    async fn test_two_failures_is_extraction_failed_without_third_call() {
        let invoker = Arc::new(ScriptedInvoker::new().reply("not json").reply("still not json"));

        let err = extractor(invoker.clone())
            .extract::<SentimentResult>(&PromptSet::default().sentiment, "meh")
            .await
            .unwrap_err();

        match err {
            ExtractError::ExtractionFailed { schema, detail } => {
                assert_eq!(schema, "sentiment");
                assert!(!detail.is_empty());
            }
            other => panic!("expected ExtractionFailed, got {:?}", other),
        }
        assert_eq!(invoker.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invocation_error_is_not_retried() {
        let invoker = Arc::new(
            ScriptedInvoker::new().fail(InvokerError::Configuration("OPENAI_API_KEY not set".to_string())),
        );

        let err = extractor(invoker.clone())
            .extract::<IntentResult>(&PromptSet::default().intent, "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Invoker(InvokerError::Configuration(_))));
        assert_eq!(invoker.call_count(), 1);
    }
}
