//! OpenAiInvoker implementation.

use invoker_core::{async_trait, CompletionRequest, InvokerError, ModelInvoker};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenAiConfig;

/// A model invoker that talks to an OpenAI-compatible chat completions API.
///
/// The invoker holds no per-request state; one instance is shared by every
/// handler for the lifetime of the process.
pub struct OpenAiInvoker {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiInvoker {
    /// Create a new invoker with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, InvokerError> {
        let client = Client::builder()
            .build()
            .map_err(|e| InvokerError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        if config.has_api_key() {
            info!("OpenAiInvoker initialized with model: {}", config.model);
        } else {
            warn!("OPENAI_API_KEY not set; model calls will fail until it is configured");
        }

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.api_url.trim_end_matches('/'))
    }
}

/// Describe a non-success response, using the structured error body when
/// the service sent one.
fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => match api_error.error.error_type {
            Some(kind) => format!("API error ({}, {}): {}", status, kind, api_error.error.message),
            None => format!("API error ({}): {}", status, api_error.error.message),
        },
        Err(_) => format!("API error ({}): {}", status, body),
    }
}

#[async_trait]
impl ModelInvoker for OpenAiInvoker {
    async fn invoke(&self, request: CompletionRequest) -> Result<String, InvokerError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| InvokerError::Configuration("OPENAI_API_KEY not set in environment".to_string()))?;

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            n: 1,
        };

        debug!(
            model = %self.config.model,
            max_tokens = request.max_tokens,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InvokerError::Invocation(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InvokerError::Invocation(api_error_message(
                status.as_u16(),
                &error_text,
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InvokerError::Invocation(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InvokerError::Invocation("response contained no choices".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!("Completion truncated at max_tokens={}", request.max_tokens);
        }

        choice
            .message
            .content
            .ok_or_else(|| InvokerError::Invocation("response message had no content".to_string()))
    }

    fn name(&self) -> &str {
        "OpenAiInvoker"
    }
}
