//! Prompt-matching invoker - picks a response by system prompt content.

use std::sync::Mutex;

use async_trait::async_trait;
use invoker_core::{CompletionRequest, InvokerError, ModelInvoker};

/// An invoker that answers each call with the first rule whose needle
/// occurs in the request's system prompt.
///
/// Unlike [`ScriptedInvoker`](crate::ScriptedInvoker) the answer does not
/// depend on call order, so it suits flows that fan out concurrently.
/// Calls matching no rule fail with an invocation error.
#[derive(Debug, Default)]
pub struct PromptMatchInvoker {
    rules: Vec<(String, Result<String, InvokerError>)>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl PromptMatchInvoker {
    /// Create an invoker with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with `text` whenever the system prompt contains `needle`.
    pub fn when(mut self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Ok(text.into())));
        self
    }

    /// Fail with `error` whenever the system prompt contains `needle`.
    pub fn fail_when(mut self, needle: impl Into<String>, error: InvokerError) -> Self {
        self.rules.push((needle.into(), Err(error)));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of calls whose system prompt contained `needle`.
    pub fn calls_matching(&self, needle: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.system_prompt().is_some_and(|s| s.contains(needle)))
            .count()
    }
}

#[async_trait]
impl ModelInvoker for PromptMatchInvoker {
    async fn invoke(&self, request: CompletionRequest) -> Result<String, InvokerError> {
        let system = request.system_prompt().unwrap_or_default().to_string();

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        self.rules
            .iter()
            .find(|(needle, _)| system.contains(needle.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Err(InvokerError::Invocation("no matching rule".to_string())))
    }

    fn name(&self) -> &str {
        "PromptMatchInvoker"
    }
}
