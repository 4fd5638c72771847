//! Scripted invoker - replays queued responses in order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use invoker_core::{CompletionRequest, InvokerError, ModelInvoker};

/// An invoker that pops one queued result per call.
///
/// When the queue is exhausted every further call fails with an
/// invocation error, which makes unexpected extra calls visible in tests.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<Result<String, InvokerError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedInvoker {
    /// Create an invoker with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    /// Queue a failure.
    pub fn fail(self, error: InvokerError) -> Self {
        self.push(Err(error))
    }

    fn push(self, result: Result<String, InvokerError>) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(result);
        }
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, request: CompletionRequest) -> Result<String, InvokerError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(InvokerError::Invocation("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "ScriptedInvoker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_fails() {
        let invoker = ScriptedInvoker::new()
            .reply("first")
            .fail(InvokerError::Invocation("quota".to_string()));

        let request = CompletionRequest::new("s", "u", 10);
        assert_eq!(invoker.invoke(request.clone()).await.unwrap(), "first");
        assert!(invoker.invoke(request.clone()).await.is_err());

        let exhausted = invoker.invoke(request).await.unwrap_err();
        assert_eq!(exhausted, InvokerError::Invocation("script exhausted".to_string()));
        assert_eq!(invoker.call_count(), 3);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let invoker = ScriptedInvoker::new().reply("{}");
        invoker
            .invoke(CompletionRequest::new("rules", "hello", 50))
            .await
            .unwrap();

        let requests = invoker.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_content(), Some("hello"));
        assert_eq!(requests[0].max_tokens, 50);
    }
}
