//! The ModelInvoker trait definition.

use async_trait::async_trait;

use crate::error::InvokerError;
use crate::message::CompletionRequest;

/// A boundary to an external text-generation service.
///
/// Implementations make exactly one outbound call per [`invoke`](Self::invoke)
/// and never retry; retry policy belongs to the caller. The trait is
/// object-safe and is shared as `Arc<dyn ModelInvoker>`.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send the prompt and return the model's raw text completion.
    async fn invoke(&self, request: CompletionRequest) -> Result<String, InvokerError>;

    /// Human-readable name of the implementation.
    fn name(&self) -> &str;
}
