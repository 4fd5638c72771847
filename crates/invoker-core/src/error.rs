//! Error types for model invocation.

use thiserror::Error;

/// Errors that can occur while calling the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokerError {
    /// The invoker is missing a credential or other required setting.
    ///
    /// Raised before any network traffic is attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The call itself failed (transport, timeout, quota, bad response).
    #[error("invocation failed: {0}")]
    Invocation(String),
}

impl InvokerError {
    /// Whether this error stems from missing configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, InvokerError::Configuration(_))
    }
}
