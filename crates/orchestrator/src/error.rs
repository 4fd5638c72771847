//! Error types for extraction and orchestration.

use invoker_core::InvokerError;
use thiserror::Error;

/// Errors from a structured extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The model call itself failed; no corrective retry is attempted.
    #[error(transparent)]
    Invoker(#[from] InvokerError),

    /// The model's output was not a valid object for the schema, twice.
    #[error("{schema} extraction failed: {detail}")]
    ExtractionFailed {
        /// Schema name.
        schema: &'static str,
        /// Last parse or validation error.
        detail: String,
    },
}

/// Errors that can escape an orchestrated operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// A required input field was missing or empty.
    #[error("{0}")]
    Validation(String),
}
