//! Core trait and types for model invokers.
//!
//! This crate provides the boundary between the renewal agent and the
//! external text-generation service. It defines:
//!
//! - [`ModelInvoker`] - The trait every invoker implementation must implement
//! - [`ChatMessage`] / [`CompletionRequest`] - Role-tagged prompt input
//! - [`InvokerError`] - Configuration and invocation failures
//! - [`fingerprint_prompt`] - Stable fingerprints for prompt templates
//!
//! # Example
//!
//! ```rust
//! use invoker_core::{async_trait, CompletionRequest, InvokerError, ModelInvoker};
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl ModelInvoker for Canned {
//!     async fn invoke(&self, _request: CompletionRequest) -> Result<String, InvokerError> {
//!         Ok("{}".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Canned"
//!     }
//! }
//! ```

mod error;
mod message;
mod prompt;
mod trait_def;

pub use error::InvokerError;
pub use message::{ChatMessage, ChatRole, CompletionRequest};
pub use prompt::fingerprint_prompt;
pub use trait_def::ModelInvoker;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
