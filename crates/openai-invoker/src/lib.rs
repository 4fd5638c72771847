//! OpenAI-compatible model invoker.
//!
//! Sends role-tagged prompts to a `/v1/chat/completions` endpoint and returns
//! the first choice's text. The credential is optional at construction time:
//! a missing key is reported as [`InvokerError::Configuration`] on the first
//! call, before any request leaves the process.
//!
//! ```rust,no_run
//! use openai_invoker::{OpenAiConfig, OpenAiInvoker};
//! use invoker_core::{CompletionRequest, ModelInvoker};
//!
//! # async fn example() -> Result<(), invoker_core::InvokerError> {
//! let config = OpenAiConfig::builder().api_key("sk-test").build();
//! let invoker = OpenAiInvoker::new(config)?;
//! let text = invoker
//!     .invoke(CompletionRequest::new("Reply with JSON.", "hello", 100))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod api_types;
mod config;
mod invoker;

pub use config::OpenAiConfig;
pub use invoker::OpenAiInvoker;

pub use invoker_core::{InvokerError, ModelInvoker};
