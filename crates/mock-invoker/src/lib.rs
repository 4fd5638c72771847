//! Mock model invokers for tests.
//!
//! - `ScriptedInvoker` - Replays a fixed queue of responses in call order
//! - `PromptMatchInvoker` - Answers according to which system prompt it sees
//!
//! Both record every request they receive so tests can assert on prompts.
//!
//! # Example
//!
//! ```rust
//! use mock_invoker::{CompletionRequest, ModelInvoker, ScriptedInvoker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let invoker = ScriptedInvoker::new().reply(r#"{"ok": true}"#);
//!     let text = invoker
//!         .invoke(CompletionRequest::new("system", "user", 10))
//!         .await
//!         .unwrap();
//!     assert_eq!(text, r#"{"ok": true}"#);
//! }
//! ```

mod prompt_match;
mod scripted;

pub use invoker_core::{async_trait, CompletionRequest, InvokerError, ModelInvoker};

pub use prompt_match::PromptMatchInvoker;
pub use scripted::ScriptedInvoker;
