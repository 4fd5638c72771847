//! Structured extraction and dialogue orchestration for the renewal agent.
//!
//! This crate turns free-text model output into typed objects and runs the
//! per-message agent flow on top of them.
//!
//! # Features
//!
//! - Strict JSON extraction with exactly one corrective retry
//! - Typed, range-checked schemas for every model-produced object
//! - Concurrent intent and sentiment classification
//! - Degraded defaults instead of failures inside a dialogue turn
//! - Mock payment links and SMS receipts
//!
//! # Architecture
//!
//! ```text
//! AgentRequest (from the HTTP layer)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DIALOGUE ORCHESTRATOR                      │
//! │                                                             │
//! │  1. Log user turn                                           │
//! │         ↓                                                   │
//! │  2. Load latest policy for policy_number (optional)         │
//! │         ↓                                                   │
//! │  3. Classify (concurrently, fallback on failure):           │
//! │     • intent    → out_of_scope / 0.5                        │
//! │     • sentiment → neutral / 0.5                             │
//! │         ↓                                                   │
//! │  4. Agent decision (fallback: escalate_human)               │
//! │         ↓                                                   │
//! │  5. initiate_payment → attach mock payment link             │
//! │         ↓                                                   │
//! │  6. Log agent turn                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orchestrator::{AgentRequest, DialogueOrchestrator, PromptSet, StructuredExtractor};
//!
//! let extractor = StructuredExtractor::new(Arc::new(invoker));
//! let dialogue = DialogueOrchestrator::new(extractor, Arc::new(PromptSet::default()), db);
//!
//! let reply = dialogue
//!     .handle_message(AgentRequest {
//!         message: "I want to renew".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}", reply.decision.reply);
//! ```

mod dialogue;
mod error;
mod extractor;
pub mod notify;
pub mod payment;
mod prompts;
mod schema;

pub use dialogue::{build_decision_prompt, AgentReply, AgentRequest, DialogueOrchestrator};
pub use error::{ExtractError, OrchestratorError};
pub use extractor::StructuredExtractor;
pub use notify::{send_sms, SmsReceipt};
pub use payment::{initiate_payment, PaymentLink, MOCK_PAYMENT_BASE_URL};
pub use prompts::{
    PromptSet, PromptTemplate, AGENT_RULES_PROMPT, NLU_PROMPT, POLICY_PARSER_PROMPT,
    SENTIMENT_PROMPT,
};
pub use schema::{
    AgentAction, AgentDecision, AssetDetails, Intent, IntentResult, Language, PolicyExtraction,
    Schema, Sentiment, SentimentResult, FALLBACK_REPLY,
};
