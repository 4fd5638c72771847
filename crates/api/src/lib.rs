//! HTTP API for the insurance renewal agent.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /v1/policy/parse` | Extract and store a policy from text |
//! | `POST /v1/nlp/intent` | Classify intent |
//! | `POST /v1/nlp/sentiment` | Classify sentiment |
//! | `POST /v1/agent/message` | One agent dialogue turn |
//! | `POST /v1/payments/initiate` | Mock payment link |
//! | `POST /v1/notify/sms` | Mock SMS |
//! | `GET /health` | Liveness |

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use state::AppState;

/// The full application router with state attached.
pub fn app(state: AppState) -> Router {
    routes::router().with_state(state)
}
