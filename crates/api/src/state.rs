//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use invoker_core::ModelInvoker;
use orchestrator::{DialogueOrchestrator, PromptSet, StructuredExtractor};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Strict-JSON wrapper around the model.
    pub extractor: StructuredExtractor,
    /// Prompt templates.
    pub prompts: Arc<PromptSet>,
    /// Agent message flow.
    pub dialogue: Arc<DialogueOrchestrator>,
}

impl AppState {
    /// Create new application state around a model invoker.
    pub fn new(db: Database, invoker: Arc<dyn ModelInvoker>, prompts: PromptSet) -> Self {
        let extractor = StructuredExtractor::new(invoker);
        let prompts = Arc::new(prompts);
        let dialogue = Arc::new(DialogueOrchestrator::new(
            extractor.clone(),
            prompts.clone(),
            db.clone(),
        ));

        Self {
            db,
            extractor,
            prompts,
            dialogue,
        }
    }
}
