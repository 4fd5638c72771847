//! Insurance renewal agent API server.

use std::sync::Arc;

use api::{AppState, Config};
use database::Database;
use openai_invoker::OpenAiInvoker;
use orchestrator::PromptSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, model = %config.openai.model, "Starting renewal agent API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let invoker = OpenAiInvoker::new(config.openai.clone())?;
    let prompts = PromptSet::load(config.agent_prompt_file.as_deref());

    // Build application state
    let state = AppState::new(db, Arc::new(invoker), prompts);
    info!(invoker = state.extractor.invoker_name(), "Model invoker ready");
    let app = api::app(state);

    // Start server
    info!(addr = %config.addr, "Renewal agent API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
