//! SQLite record store for the renewal agent.
//!
//! Holds two append-only tables: parsed insurance policies and conversation
//! turns. There is no business logic here, only inserts and lookups.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, Database, TurnRole};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:agentic_ai.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     conversation::append_turn(db.pool(), "session-1", TurnRole::User, "I want to renew").await?;
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod models;
pub mod policy;

pub use error::{DatabaseError, Result};
pub use models::{ConversationTurn, NewPolicy, PolicyRecord, TurnRole};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` with [`connect_with_pool_size`](Self::connect_with_pool_size)
    /// and a size of 1 for tests, since each in-memory connection is its own database.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Create the `policies` and `conversations` tables if missing.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
