//! Conversation turn persistence.

use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{now_timestamp, ConversationTurn, TurnRole};

#[derive(FromRow)]
struct TurnRow {
    id: String,
    session_id: String,
    role: String,
    message: String,
    created_at: String,
}

impl TryFrom<TurnRow> for ConversationTurn {
    type Error = crate::DatabaseError;

    fn try_from(row: TurnRow) -> Result<Self> {
        Ok(ConversationTurn {
            id: row.id,
            session_id: row.session_id,
            role: TurnRole::from_column(&row.role)?,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Append a turn to a session.
pub async fn append_turn(
    pool: &SqlitePool,
    session_id: &str,
    role: TurnRole,
    message: &str,
) -> Result<ConversationTurn> {
    let turn = ConversationTurn {
        id: Uuid::new_v4().to_string(),
        session_id: session_id.to_string(),
        role,
        message: message.to_string(),
        created_at: now_timestamp(),
    };

    sqlx::query(
        r#"
        INSERT INTO conversations (id, session_id, role, message, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&turn.id)
    .bind(&turn.session_id)
    .bind(turn.role.as_str())
    .bind(&turn.message)
    .bind(&turn.created_at)
    .execute(pool)
    .await?;

    Ok(turn)
}

/// List a session's turns, oldest first.
pub async fn list_turns(pool: &SqlitePool, session_id: &str) -> Result<Vec<ConversationTurn>> {
    let rows = sqlx::query_as::<_, TurnRow>(
        r#"
        SELECT id, session_id, role, message, created_at
        FROM conversations
        WHERE session_id = ?
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ConversationTurn::try_from).collect()
}
