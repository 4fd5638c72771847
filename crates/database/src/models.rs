//! Database models.

use std::fmt;

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DatabaseError, Result};

/// An insurance policy extracted from free text.
///
/// Records are immutable once written; every successful parse creates a new
/// one, even when the policy number was seen before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Generated UUID.
    pub id: String,
    /// Natural lookup key; not unique.
    pub policy_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub policy_type: Option<String>,
    pub insurer_name: Option<String>,
    /// Expiry as `YYYY-MM-DD`.
    pub expiry_date: Option<String>,
    pub premium_amount: Option<f64>,
    /// No-claim bonus, 0 to 100.
    pub no_claim_bonus_percent: Option<f64>,
    pub eligible_upsells: Vec<String>,
    /// The full extraction object as persisted.
    pub raw_extraction: Value,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl PolicyRecord {
    /// Expiry as a calendar date, if present and well formed.
    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Fields for a policy about to be inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPolicy {
    pub policy_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub policy_type: Option<String>,
    pub insurer_name: Option<String>,
    pub expiry_date: Option<String>,
    pub premium_amount: Option<f64>,
    pub no_claim_bonus_percent: Option<f64>,
    pub eligible_upsells: Vec<String>,
    pub raw_extraction: Value,
}

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Agent,
}

impl TurnRole {
    /// Stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Agent => "agent",
        }
    }

    pub(crate) fn from_column(value: &str) -> Result<Self> {
        match value {
            "user" => Ok(TurnRole::User),
            "agent" => Ok(TurnRole::Agent),
            other => Err(DatabaseError::Corrupt {
                column: "conversations.role",
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a session. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Generated UUID.
    pub id: String,
    /// Groups turns into a session.
    pub session_id: String,
    pub role: TurnRole,
    pub message: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Current UTC time in the fixed-width format used for every timestamp column,
/// so lexical order matches chronological order.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_parses_iso_date() {
        let record = PolicyRecord {
            id: "p1".to_string(),
            policy_number: Some("POL1".to_string()),
            customer_name: None,
            customer_contact: None,
            policy_type: None,
            insurer_name: None,
            expiry_date: Some("2026-11-01".to_string()),
            premium_amount: Some(1200.0),
            no_claim_bonus_percent: None,
            eligible_upsells: vec![],
            raw_extraction: Value::Null,
            created_at: now_timestamp(),
        };
        assert_eq!(record.expiry(), NaiveDate::from_ymd_opt(2026, 11, 1));

        let bad = PolicyRecord {
            expiry_date: Some("next week".to_string()),
            ..record
        };
        assert_eq!(bad.expiry(), None);
    }

    #[test]
    fn test_role_column_round_trip() {
        assert_eq!(TurnRole::from_column("agent").unwrap(), TurnRole::Agent);
        assert!(TurnRole::from_column("system").is_err());
        assert_eq!(TurnRole::User.to_string(), "user");
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let first = now_timestamp();
        let second = now_timestamp();
        assert!(first <= second);
        assert!(first.ends_with('Z'));
    }
}
