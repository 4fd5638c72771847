//! Policy record persistence.

use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{now_timestamp, NewPolicy, PolicyRecord};

#[derive(FromRow)]
struct PolicyRow {
    id: String,
    policy_number: Option<String>,
    customer_name: Option<String>,
    customer_contact: Option<String>,
    policy_type: Option<String>,
    insurer_name: Option<String>,
    expiry_date: Option<String>,
    premium_amount: Option<f64>,
    no_claim_bonus_percent: Option<f64>,
    eligible_upsells: String,
    raw_extraction: String,
    created_at: String,
}

impl TryFrom<PolicyRow> for PolicyRecord {
    type Error = DatabaseError;

    fn try_from(row: PolicyRow) -> Result<Self> {
        let eligible_upsells =
            serde_json::from_str(&row.eligible_upsells).map_err(|e| DatabaseError::Corrupt {
                column: "policies.eligible_upsells",
                reason: e.to_string(),
            })?;
        let raw_extraction =
            serde_json::from_str(&row.raw_extraction).map_err(|e| DatabaseError::Corrupt {
                column: "policies.raw_extraction",
                reason: e.to_string(),
            })?;

        Ok(PolicyRecord {
            id: row.id,
            policy_number: row.policy_number,
            customer_name: row.customer_name,
            customer_contact: row.customer_contact,
            policy_type: row.policy_type,
            insurer_name: row.insurer_name,
            expiry_date: row.expiry_date,
            premium_amount: row.premium_amount,
            no_claim_bonus_percent: row.no_claim_bonus_percent,
            eligible_upsells,
            raw_extraction,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, policy_number, customer_name, customer_contact, policy_type, insurer_name,
           expiry_date, premium_amount, no_claim_bonus_percent, eligible_upsells,
           raw_extraction, created_at
    FROM policies
"#;

/// Insert a new policy record with a freshly generated ID.
///
/// No deduplication happens here: inserting the same policy number twice
/// yields two records.
pub async fn insert_policy(pool: &SqlitePool, policy: &NewPolicy) -> Result<PolicyRecord> {
    let id = Uuid::new_v4().to_string();
    let created_at = now_timestamp();
    let eligible_upsells = serde_json::to_string(&policy.eligible_upsells).map_err(|e| {
        DatabaseError::Corrupt {
            column: "policies.eligible_upsells",
            reason: e.to_string(),
        }
    })?;
    let raw_extraction = policy.raw_extraction.to_string();

    sqlx::query(
        r#"
        INSERT INTO policies (
            id, policy_number, customer_name, customer_contact, policy_type, insurer_name,
            expiry_date, premium_amount, no_claim_bonus_percent, eligible_upsells,
            raw_extraction, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&policy.policy_number)
    .bind(&policy.customer_name)
    .bind(&policy.customer_contact)
    .bind(&policy.policy_type)
    .bind(&policy.insurer_name)
    .bind(&policy.expiry_date)
    .bind(policy.premium_amount)
    .bind(policy.no_claim_bonus_percent)
    .bind(&eligible_upsells)
    .bind(&raw_extraction)
    .bind(&created_at)
    .execute(pool)
    .await?;

    tracing::debug!(policy_id = %id, policy_number = ?policy.policy_number, "Stored policy");

    Ok(PolicyRecord {
        id,
        policy_number: policy.policy_number.clone(),
        customer_name: policy.customer_name.clone(),
        customer_contact: policy.customer_contact.clone(),
        policy_type: policy.policy_type.clone(),
        insurer_name: policy.insurer_name.clone(),
        expiry_date: policy.expiry_date.clone(),
        premium_amount: policy.premium_amount,
        no_claim_bonus_percent: policy.no_claim_bonus_percent,
        eligible_upsells: policy.eligible_upsells.clone(),
        raw_extraction: policy.raw_extraction.clone(),
        created_at,
    })
}

/// Get a policy by its generated ID.
pub async fn get_policy(pool: &SqlitePool, id: &str) -> Result<PolicyRecord> {
    let row = sqlx::query_as::<_, PolicyRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Policy",
            id: id.to_string(),
        })?;

    row.try_into()
}

/// Find the most recently stored policy with the given policy number.
pub async fn find_latest_by_number(
    pool: &SqlitePool,
    policy_number: &str,
) -> Result<Option<PolicyRecord>> {
    let row = sqlx::query_as::<_, PolicyRow>(&format!(
        "{} WHERE policy_number = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
        SELECT_COLUMNS
    ))
    .bind(policy_number)
    .fetch_optional(pool)
    .await?;

    row.map(PolicyRecord::try_from).transpose()
}

/// Count stored policy records.
pub async fn count_policies(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM policies
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
