//! Mock payment initiation.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::extract::JsonBody;

#[derive(Debug, Default, Deserialize)]
pub struct InitiateRequest {
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub policy_number: Option<String>,
    /// Number or numeric string.
    pub amount: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct InitiateResponse {
    pub id: String,
    pub payment_link: String,
}

pub async fn initiate(JsonBody(req): JsonBody<InitiateRequest>) -> Result<Json<InitiateResponse>> {
    let payment =
        orchestrator::initiate_payment(req.policy_number.as_deref(), req.amount.as_ref())?;

    Ok(Json(InitiateResponse {
        id: payment.payment_id,
        payment_link: payment.payment_link,
    }))
}
