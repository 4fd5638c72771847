//! Mock SMS notification.

use axum::Json;
use orchestrator::SmsReceipt;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;

#[derive(Debug, Default, Deserialize)]
pub struct SmsRequest {
    pub to: Option<String>,
    pub text: Option<String>,
}

pub async fn sms(JsonBody(req): JsonBody<SmsRequest>) -> Result<Json<SmsReceipt>> {
    let receipt = orchestrator::send_sms(req.to.as_deref(), req.text.as_deref())?;
    Ok(Json(receipt))
}
