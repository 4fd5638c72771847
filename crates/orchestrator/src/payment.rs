//! Mock payment provider.
//!
//! Nothing here contacts a real gateway or persists state; ids and links are
//! synthesized locally.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::OrchestratorError;

/// Base of every mock payment link.
pub const MOCK_PAYMENT_BASE_URL: &str = "https://mockpay.example/pay";

/// A synthesized payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentLink {
    /// `pay_` followed by eight hex characters.
    pub payment_id: String,
    pub payment_link: String,
    pub amount: Option<f64>,
}

impl PaymentLink {
    /// Create a payment with a fresh id.
    pub fn create(amount: Option<f64>) -> Self {
        let payment_id = format!("pay_{}", short_id());
        Self::with_id(payment_id, amount)
    }

    /// Create a payment with a known id; the link is derived from it.
    pub fn with_id(payment_id: impl Into<String>, amount: Option<f64>) -> Self {
        let payment_id = payment_id.into();
        let payment_link = format!("{}/{}", MOCK_PAYMENT_BASE_URL, payment_id);
        Self {
            payment_id,
            payment_link,
            amount,
        }
    }

    /// The `action_payload` attached to an `initiate_payment` decision.
    pub fn to_action_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("payment_id".to_string(), Value::String(self.payment_id.clone()));
        payload.insert("payment_link".to_string(), Value::String(self.payment_link.clone()));
        payload.insert("amount".to_string(), amount_value(self.amount));
        payload
    }
}

fn amount_value(amount: Option<f64>) -> Value {
    amount
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// First eight hex characters of a v4 UUID.
pub(crate) fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Read a usable amount from a model-supplied payload value.
///
/// Accepts positive numbers and numeric strings; anything else is treated as
/// absent so the caller can fall back to the policy premium.
pub fn amount_from_payload(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;

    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Standalone payment initiation.
///
/// `amount` is required and must be a positive number.
pub fn initiate_payment(
    policy_number: Option<&str>,
    amount: Option<&Value>,
) -> Result<PaymentLink, OrchestratorError> {
    let amount = amount_from_payload(amount)
        .ok_or_else(|| OrchestratorError::Validation("amount required".to_string()))?;

    let payment = PaymentLink::create(Some(amount));
    info!(
        payment_id = %payment.payment_id,
        policy_number = ?policy_number,
        amount,
        "Created mock payment link"
    );
    Ok(payment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_id_and_link_shape() {
        let payment = PaymentLink::create(Some(500.0));

        assert!(payment.payment_id.starts_with("pay_"));
        assert_eq!(payment.payment_id.len(), 12);
        assert_eq!(
            payment.payment_link,
            format!("https://mockpay.example/pay/{}", payment.payment_id)
        );
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(PaymentLink::create(None).payment_id, PaymentLink::create(None).payment_id);
    }

    #[test]
    fn test_action_payload_keys() {
        let payload = PaymentLink::with_id("pay_abcd1234", None).to_action_payload();
        assert_eq!(payload["payment_id"], "pay_abcd1234");
        assert_eq!(payload["payment_link"], "https://mockpay.example/pay/pay_abcd1234");
        assert_eq!(payload["amount"], Value::Null);

        let with_amount = PaymentLink::with_id("pay_x", Some(1200.0)).to_action_payload();
        assert_eq!(with_amount["amount"], 1200.0);
    }

    #[test]
    fn test_amount_from_payload() {
        assert_eq!(amount_from_payload(Some(&json!(500))), Some(500.0));
        assert_eq!(amount_from_payload(Some(&json!("1,200.50"))), Some(1200.5));
        assert_eq!(amount_from_payload(Some(&json!(0))), None);
        assert_eq!(amount_from_payload(Some(&json!(null))), None);
        assert_eq!(amount_from_payload(Some(&json!("soon"))), None);
        assert_eq!(amount_from_payload(None), None);
    }

    #[test]
    fn test_initiate_payment_requires_amount() {
        let payment = initiate_payment(Some("POL123"), Some(&json!(500))).unwrap();
        assert!(payment.payment_link.contains(&payment.payment_id));
        assert_eq!(payment.amount, Some(500.0));

        let err = initiate_payment(Some("POL123"), None).unwrap_err();
        assert_eq!(err, OrchestratorError::Validation("amount required".to_string()));
    }
}
