//! Mock SMS provider.

use serde::Serialize;
use tracing::info;

use crate::error::OrchestratorError;
use crate::payment::short_id;

/// Acknowledgement returned for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsReceipt {
    /// Always `"sent"`.
    pub status: &'static str,
    /// `msg_` followed by eight hex characters.
    pub id: String,
}

/// Pretend to send an SMS. Both fields must be non-empty.
pub fn send_sms(to: Option<&str>, text: Option<&str>) -> Result<SmsReceipt, OrchestratorError> {
    let to = to.filter(|s| !s.is_empty());
    let text = text.filter(|s| !s.is_empty());

    let (Some(to), Some(text)) = (to, text) else {
        return Err(OrchestratorError::Validation("to and text required".to_string()));
    };

    let receipt = SmsReceipt {
        status: "sent",
        id: format!("msg_{}", short_id()),
    };
    info!(id = %receipt.id, to = %to, chars = text.chars().count(), "Mock SMS sent");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_sms() {
        let receipt = send_sms(Some("+919800000000"), Some("Your policy renews soon")).unwrap();
        assert_eq!(receipt.status, "sent");
        assert!(receipt.id.starts_with("msg_"));
        assert_eq!(receipt.id.len(), 12);
    }

    #[test]
    fn test_send_sms_requires_both_fields() {
        assert!(send_sms(None, Some("hi")).is_err());
        assert!(send_sms(Some("+91980"), Some("")).is_err());
        assert!(send_sms(Some("+91980"), Some(" ")).is_ok());
        assert!(send_sms(Some(""), None).is_err());
    }
}
