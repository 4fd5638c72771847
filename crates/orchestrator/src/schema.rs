//! Typed schemas for every object the model is asked to produce.
//!
//! Each schema is deserialized with serde and then range-checked by
//! [`Schema::validate`]. A failure at either step is treated the same as a
//! JSON syntax error by the extractor.

use std::fmt;

use chrono::NaiveDate;
use database::NewPolicy;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A model-produced object with a name and post-parse checks.
pub trait Schema: DeserializeOwned + Serialize + Send {
    /// Name used in logs and error details.
    const NAME: &'static str;

    /// Check ranges and formats serde cannot express.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 0 and 1, got {}", field, value))
    }
}

fn check_date(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(date) if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() => {
            Err(format!("{} must be YYYY-MM-DD, got '{}'", field, date))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Policy extraction
// ---------------------------------------------------------------------------

/// Vehicle or other insured asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetDetails {
    pub make: Option<String>,
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    pub registration_number: Option<String>,
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i32),
        Text(String),
    }

    match Option::<Year>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Year::Number(year)) => Ok(Some(year)),
        Some(Year::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Year::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid year '{}'", text))),
    }
}

/// Structured fields pulled from a policy document.
///
/// Every field is nullable. Keys the model adds beyond these are kept in
/// `extra` and persisted with the rest of the object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyExtraction {
    pub policy_number: Option<String>,
    pub policy_type: Option<String>,
    pub insurer_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    /// `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    pub premium_amount: Option<f64>,
    pub no_claim_bonus_percent: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_details: AssetDetails,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverage_summary: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eligible_upsell: Vec<String>,
    /// `YYYY-MM-DD`
    pub last_payment_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for PolicyExtraction {
    const NAME: &'static str = "policy_extraction";

    fn validate(&self) -> Result<(), String> {
        if let Some(premium) = self.premium_amount {
            if !premium.is_finite() || premium < 0.0 {
                return Err(format!("premium_amount must be non-negative, got {}", premium));
            }
        }
        if let Some(ncb) = self.no_claim_bonus_percent {
            if !ncb.is_finite() || !(0.0..=100.0).contains(&ncb) {
                return Err(format!("no_claim_bonus_percent must be 0-100, got {}", ncb));
            }
        }
        check_date("expiry_date", self.expiry_date.as_deref())?;
        check_date("last_payment_date", self.last_payment_date.as_deref())
    }
}

impl PolicyExtraction {
    /// The full object as JSON, with every schema key present.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Columns for a new policy record.
    pub fn to_new_policy(&self) -> NewPolicy {
        NewPolicy {
            policy_number: self.policy_number.clone(),
            customer_name: self.customer_name.clone(),
            customer_contact: self.customer_contact.clone(),
            policy_type: self.policy_type.clone(),
            insurer_name: self.insurer_name.clone(),
            expiry_date: self.expiry_date.clone(),
            premium_amount: self.premium_amount,
            no_claim_bonus_percent: self.no_claim_bonus_percent,
            eligible_upsells: self.eligible_upsell.clone(),
            raw_extraction: self.to_value(),
        }
    }
}

// ---------------------------------------------------------------------------
// Intent classification
// ---------------------------------------------------------------------------

/// What the customer wants, from a fixed label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RenewNow,
    RenewLaterDate,
    NeedsDiscount,
    NeedsHumanAgent,
    ModifyPolicy,
    InterestedInUpsell,
    SwitchingToCompetitor,
    NotInterested,
    CallbackRequest,
    OutOfScope,
}

impl Intent {
    /// Every label, in prompt order.
    pub const ALL: [Intent; 10] = [
        Intent::RenewNow,
        Intent::RenewLaterDate,
        Intent::NeedsDiscount,
        Intent::NeedsHumanAgent,
        Intent::ModifyPolicy,
        Intent::InterestedInUpsell,
        Intent::SwitchingToCompetitor,
        Intent::NotInterested,
        Intent::CallbackRequest,
        Intent::OutOfScope,
    ];
}

/// Intent label, confidence, and any slots the model picked out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Map<String, Value>,
}

impl IntentResult {
    /// Substitute used when classification fails inside a dialogue turn.
    pub fn fallback() -> Self {
        Self {
            intent: Intent::OutOfScope,
            confidence: 0.5,
            entities: Map::new(),
        }
    }
}

impl Schema for IntentResult {
    const NAME: &'static str = "intent";

    fn validate(&self) -> Result<(), String> {
        check_unit_interval("confidence", self.confidence)
    }
}

// ---------------------------------------------------------------------------
// Sentiment classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub score: f64,
}

impl SentimentResult {
    /// Substitute used when classification fails inside a dialogue turn.
    pub fn fallback() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.5,
        }
    }
}

impl Schema for SentimentResult {
    const NAME: &'static str = "sentiment";

    fn validate(&self) -> Result<(), String> {
        check_unit_interval("score", self.score)
    }
}

// ---------------------------------------------------------------------------
// Agent decision
// ---------------------------------------------------------------------------

/// Reply language. Only English and Hindi are supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    /// Parse a language code or name ("en", "English", "hi", "Hindi").
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "hi" | "hindi" => Some(Language::Hi),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported language '{}'", code)))
    }
}

/// Side-effecting action the agent wants taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentAction {
    AskForMissingInfo,
    OfferRenewal,
    InitiatePayment,
    UpsellOffer,
    ScheduleCallback,
    EscalateHuman,
    #[default]
    None,
}

/// Reply apologising and handing off to a person.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble right now. I'll escalate to a human agent.";

/// One dialogue turn's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDecision {
    pub reply: String,
    pub language: Language,
    /// JSON `null` reads as [`AgentAction::None`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: AgentAction,
    #[serde(default)]
    pub action_payload: Option<Map<String, Value>>,
}

impl AgentDecision {
    /// Fixed human-escalation decision used when the model cannot produce one.
    pub fn fallback(language: Language, reason: impl fmt::Display) -> Self {
        let mut payload = Map::new();
        payload.insert("reason".to_string(), Value::String(reason.to_string()));

        Self {
            reply: FALLBACK_REPLY.to_string(),
            language,
            action: AgentAction::EscalateHuman,
            action_payload: Some(payload),
        }
    }
}

impl Schema for AgentDecision {
    const NAME: &'static str = "agent_decision";

    fn validate(&self) -> Result<(), String> {
        if self.reply.trim().is_empty() {
            return Err("reply must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: Schema>(value: Value) -> Result<T, String> {
        let parsed: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
        parsed.validate()?;
        Ok(parsed)
    }

    #[test]
    fn test_policy_missing_keys_become_null() {
        let policy: PolicyExtraction = parse(json!({"policy_number": "POL1"})).unwrap();
        let value = policy.to_value();

        for key in [
            "policy_number",
            "policy_type",
            "insurer_name",
            "customer_name",
            "customer_contact",
            "expiry_date",
            "premium_amount",
            "no_claim_bonus_percent",
            "asset_details",
            "coverage_summary",
            "eligible_upsell",
            "last_payment_date",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["premium_amount"], Value::Null);
        assert_eq!(value["coverage_summary"], json!([]));
    }

    #[test]
    fn test_policy_keeps_extra_keys_and_nulls_lists() {
        let policy: PolicyExtraction = parse(json!({
            "policy_number": "POL1",
            "coverage_summary": null,
            "asset_details": {"make": "Maruti", "year": "2019"},
            "agent_code": "AG7"
        }))
        .unwrap();

        assert!(policy.coverage_summary.is_empty());
        assert_eq!(policy.asset_details.year, Some(2019));
        assert_eq!(policy.extra.get("agent_code"), Some(&json!("AG7")));
        assert_eq!(policy.to_value()["agent_code"], "AG7");
    }

    #[test]
    fn test_policy_range_checks() {
        assert!(parse::<PolicyExtraction>(json!({"premium_amount": -1})).is_err());
        assert!(parse::<PolicyExtraction>(json!({"no_claim_bonus_percent": 120})).is_err());
        assert!(parse::<PolicyExtraction>(json!({"expiry_date": "01/11/2026"})).is_err());
        assert!(parse::<PolicyExtraction>(json!({"premium_amount": "1200"})).is_err());
        assert!(parse::<PolicyExtraction>(json!({"no_claim_bonus_percent": 25, "expiry_date": "2026-11-01"})).is_ok());
    }

    #[test]
    fn test_policy_to_new_policy_maps_upsells() {
        let policy: PolicyExtraction = parse(json!({
            "policy_number": "POL1",
            "premium_amount": 1200,
            "eligible_upsell": ["zero_dep"]
        }))
        .unwrap();

        let new_policy = policy.to_new_policy();
        assert_eq!(new_policy.eligible_upsells, vec!["zero_dep"]);
        assert_eq!(new_policy.premium_amount, Some(1200.0));
        assert_eq!(new_policy.raw_extraction["policy_number"], "POL1");
    }

    #[test]
    fn test_intent_rejects_unknown_label_and_bad_confidence() {
        assert!(parse::<IntentResult>(json!({"intent": "buy_crypto", "confidence": 0.9})).is_err());
        assert!(parse::<IntentResult>(json!({"intent": "renew_now", "confidence": 1.5})).is_err());
        assert!(parse::<IntentResult>(json!({"intent": "renew_now"})).is_err());

        let ok: IntentResult = parse(json!({"intent": "renew_now", "confidence": 0.92})).unwrap();
        assert_eq!(ok.intent, Intent::RenewNow);
        assert!(ok.entities.is_empty());
    }

    #[test]
    fn test_intent_labels_serialize_snake_case() {
        let labels: Vec<String> = Intent::ALL
            .iter()
            .map(|i| serde_json::to_value(i).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(labels.len(), 10);
        assert!(labels.contains(&"switching_to_competitor".to_string()));
        assert!(labels.contains(&"out_of_scope".to_string()));
    }

    #[test]
    fn test_sentiment_schema() {
        assert!(parse::<SentimentResult>(json!({"sentiment": "angry", "score": 0.9})).is_err());
        assert!(parse::<SentimentResult>(json!({"sentiment": "negative", "score": -0.1})).is_err());
        let ok: SentimentResult = parse(json!({"sentiment": "negative", "score": 0.8})).unwrap();
        assert_eq!(ok.sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_agent_decision_null_action_is_none() {
        let decision: AgentDecision = parse(json!({
            "reply": "Hello!",
            "language": "en",
            "action": null,
            "action_payload": null
        }))
        .unwrap();
        assert_eq!(decision.action, AgentAction::None);
        assert!(decision.action_payload.is_none());
    }

    #[test]
    fn test_agent_decision_rejects_bad_language_and_empty_reply() {
        assert!(parse::<AgentDecision>(json!({"reply": "Hola", "language": "es", "action": "none"})).is_err());
        assert!(parse::<AgentDecision>(json!({"reply": "  ", "language": "en", "action": "none"})).is_err());
        assert!(parse::<AgentDecision>(json!({"reply": "Hi", "language": "en", "action": "dance"})).is_err());
    }

    #[test]
    fn test_language_accepts_names() {
        assert_eq!(Language::from_code("Hindi"), Some(Language::Hi));
        assert_eq!(Language::from_code(" EN "), Some(Language::En));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(serde_json::to_value(Language::Hi).unwrap(), "hi");
    }

    #[test]
    fn test_fallback_decision_shape() {
        let decision = AgentDecision::fallback(Language::Hi, "model down");
        let value = serde_json::to_value(&decision).unwrap();

        assert_eq!(value["reply"], FALLBACK_REPLY);
        assert_eq!(value["language"], "hi");
        assert_eq!(value["action"], "escalate_human");
        assert_eq!(value["action_payload"]["reason"], "model down");
    }
}
