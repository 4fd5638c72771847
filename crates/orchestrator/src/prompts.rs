//! Prompt templates and token budgets for each extraction.

use std::path::Path;

use invoker_core::fingerprint_prompt;
use tracing::info;

/// Policy document parser instructions.
pub const POLICY_PARSER_PROMPT: &str = r#"You are a professional insurance document parser. Input is either raw text extracted from a policy PDF or a description. Output MUST be a strict JSON object only (no explanatory text) with these fields:
- policy_number (string or null)
- policy_type (string or null)
- insurer_name (string or null)
- customer_name (string or null)
- customer_contact (string or null, E.164 if possible)
- expiry_date (YYYY-MM-DD or null)
- premium_amount (number or null)
- no_claim_bonus_percent (number between 0-100 or null)
- asset_details (object with keys: make, model, year, registration_number - any can be null)
- coverage_summary (array of strings)
- eligible_upsell (array of strings)
- last_payment_date (YYYY-MM-DD or null)

If a value is not present in the text, set it to null or an empty array/object as appropriate.
Make a best-effort extraction. STRICT JSON output and nothing else."#;

/// Intent and entity classifier instructions.
pub const NLU_PROMPT: &str = r#"You are a compact NLU assistant. Given user text, return a JSON object with:
- intent: one of [renew_now, renew_later_date, needs_discount, needs_human_agent, modify_policy, interested_in_upsell, switching_to_competitor, not_interested, callback_request, out_of_scope]
- confidence: number from 0.0 to 1.0
- entities: object of any extracted slots (policy_number, followup_date, preferred_channel, language, upsell_choice, payment_method, contact)
Return only JSON, nothing else."#;

/// Sentiment classifier instructions.
pub const SENTIMENT_PROMPT: &str = r#"You are a sentiment classifier. Input: a short user utterance. Return a JSON object with:
- sentiment: one of [positive, neutral, negative]
- score: number from 0.0 to 1.0 (confidence)
Return only JSON."#;

/// Agent behaviour rules for renewal and upsell conversations.
pub const AGENT_RULES_PROMPT: &str = r#"You are an Insurance Renewal & Upsell virtual agent. Behavior rules:
1. Always confirm customer identity (customer_name and policy_number) if not confirmed.
2. If expiry_date is within 30 days, proactively offer renewal. Show premium and NCB.
3. Check eligible_upsell and propose simple, short add-ons only if sentiment is positive and the user is willing.
4. If the user requests payment, choose action initiate_payment (a payment link will be attached).
5. Keep messages short, empathetic, and in the user's preferred language (English or Hindi). If no language is given, use English.
6. Respect opt-out and DND: if the user says 'stop' or 'unsubscribe', confirm the opt-out and make no further offers.
7. Output must be a JSON object with keys:
   - reply (string): text to send to the user
   - language (string): 'en' or 'hi'
   - action (string or null): one of [ask_for_missing_info, offer_renewal, initiate_payment, upsell_offer, schedule_callback, escalate_human, none]
   - action_payload (object or null): additional details (e.g. amount, followup_date)
Return only JSON."#;

/// A system prompt together with its output budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// System instructions.
    pub system: String,
    /// Max output tokens for this extraction.
    pub max_tokens: u32,
    /// SHA-256 of `system`, for logs.
    pub fingerprint: String,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, max_tokens: u32) -> Self {
        let system = system.into();
        let fingerprint = fingerprint_prompt(&system);
        Self {
            system,
            max_tokens,
            fingerprint,
        }
    }
}

/// The four templates the service uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub policy: PromptTemplate,
    pub intent: PromptTemplate,
    pub sentiment: PromptTemplate,
    pub agent: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::with_agent_rules(AGENT_RULES_PROMPT)
    }
}

impl PromptSet {
    /// Built-in templates with custom agent behaviour rules.
    pub fn with_agent_rules(rules: impl Into<String>) -> Self {
        Self {
            policy: PromptTemplate::new(POLICY_PARSER_PROMPT, 600),
            intent: PromptTemplate::new(NLU_PROMPT, 200),
            sentiment: PromptTemplate::new(SENTIMENT_PROMPT, 100),
            agent: PromptTemplate::new(rules, 400),
        }
    }

    /// Built-in templates, with the agent rules replaced by the contents of
    /// `agent_rules_file` when it exists and is non-empty.
    pub fn load(agent_rules_file: Option<&Path>) -> Self {
        let rules = agent_rules_file.and_then(|path| {
            let rules = read_prompt_file(path)?;
            info!("Loaded agent rules from {}", path.display());
            Some(rules)
        });

        let prompts = match rules {
            Some(rules) => Self::with_agent_rules(rules),
            None => Self::default(),
        };

        info!(
            policy = %prompts.policy.fingerprint,
            intent = %prompts.intent.fingerprint,
            sentiment = %prompts.sentiment.fingerprint,
            agent = %prompts.agent.fingerprint,
            "Prompt fingerprints"
        );

        prompts
    }
}

fn read_prompt_file(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budgets() {
        let prompts = PromptSet::default();
        assert_eq!(prompts.policy.max_tokens, 600);
        assert_eq!(prompts.intent.max_tokens, 200);
        assert_eq!(prompts.sentiment.max_tokens, 100);
        assert_eq!(prompts.agent.max_tokens, 400);
        assert_eq!(prompts.agent.system, AGENT_RULES_PROMPT);
    }

    #[test]
    fn test_load_missing_file_uses_builtin_rules() {
        let prompts = PromptSet::load(Some(Path::new("/nonexistent/agent_rules.md")));
        assert_eq!(prompts, PromptSet::default());
    }

    #[test]
    fn test_load_override_file() {
        let path = std::env::temp_dir().join(format!("agent_rules_{}.md", uuid::Uuid::new_v4()));
        std::fs::write(&path, "\n  Be brief. Return only JSON.  \n").unwrap();

        let prompts = PromptSet::load(Some(&path));
        assert_eq!(prompts.agent.system, "Be brief. Return only JSON.");
        assert_ne!(prompts.agent.fingerprint, PromptSet::default().agent.fingerprint);
        assert_eq!(prompts.policy, PromptSet::default().policy);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_blank_file_is_ignored() {
        let path = std::env::temp_dir().join(format!("agent_rules_{}.md", uuid::Uuid::new_v4()));
        std::fs::write(&path, "   \n").unwrap();
        assert_eq!(PromptSet::load(Some(&path)), PromptSet::default());
        std::fs::remove_file(path).unwrap();
    }
}
