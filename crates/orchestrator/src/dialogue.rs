//! One agent turn: classify, decide, resolve side effects, log.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use database::{conversation, policy, Database, PolicyRecord, TurnRole};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::OrchestratorError;
use crate::extractor::StructuredExtractor;
use crate::payment::{amount_from_payload, PaymentLink};
use crate::prompts::PromptSet;
use crate::schema::{AgentAction, AgentDecision, IntentResult, Language, SentimentResult};

/// Inbound user message for a dialogue turn.
#[derive(Debug, Clone, Default)]
pub struct AgentRequest {
    /// Existing session; a new one is generated when absent or blank.
    pub session_id: Option<String>,
    /// Policy to load as context.
    pub policy_number: Option<String>,
    /// Preferred reply language.
    pub language: Language,
    /// The user's text. Required.
    pub message: String,
}

/// The agent decision plus the session it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReply {
    pub session_id: String,
    #[serde(flatten)]
    pub decision: AgentDecision,
}

/// Produces one agent reply per user message.
///
/// Apart from an empty message, nothing fails outward: classifier failures
/// become neutral defaults, a failed decision becomes a human-escalation
/// fallback, and store errors are logged and skipped.
pub struct DialogueOrchestrator {
    extractor: StructuredExtractor,
    prompts: Arc<PromptSet>,
    db: Database,
}

impl DialogueOrchestrator {
    pub fn new(extractor: StructuredExtractor, prompts: Arc<PromptSet>, db: Database) -> Self {
        Self {
            extractor,
            prompts,
            db,
        }
    }

    /// Run one dialogue turn.
    pub async fn handle_message(&self, request: AgentRequest) -> Result<AgentReply, OrchestratorError> {
        if request.message.is_empty() {
            return Err(OrchestratorError::Validation("message required".to_string()));
        }

        let session_id = request
            .session_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let language = request.language;
        let text = request.message.as_str();

        info!(session_id = %session_id, language = %language, "Processing agent message");

        self.record_turn(&session_id, TurnRole::User, text).await;

        let policy = match request.policy_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => self.lookup_policy(number).await,
            _ => None,
        };

        // Independent classifications; the decision prompt needs both.
        let (nlu, sentiment) = tokio::join!(self.classify_intent(text), self.classify_sentiment(text));

        let prompt = build_decision_prompt(
            text,
            policy.as_ref(),
            &nlu,
            &sentiment,
            language,
            Utc::now().date_naive(),
        );

        let mut decision = match self
            .extractor
            .extract::<AgentDecision>(&self.prompts.agent, &prompt)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "AGENT_DECISION_FALLBACK");
                AgentDecision::fallback(language, &e)
            }
        };

        if decision.action == AgentAction::InitiatePayment {
            let payment = resolve_payment(&decision, policy.as_ref());
            info!(
                session_id = %session_id,
                payment_id = %payment.payment_id,
                amount = ?payment.amount,
                "Attached mock payment link"
            );
            decision.action_payload = Some(payment.to_action_payload());
        }

        self.record_turn(&session_id, TurnRole::Agent, &decision.reply).await;

        debug!(session_id = %session_id, action = ?decision.action, "Agent turn complete");

        Ok(AgentReply {
            session_id,
            decision,
        })
    }

    async fn classify_intent(&self, text: &str) -> IntentResult {
        self.extractor
            .extract(&self.prompts.intent, text)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "INTENT_FALLBACK");
                IntentResult::fallback()
            })
    }

    async fn classify_sentiment(&self, text: &str) -> SentimentResult {
        self.extractor
            .extract(&self.prompts.sentiment, text)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "SENTIMENT_FALLBACK");
                SentimentResult::fallback()
            })
    }

    async fn lookup_policy(&self, policy_number: &str) -> Option<PolicyRecord> {
        match policy::find_latest_by_number(self.db.pool(), policy_number).await {
            Ok(found) => {
                if found.is_none() {
                    debug!(policy_number = %policy_number, "No stored policy for number");
                }
                found
            }
            Err(e) => {
                warn!(policy_number = %policy_number, error = %e, "Policy lookup failed");
                None
            }
        }
    }

    async fn record_turn(&self, session_id: &str, role: TurnRole, message: &str) {
        if let Err(e) = conversation::append_turn(self.db.pool(), session_id, role, message).await {
            warn!(session_id = %session_id, role = %role, error = %e, "Failed to log conversation turn");
        }
    }
}

/// Payment for an `initiate_payment` decision: the payload's amount, else the
/// policy premium, else none.
fn resolve_payment(decision: &AgentDecision, policy: Option<&PolicyRecord>) -> PaymentLink {
    let amount = amount_from_payload(
        decision
            .action_payload
            .as_ref()
            .and_then(|payload| payload.get("amount")),
    )
    .or_else(|| policy.and_then(|p| p.premium_amount));

    PaymentLink::create(amount)
}

/// Assemble the decision prompt from the turn's gathered context.
pub fn build_decision_prompt(
    text: &str,
    policy: Option<&PolicyRecord>,
    nlu: &IntentResult,
    sentiment: &SentimentResult,
    language: Language,
    today: NaiveDate,
) -> String {
    let policy_context = policy
        .map(|p| p.raw_extraction.to_string())
        .unwrap_or_else(|| "{}".to_string());
    let nlu_json = serde_json::to_string(nlu).unwrap_or_else(|_| "{}".to_string());
    let sentiment_json = serde_json::to_string(sentiment).unwrap_or_else(|_| "{}".to_string());

    let mut lines = vec![
        format!("User message: {}", text),
        format!("Policy context: {}", policy_context),
    ];

    if let Some(days) = policy.and_then(|p| p.expiry()).map(|d| (d - today).num_days()) {
        lines.push(format!("Days until expiry: {}", days));
    }

    lines.push(format!("Today's date: {}", today.format("%Y-%m-%d")));
    lines.push(format!("NLU: {}", nlu_json));
    lines.push(format!("Sentiment: {}", sentiment_json));
    lines.push(format!("Preferred language: {}", language));
    lines.push(String::new());
    lines.push(
        "Following the agent behavior rules, produce the agent response JSON with exactly the keys: \
reply, language ('en' or 'hi'), action (ask_for_missing_info | offer_renewal | initiate_payment | \
upsell_offer | schedule_callback | escalate_human | none), action_payload (object or null)."
            .to_string(),
    );
    lines.push(
        "Keep the reply short and polite. If asking for missing info, name the missing field \
(e.g. policy_number or customer_contact). If offering renewal, include the premium and expiry_date. \
If initiating payment, include the amount in action_payload."
            .to_string(),
    );

    lines.join("\n")
}
