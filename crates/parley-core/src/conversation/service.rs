//! Conversation service: the single entry point for an inbound turn.
//!
//! `ConversationService::handle_turn` classifies the user's quota, answers
//! degraded tiers with fixed text, and otherwise calls the backend with the
//! persona, the user's history window, and the new message. No store lock is
//! held while the backend call is in flight; history is written only after a
//! real reply comes back.

use std::time::Duration;

use parley_types::config::{ParleyConfig, RepliesConfig};
use parley_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use parley_types::quota::Tier;

use crate::history::HistoryStore;
use crate::llm::BoxLlmProvider;
use crate::quota::QuotaTracker;

/// Per-deployment settings for building backend requests and fixed replies.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// System prompt; empty means none is sent.
    pub persona: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub replies: RepliesConfig,
    pub charge_on_backend_failure: bool,
}

impl ConversationSettings {
    pub fn from_config(config: &ParleyConfig) -> Self {
        Self {
            persona: config.backend.persona.clone(),
            model: config.backend.model.clone(),
            temperature: config.backend.temperature,
            max_tokens: config.backend.max_tokens,
            timeout: Duration::from_secs(config.backend.timeout_secs),
            replies: config.replies.clone(),
            charge_on_backend_failure: config.quota.charge_on_backend_failure,
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self::from_config(&ParleyConfig::default())
    }
}

/// Routes inbound turns through the quota tracker, history store, and backend.
pub struct ConversationService {
    history: HistoryStore,
    quota: QuotaTracker,
    provider: BoxLlmProvider,
    settings: ConversationSettings,
}

impl ConversationService {
    pub fn new(
        history: HistoryStore,
        quota: QuotaTracker,
        provider: BoxLlmProvider,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            history,
            quota,
            provider,
            settings,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    pub fn settings(&self) -> &ConversationSettings {
        &self.settings
    }

    /// Handle one message from `user_id`.
    ///
    /// Returns the text to send back, or `None` when the user is blocked for
    /// the rest of the month.
    #[tracing::instrument(skip(self, text), fields(provider = %self.provider.name()))]
    pub async fn handle_turn(&self, user_id: &str, text: &str) -> Option<String> {
        let tier = self.quota.check_and_classify(user_id);

        let canned = match tier {
            Tier::Blocked => {
                tracing::debug!(%tier, "quota exhausted, dropping turn");
                return None;
            }
            Tier::Warning => self.settings.replies.warning.clone(),
            Tier::Exhausted => self.settings.replies.exhausted_text(),
            Tier::Normal => return Some(self.converse(user_id, text).await),
        };

        let count = self.quota.increment(user_id);
        tracing::info!(%tier, count, "sending fixed quota reply");
        Some(canned)
    }

    async fn converse(&self, user_id: &str, text: &str) -> String {
        let request = self.build_request(user_id, text);

        match self.complete(&request).await {
            Ok(reply) => {
                self.history.append_exchange(user_id, text, reply.as_str());
                let count = self.quota.increment(user_id);
                tracing::debug!(count, reply_len = reply.len(), "backend replied");
                reply
            }
            Err(e) => {
                let count = if self.settings.charge_on_backend_failure {
                    Some(self.quota.increment(user_id))
                } else {
                    None
                };
                tracing::warn!(error = %e, ?count, "backend unavailable, sending apology");
                self.settings.replies.apology.clone()
            }
        }
    }

    /// Persona, then the history window, then the new message.
    fn build_request(&self, user_id: &str, text: &str) -> CompletionRequest {
        let window = self.history.get(user_id);
        let mut messages: Vec<Message> = window.iter().map(Message::from).collect();
        messages.push(Message {
            role: MessageRole::User,
            content: text.to_string(),
        });

        let persona = self.settings.persona.trim();
        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: (!persona.is_empty()).then(|| persona.to_string()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(request))
            .await
            .map_err(|_| LlmError::Timeout(self.settings.timeout.as_secs()))??;

        let reply = response.content.trim();
        if reply.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(reply.to_string())
    }
}
