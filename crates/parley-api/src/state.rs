//! Application state shared by the webhook handlers.

use std::sync::Arc;

use secrecy::SecretString;

use parley_core::clock::offset_from_minutes;
use parley_core::conversation::{ConversationService, ConversationSettings};
use parley_core::delivery::BoxReplySender;
use parley_core::history::HistoryStore;
use parley_core::quota::QuotaTracker;
use parley_infra::config::Secrets;
use parley_infra::line::LineMessagingClient;
use parley_types::config::ParleyConfig;

/// Shared application state.
///
/// Cheap to clone: every service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<ConversationService>,
    pub replies: Arc<BoxReplySender>,
    /// Key for `X-Line-Signature` verification.
    pub channel_secret: Arc<SecretString>,
}

impl AppState {
    /// Wire the in-memory stores, the configured backend, and the LINE client.
    pub fn init(config: &ParleyConfig, secrets: Secrets) -> anyhow::Result<Self> {
        let history = HistoryStore::new(config.history.max_turns);
        let quota = QuotaTracker::new(config.quota.limits())
            .with_utc_offset(offset_from_minutes(config.quota.utc_offset_minutes));
        let provider =
            parley_infra::llm::create_provider(&config.backend, secrets.openai_api_key);

        let conversation = ConversationService::new(
            history,
            quota,
            provider,
            ConversationSettings::from_config(config),
        );
        let line = LineMessagingClient::new(secrets.line_channel_access_token)?;

        Ok(Self::new(
            conversation,
            BoxReplySender::new(line),
            secrets.line_channel_secret,
        ))
    }

    pub fn new(
        conversation: ConversationService,
        replies: BoxReplySender,
        channel_secret: SecretString,
    ) -> Self {
        Self {
            conversation: Arc::new(conversation),
            replies: Arc::new(replies),
            channel_secret: Arc::new(channel_secret),
        }
    }
}
