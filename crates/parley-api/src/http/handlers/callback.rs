//! LINE webhook receiver.
//!
//! Verifies `X-Line-Signature`, extracts text-message turns, and hands them
//! to a background task so LINE gets its 200 before the backend is called.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use secrecy::ExposeSecret;

use parley_core::conversation::ConversationService;
use parley_core::delivery::BoxReplySender;
use parley_infra::line::{
    SIGNATURE_HEADER, TextTurn, WebhookError, parse_text_turns, verify_signature,
};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /callback - Receive a LINE webhook delivery.
///
/// Rejects with 400 when the signature is missing or wrong, or when a text
/// message event lacks its user id or reply token. Events in one delivery
/// are processed in order.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    verify_signature(
        state.channel_secret.expose_secret().as_bytes(),
        &body,
        signature,
    )?;

    let turns = parse_text_turns(&body)?;
    tracing::debug!(turns = turns.len(), "webhook accepted");

    if !turns.is_empty() {
        let conversation = Arc::clone(&state.conversation);
        let replies = Arc::clone(&state.replies);
        tokio::spawn(async move {
            process_turns(&conversation, &replies, turns).await;
        });
    }

    Ok("OK")
}

async fn process_turns(
    conversation: &ConversationService,
    replies: &BoxReplySender,
    turns: Vec<TextTurn>,
) {
    for turn in turns {
        let Some(reply) = conversation.handle_turn(&turn.user_id, &turn.text).await else {
            continue;
        };

        if let Err(e) = replies.send_reply(&turn.reply_token, &reply).await {
            tracing::warn!(user_id = %turn.user_id, error = %e, "failed to deliver reply");
        }
    }
}
