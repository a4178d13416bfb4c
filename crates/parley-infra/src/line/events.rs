//! Webhook payload parsing.
//!
//! Only `message` events carrying a `text` message become turns; follows,
//! stickers, images, postbacks and the like are skipped.

use serde::Deserialize;

use parley_types::turn::UserId;

use super::WebhookError;

/// One inbound text message ready for the conversation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTurn {
    pub user_id: UserId,
    pub text: String,
    /// Single-use token for the reply API.
    pub reply_token: String,
}

#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEvent {
    #[serde(rename = "type")]
    kind: String,
    reply_token: Option<String>,
    source: Option<EventSource>,
    message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventSource {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventMessage {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Parse a raw webhook body into the text turns it carries, in order.
///
/// A text message event missing its reply token, user id, or text is
/// rejected as [`WebhookError::Malformed`].
pub fn parse_text_turns(body: &[u8]) -> Result<Vec<TextTurn>, WebhookError> {
    let payload: WebhookBody =
        serde_json::from_slice(body).map_err(|e| WebhookError::Malformed(e.to_string()))?;

    let mut turns = Vec::new();
    for event in payload.events {
        if event.kind != "message" {
            tracing::trace!(kind = %event.kind, "skipping non-message event");
            continue;
        }
        let Some(message) = event.message else {
            return Err(WebhookError::Malformed("message event without message".into()));
        };
        if message.kind != "text" {
            tracing::trace!(kind = %message.kind, "skipping non-text message");
            continue;
        }

        let text = message
            .text
            .ok_or_else(|| WebhookError::Malformed("text message without text".into()))?;
        let reply_token = event
            .reply_token
            .ok_or_else(|| WebhookError::Malformed("text message without replyToken".into()))?;
        let user_id = event
            .source
            .and_then(|s| s.user_id)
            .ok_or_else(|| WebhookError::Malformed("text message without source.userId".into()))?;

        turns.push(TextTurn {
            user_id,
            text,
            reply_token,
        });
    }
    Ok(turns)
}
