//! Reply API client.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use parley_core::delivery::ReplySender;
use parley_types::error::DeliveryError;

pub const LINE_API_BASE_URL: &str = "https://api.line.me";

/// Client for `POST /v2/bot/message/reply`.
///
/// The channel access token is held as a [`SecretString`] and only exposed
/// when building the `Authorization` header.
pub struct LineMessagingClient {
    client: reqwest::Client,
    access_token: SecretString,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl LineMessagingClient {
    pub fn new(access_token: SecretString) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            access_token,
            base_url: LINE_API_BASE_URL.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl ReplySender for LineMessagingClient {
    async fn send_reply(&self, reply_handle: &str, text: &str) -> Result<(), DeliveryError> {
        let body = ReplyRequest {
            reply_token: reply_handle,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(self.url("/v2/bot/message/reply"))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "reply delivered");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_request_wire_shape() {
        let body = ReplyRequest {
            reply_token: "r-1",
            messages: [TextMessage {
                kind: "text",
                text: "hello",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["replyToken"], "r-1");
        assert_eq!(json["messages"][0]["type"], "text");
        assert_eq!(json["messages"][0]["text"], "hello");
    }

    fn client_at(base_url: &str) -> LineMessagingClient {
        let mut client = LineMessagingClient::new(SecretString::from("t".to_string())).unwrap();
        client.base_url = base_url.to_string();
        client
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = client_at("http://127.0.0.1:9/");
        assert_eq!(
            client.url("/v2/bot/message/reply"),
            "http://127.0.0.1:9/v2/bot/message/reply"
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let client = client_at("http://127.0.0.1:9");
        let err = client.send_reply("r-1", "hi").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
