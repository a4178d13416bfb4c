//! LINE Messaging API channel adapter.
//!
//! Provides:
//! - [`verify_signature`] -- constant-time `X-Line-Signature` verification
//! - [`parse_text_turns`] -- webhook body parsing into [`TextTurn`]s
//! - [`LineMessagingClient`] -- reply API client implementing `ReplySender`

pub mod client;
pub mod events;
pub mod signature;

pub use client::LineMessagingClient;
pub use events::{parse_text_turns, TextTurn};
pub use signature::verify_signature;

/// Header carrying the base64 HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Errors that can occur while accepting a LINE webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The `X-Line-Signature` header was absent.
    #[error("missing X-Line-Signature header")]
    MissingSignature,

    /// The signature did not match the body.
    #[error("webhook signature verification failed")]
    InvalidSignature,

    /// The body was not a well-formed webhook payload.
    #[error("malformed webhook payload: {0}")]
    Malformed(String),
}
