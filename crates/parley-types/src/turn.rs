//! Conversation turn types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a message sender, as delivered by the transport.
pub type UserId = String;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user talking to the bot.
    Prompter,
    /// The bot's reply.
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Prompter => write!(f, "prompter"),
            Role::Responder => write!(f, "responder"),
        }
    }
}

/// A single message in a user's conversation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn prompter(text: impl Into<String>) -> Self {
        Self::new(Role::Prompter, text)
    }

    pub fn responder(text: impl Into<String>) -> Self {
        Self::new(Role::Responder, text)
    }
}
