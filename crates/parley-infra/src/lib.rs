//! Infrastructure layer for Parley.
//!
//! Implements the ports defined in `parley-core`:
//! - [`llm`]: OpenAI-compatible chat-completion backend (`LlmProvider`)
//! - [`line`]: LINE Messaging API webhook parsing, signature verification,
//!   and the reply client (`ReplySender`)
//! - [`config`]: `parley.toml` loading and environment secrets

pub mod config;
pub mod line;
pub mod llm;
