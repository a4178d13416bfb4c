//! Core logic for Parley.
//!
//! Owns the two pieces of per-user shared state (the conversation
//! [`history::HistoryStore`] and the monthly [`quota::QuotaTracker`]) and the
//! [`conversation::ConversationService`] that routes each inbound turn through
//! them. Backend and delivery are "ports" (traits) implemented in
//! `parley-infra`; this crate never performs network I/O itself.

pub mod clock;
pub mod conversation;
pub mod delivery;
pub mod history;
pub mod llm;
pub mod quota;
