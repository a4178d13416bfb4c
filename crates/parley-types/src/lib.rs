//! Shared domain types for Parley.
//!
//! Conversation turns, quota periods and tiers, LLM request/response shapes,
//! configuration, and the error types shared across crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod quota;
pub mod turn;
