//! Turn orchestration: quota gate, history context, backend call, bookkeeping.

pub mod service;

pub use service::{ConversationService, ConversationSettings};
