//! Per-user conversation window.

pub mod store;

pub use store::HistoryStore;
