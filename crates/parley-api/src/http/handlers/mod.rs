//! HTTP request handlers.

pub mod callback;
pub mod health;
