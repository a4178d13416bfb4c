//! Monthly per-user quota: pure tier classification plus the shared tracker.

pub mod tier;
pub mod tracker;

pub use tier::classify;
pub use tracker::QuotaTracker;
