//! Bounded, recency-ordered history of turns per user.
//!
//! `HistoryStore` is backed by a sharded `DashMap`, so appends for different
//! users lock different shards and never wait on each other. Reads clone the
//! window under the shard lock and return an owned snapshot; no `DashMap`
//! guard ever escapes this module.

use std::collections::VecDeque;

use dashmap::DashMap;

use parley_types::turn::{Role, Turn, UserId};

/// Default number of prompter/responder pairs kept per user.
pub const DEFAULT_MAX_TURNS: usize = 5;

/// Concurrent store of each user's most recent turns.
///
/// Holds at most `2 × max_turns` entries per user. When an append pushes a
/// window past that bound the oldest entries are discarded.
#[derive(Debug)]
pub struct HistoryStore {
    max_turns: usize,
    windows: DashMap<UserId, VecDeque<Turn>>,
}

impl HistoryStore {
    /// Create a store keeping `max_turns` pairs per user.
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            windows: DashMap::new(),
        }
    }

    /// Maximum number of turns retained per user.
    pub fn capacity(&self) -> usize {
        self.max_turns.saturating_mul(2)
    }

    /// Append a single turn to the tail of `user_id`'s window.
    pub fn append(&self, user_id: &str, role: Role, text: impl Into<String>) {
        self.with_window(user_id, |window| window.push_back(Turn::new(role, text)));
    }

    /// Append a prompter turn and its reply as one atomic step.
    ///
    /// Two concurrent exchanges for the same user land as whole pairs, never
    /// as prompter, prompter, responder, responder.
    pub fn append_exchange(
        &self,
        user_id: &str,
        prompt: impl Into<String>,
        reply: impl Into<String>,
    ) {
        self.with_window(user_id, |window| {
            window.push_back(Turn::prompter(prompt));
            window.push_back(Turn::responder(reply));
        });
    }

    /// Snapshot of `user_id`'s window, oldest first. Empty for unknown users.
    pub fn get(&self, user_id: &str) -> Vec<Turn> {
        self.windows
            .get(user_id)
            .map(|w| w.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of turns currently held for `user_id`.
    pub fn len(&self, user_id: &str) -> usize {
        self.windows.get(user_id).map(|w| w.len()).unwrap_or(0)
    }

    /// Number of users with a window.
    pub fn user_count(&self) -> usize {
        self.windows.len()
    }

    fn with_window(&self, user_id: &str, mutate: impl FnOnce(&mut VecDeque<Turn>)) {
        let capacity = self.capacity();
        let mut window = match self.windows.get_mut(user_id) {
            Some(w) => w,
            None => self.windows.entry(user_id.to_string()).or_default(),
        };
        mutate(&mut window);

        let overflow = window.len().saturating_sub(capacity);
        if overflow > 0 {
            for _ in 0..overflow {
                window.pop_front();
            }
            tracing::trace!(user_id, dropped = overflow, "trimmed history window");
        }
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}
