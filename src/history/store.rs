use std::sync::Arc;

use crate::error::{SlideError, SlideResult};

use super::stack::{self, HistoryStep};
use super::storage::SessionStorage;

pub const DEFAULT_HISTORY_KEY: &str = "::slide::history::";
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Visit stack of one scope, persisted as a JSON array under `key`.
pub struct HistoryStore {
    storage: Arc<dyn SessionStorage>,
    key: String,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self::with_capacity(storage, key, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(
        storage: Arc<dyn SessionStorage>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
            capacity: capacity.max(1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persisted stack, or `None` when absent or unreadable.
    pub fn load(&self) -> Option<Vec<String>> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "history read failed; treating as empty");
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(stack) => Some(stack),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "history is corrupt; reseeding");
                None
            }
        }
    }

    pub fn save(&self, stack: &[String]) -> SlideResult<()> {
        let raw = serde_json::to_string(stack)
            .map_err(|source| SlideError::storage(format!("failed to encode history: {source}")))?;
        self.storage.set(&self.key, &raw)
    }

    pub fn clear(&self) -> SlideResult<()> {
        self.storage.remove(&self.key)
    }

    /// Stack after a scope lands on `current` without a previous view. An
    /// empty store is seeded with `[current]`; a resumed stack gets `current`
    /// pushed or truncated to like any other navigation. Nothing is written.
    pub fn landing(&self, current: &str) -> HistoryStep {
        match self.load() {
            Some(loaded) => stack::apply(&loaded, None, current, self.capacity),
            None => HistoryStep {
                stack: vec![current.to_string()],
                previous: None,
                next: 0,
                mutated: true,
            },
        }
    }

    /// Stack after navigating from `previous` to `next`. Nothing is written.
    pub fn step(&self, previous: Option<&str>, next: &str) -> HistoryStep {
        let current = self.load().unwrap_or_default();
        stack::apply(&current, previous, next, self.capacity)
    }

    /// Writes `step` once, only if it changed the stack.
    pub fn commit(&self, step: &HistoryStep) {
        if step.mutated {
            self.save_or_warn(&step.stack);
        }
    }

    /// Lands on `current` and persists the result.
    pub fn seed(&self, current: &str) -> Vec<String> {
        let step = self.landing(current);
        self.commit(&step);
        step.stack
    }

    /// Applies a navigation from `previous` to `next` and persists the result.
    pub fn record(&self, previous: Option<&str>, next: &str) -> HistoryStep {
        let step = self.step(previous, next);
        self.commit(&step);
        step
    }

    fn save_or_warn(&self, stack: &[String]) {
        if let Err(err) = self.save(stack) {
            tracing::warn!(key = %self.key, error = %err, "history write failed");
        }
    }
}
