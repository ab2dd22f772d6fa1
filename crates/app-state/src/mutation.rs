//! Mutation tracking
//!
//! This module tracks the lifecycle of in-flight mutations, enforces
//! single-flight execution where overlapping calls must be rejected, and
//! exposes per-key pending state for the view layer.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Mutation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// A mutation with this key is already in flight
    #[error("Mutation already pending: {0}")]
    AlreadyPending(String),
}

/// Result type for mutation operations
pub type Result<T> = std::result::Result<T, MutationError>;

/// Mutation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationState {
    /// Mutation is idle
    #[default]
    Idle,

    /// Mutation is in flight
    Pending,

    /// Mutation succeeded
    Success,

    /// Mutation failed
    Error,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: MutationState,
    /// Identifies the guard allowed to settle this entry
    token: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    next_token: u64,
}

/// Tracks mutation state by key
///
/// Clones share the same underlying state.
///
/// # Example
///
/// ```
/// use app_state::mutation::{MutationState, MutationTracker};
///
/// let tracker = MutationTracker::new();
/// let guard = tracker.try_begin("comment:create").unwrap();
/// assert!(tracker.try_begin("comment:create").is_err());
///
/// guard.succeed();
/// assert_eq!(tracker.state("comment:create"), MutationState::Success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    inner: Arc<RwLock<Inner>>,
}

impl MutationTracker {
    /// Create a new tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a mutation, rejecting it if one with the same key is pending
    pub fn try_begin(&self, key: impl Into<String>) -> Result<MutationGuard> {
        let key = key.into();
        let mut inner = self.inner.write();

        if matches!(
            inner.entries.get(&key),
            Some(Entry { state: MutationState::Pending, .. })
        ) {
            return Err(MutationError::AlreadyPending(key));
        }

        Ok(self.start(&mut inner, key))
    }

    /// Start a mutation unconditionally
    ///
    /// A previous pending mutation with the same key can no longer settle it.
    pub fn begin(&self, key: impl Into<String>) -> MutationGuard {
        let mut inner = self.inner.write();
        self.start(&mut inner, key.into())
    }

    fn start(&self, inner: &mut Inner, key: String) -> MutationGuard {
        inner.next_token += 1;
        let token = inner.next_token;
        inner.entries.insert(
            key.clone(),
            Entry {
                state: MutationState::Pending,
                token,
            },
        );

        MutationGuard {
            tracker: self.clone(),
            key,
            token,
            settled: false,
        }
    }

    fn settle(&self, key: &str, token: u64, state: Option<MutationState>) {
        let mut inner = self.inner.write();
        let Some(entry) = inner.entries.get_mut(key) else {
            return;
        };
        if entry.token != token {
            return;
        }

        match state {
            Some(state) => entry.state = state,
            None => {
                inner.entries.remove(key);
            }
        }
    }

    /// Get mutation state
    pub fn state(&self, key: &str) -> MutationState {
        self.inner
            .read()
            .entries
            .get(key)
            .map(|e| e.state)
            .unwrap_or_default()
    }

    /// Whether the mutation with this key is in flight
    pub fn is_pending(&self, key: &str) -> bool {
        self.state(key) == MutationState::Pending
    }

    /// Keys of all in-flight mutations
    pub fn pending_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .inner
            .read()
            .entries
            .iter()
            .filter(|(_, e)| e.state == MutationState::Pending)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Reset mutation state
    pub fn reset(&self, key: &str) {
        self.inner.write().entries.remove(key);
    }

    /// Clear all mutation states
    ///
    /// Outstanding guards become inert.
    pub fn clear(&self) {
        self.inner.write().entries.clear();
    }
}

/// Handle for one in-flight mutation
///
/// Dropping the guard without settling it returns the key to `Idle`, so an
/// abandoned future never leaves a mutation stuck in `Pending`.
#[derive(Debug)]
#[must_use = "dropping the guard immediately ends the mutation"]
pub struct MutationGuard {
    tracker: MutationTracker,
    key: String,
    token: u64,
    settled: bool,
}

impl MutationGuard {
    /// Key this guard tracks
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Mark the mutation successful
    pub fn succeed(mut self) {
        self.finish(MutationState::Success);
    }

    /// Mark the mutation failed
    pub fn fail(mut self) {
        self.finish(MutationState::Error);
    }

    fn finish(&mut self, state: MutationState) {
        self.settled = true;
        self.tracker.settle(&self.key, self.token, Some(state));
    }
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("Mutation {} abandoned before settling", self.key);
            self.tracker.settle(&self.key, self.token, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_success() {
        let tracker = MutationTracker::new();
        let guard = tracker.try_begin("test_mutation").unwrap();
        assert_eq!(tracker.state("test_mutation"), MutationState::Pending);

        guard.succeed();
        assert_eq!(tracker.state("test_mutation"), MutationState::Success);
    }

    #[test]
    fn test_mutation_failure() {
        let tracker = MutationTracker::new();
        tracker.try_begin("test_mutation_fail").unwrap().fail();
        assert_eq!(tracker.state("test_mutation_fail"), MutationState::Error);
    }

    #[test]
    fn test_single_flight_rejects_overlap() {
        let tracker = MutationTracker::new();
        let _guard = tracker.try_begin("create").unwrap();

        let err = tracker.try_begin("create").unwrap_err();
        assert_eq!(err, MutationError::AlreadyPending("create".to_string()));

        // Other keys are independent
        assert!(tracker.try_begin("delete").is_ok());
    }

    #[test]
    fn test_settled_mutation_can_run_again() {
        let tracker = MutationTracker::new();
        tracker.try_begin("create").unwrap().fail();
        assert!(tracker.try_begin("create").is_ok());
    }

    #[test]
    fn test_dropped_guard_returns_to_idle() {
        let tracker = MutationTracker::new();
        {
            let _guard = tracker.try_begin("create").unwrap();
            assert!(tracker.is_pending("create"));
        }
        assert_eq!(tracker.state("create"), MutationState::Idle);
    }

    #[test]
    fn test_clear_makes_old_guards_inert() {
        let tracker = MutationTracker::new();
        let old = tracker.try_begin("create").unwrap();

        tracker.clear();
        let fresh = tracker.try_begin("create").unwrap();

        old.succeed();
        assert_eq!(tracker.state("create"), MutationState::Pending);

        fresh.fail();
        assert_eq!(tracker.state("create"), MutationState::Error);
    }

    #[test]
    fn test_begin_supersedes_previous_guard() {
        let tracker = MutationTracker::new();
        let first = tracker.begin("delete:c1");
        let second = tracker.begin("delete:c1");

        drop(first);
        assert!(tracker.is_pending("delete:c1"));

        second.succeed();
        assert_eq!(tracker.state("delete:c1"), MutationState::Success);
    }

    #[test]
    fn test_pending_keys_and_reset() {
        let tracker = MutationTracker::new();
        let _a = tracker.begin("delete:c2");
        let _b = tracker.begin("delete:c1");
        tracker.begin("delete:c3").succeed();

        assert_eq!(tracker.pending_keys(), vec!["delete:c1", "delete:c2"]);

        tracker.reset("delete:c1");
        assert_eq!(tracker.state("delete:c1"), MutationState::Idle);
    }
}
