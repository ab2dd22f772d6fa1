//! Overlay lifecycle
//!
//! Four-phase visibility state machine for the comment overlay. Transitions
//! here are pure; the session applies the resulting [`LifecycleAction`].

use serde::Serialize;

/// Visibility phase of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Not shown; no session state is held
    #[default]
    Closed,
    /// Entrance transition running, content already interactive
    Opening,
    /// Fully shown
    Open,
    /// Exit transition running
    Closing,
}

/// What the session must do after a visibility input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Start a fresh session for the requested subject
    Open,
    /// Tear the session down and run the exit transition
    Close,
    /// Nothing to do
    Stay,
}

impl Visibility {
    /// Whether interactions (compose, submit, delete) are accepted
    pub fn is_active(self) -> bool {
        matches!(self, Visibility::Opening | Visibility::Open)
    }

    /// Decide how to react to the host's `visible` flag
    ///
    /// `same_subject` tells whether the requested subject equals the one the
    /// current session was opened for.
    pub fn on_visibility(self, visible: bool, same_subject: bool) -> LifecycleAction {
        match (self, visible) {
            (Visibility::Closed, true) | (Visibility::Closing, true) => LifecycleAction::Open,
            (Visibility::Opening, true) | (Visibility::Open, true) => {
                if same_subject {
                    LifecycleAction::Stay
                } else {
                    LifecycleAction::Open
                }
            }
            (Visibility::Opening, false) | (Visibility::Open, false) => LifecycleAction::Close,
            (Visibility::Closed, false) | (Visibility::Closing, false) => LifecycleAction::Stay,
        }
    }

    /// Phase after the entrance transition completes
    pub fn on_entrance_finished(self) -> Self {
        match self {
            Visibility::Opening => Visibility::Open,
            other => other,
        }
    }

    /// Phase after the exit transition completes
    pub fn on_exit_finished(self) -> Self {
        match self {
            Visibility::Closing => Visibility::Closed,
            other => other,
        }
    }
}
