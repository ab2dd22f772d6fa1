//! Application state management for Feedline
//!
//! This crate provides mutation tracking with single-flight guards and the
//! session context injected into a comment overlay.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod mutation;

pub use context::{OverlayConfig, SessionContext, Viewer, MAX_COMMENT_LENGTH};
pub use mutation::{MutationError, MutationGuard, MutationState, MutationTracker};
