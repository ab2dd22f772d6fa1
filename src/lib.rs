//! Feedline
//!
//! Comment overlay engine for the Feedline social feed client. This crate
//! re-exports the workspace crates under one name:
//!
//! - [`api`]: HTTP transport, wire types and the [`CommentApi`] trait
//! - [`state`]: mutation tracking and the injected session context
//! - [`comments`]: the overlay engine driven by [`CommentSession`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use api_client as api;
pub use app_core::comments;
pub use app_state as state;

pub use api_client::{ApiError, ClientConfig, Comment, CommentApi, HttpCommentApi, UserSummary};
pub use app_core::comments::{
    CommentSession, DeleteError, FetchError, OverlaySnapshot, SubmitError, ViewSignal, Visibility,
};
pub use app_state::{OverlayConfig, SessionContext, Viewer};
