//! Feedline API client library
//!
//! This crate provides the HTTP transport, the comment wire types and the
//! [`CommentApi`] collaborator trait consumed by the comment engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comments;
pub mod http;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod test_utils;

pub use comments::{CommentApi, HttpCommentApi, NewComment};
pub use http::{ApiError, ClientConfig, ConfigError, HttpClient};
pub use types::{Comment, UserSummary};

#[cfg(any(test, feature = "mock"))]
pub use comments::MockCommentApi;
