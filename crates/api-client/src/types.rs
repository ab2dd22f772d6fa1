//! Comment wire types
//!
//! Field names follow the API's JSON (`_id`, `user`, `likesCount`, ...) and
//! are mapped onto Rust names with serde attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a user as embedded in a comment
///
/// Owned by the API; the client never edits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier
    #[serde(default, alias = "_id")]
    pub id: String,
    /// Unique username (without the leading `@`)
    #[serde(default)]
    pub username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Avatar reference (URL or asset key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserSummary {
    /// Username if set, otherwise the display name
    pub fn label(&self) -> &str {
        if self.username.is_empty() {
            &self.name
        } else {
            &self.username
        }
    }
}

/// A comment on a post
///
/// Top-level comments may carry their server-nested replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier assigned by the API at creation
    #[serde(rename = "_id")]
    pub id: String,
    /// Author of the comment
    #[serde(rename = "user")]
    pub author: UserSummary,
    /// Comment text
    pub content: String,
    /// Parent comment id for replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Number of likes
    #[serde(default, rename = "likesCount")]
    pub like_count: u32,
    /// Whether the current user liked this comment
    #[serde(default, rename = "isLiked")]
    pub liked_by_current_user: bool,
    /// Replies nested under this comment by the server
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Create a top-level comment with no likes or replies
    pub fn new(id: impl Into<String>, author: UserSummary, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author,
            content: content.into(),
            parent_id: None,
            created_at: Utc::now(),
            like_count: 0,
            liked_by_current_user: false,
            replies: Vec::new(),
        }
    }

    /// Turn this comment into a reply to `parent_id`
    pub fn in_reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Whether this comment has no parent
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this comment replies to another
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}
