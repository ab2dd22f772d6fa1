//! Test utilities and fixtures for comment API testing
//!
//! This module provides common users, comments and subjects shared by the
//! unit and integration tests of the workspace crates.

#![allow(dead_code)] // Test utilities may not all be used yet

use crate::types::{Comment, UserSummary};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed timestamp for reproducible tests (2024-01-01 00:00:00 UTC)
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Test users
pub mod users {
    use super::*;

    fn user(id: &str, username: &str, name: &str) -> UserSummary {
        UserSummary {
            id: id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            avatar: Some(format!("avatar-{}", username)),
        }
    }

    /// Alice
    pub fn alice() -> UserSummary {
        user("u-alice", "alice", "Alice Liddell")
    }

    /// Bob
    pub fn bob() -> UserSummary {
        user("u-bob", "bob", "Bob Builder")
    }

    /// Carol, who never picked a username
    pub fn carol() -> UserSummary {
        UserSummary {
            id: "u-carol".to_string(),
            username: String::new(),
            name: "Carol Jones".to_string(),
            avatar: None,
        }
    }
}

/// Test subjects (posts)
pub mod subjects {
    /// The post used by most scenarios
    pub const P1: &str = "P1";

    /// A second post, for subject switching
    pub const P2: &str = "P2";
}

/// Test comments
pub mod comments {
    use super::*;

    /// Top-level comment by Bob
    pub fn top_level(id: &str, content: &str) -> Comment {
        by(users::bob(), id, content)
    }

    /// Top-level comment by a specific user
    pub fn by(author: UserSummary, id: &str, content: &str) -> Comment {
        let mut comment = Comment::new(id, author, content);
        comment.created_at = fixed_time();
        comment
    }

    /// Reply by Alice to `parent_id`
    pub fn reply(id: &str, parent_id: &str, content: &str) -> Comment {
        by(users::alice(), id, content).in_reply_to(parent_id)
    }

    /// Top-level comment with its replies nested, as the server returns them
    pub fn with_replies(id: &str, content: &str, replies: Vec<Comment>) -> Comment {
        let mut comment = top_level(id, content);
        comment.replies = replies;
        comment
    }

    /// `count` top-level comments, newest first, ids `c1..=cN`
    pub fn sequence(count: usize) -> Vec<Comment> {
        (1..=count)
            .map(|i| {
                let mut comment = top_level(&format!("c{}", i), &format!("comment {}", i));
                comment.created_at = fixed_time() - Duration::minutes(i as i64);
                comment
            })
            .collect()
    }

    /// Ids of a comment slice, for compact assertions
    pub fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }
}
