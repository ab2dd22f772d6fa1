//! Comment store
//!
//! Ordered list of top-level comments for one subject. Pure in-memory
//! operations only; all I/O happens in the session.

use api_client::Comment;
use std::collections::HashSet;

/// Top-level comments of one subject, in server order
///
/// Top-level ids are unique at all times.
///
/// # Example
///
/// ```
/// use api_client::{Comment, UserSummary};
/// use app_core::comments::CommentStore;
///
/// let mut store = CommentStore::new();
/// store.load(vec![Comment::new("c1", UserSummary::default(), "hi")]);
/// store.prepend(Comment::new("c2", UserSummary::default(), "hello"));
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.comments()[0].id, "c2");
///
/// assert!(store.remove_by_id("c1"));
/// assert!(!store.remove_by_id("c1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentStore {
    comments: Vec<Comment>,
}

impl CommentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection
    ///
    /// Source order is kept. If the source repeats a top-level id, only the
    /// first occurrence is kept.
    pub fn load(&mut self, comments: Vec<Comment>) {
        let mut seen = HashSet::with_capacity(comments.len());
        let mut kept = Vec::with_capacity(comments.len());

        for comment in comments {
            if seen.insert(comment.id.clone()) {
                kept.push(comment);
            } else {
                tracing::warn!("Dropping duplicate comment {} from load", comment.id);
            }
        }

        self.comments = kept;
    }

    /// Insert a comment at the front
    ///
    /// An existing entry with the same id is removed first.
    pub fn prepend(&mut self, comment: Comment) {
        if let Some(index) = self.position(&comment.id) {
            tracing::debug!("Prepend replaces existing comment {}", comment.id);
            self.comments.remove(index);
        }
        self.comments.insert(0, comment);
    }

    /// Remove the comment with this id
    ///
    /// Nested replies are searched too. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        if let Some(index) = self.position(id) {
            self.comments.remove(index);
            return true;
        }

        self.comments
            .iter_mut()
            .any(|comment| remove_nested(&mut comment.replies, id))
    }

    /// Drop every comment
    pub fn clear(&mut self) {
        self.comments.clear();
    }

    /// Top-level comments in display order
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Look up a top-level comment
    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Whether a top-level comment with this id is held
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Number of top-level comments
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Whether the store holds no comments
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.comments.iter().position(|c| c.id == id)
    }
}

fn remove_nested(replies: &mut Vec<Comment>, id: &str) -> bool {
    if let Some(index) = replies.iter().position(|c| c.id == id) {
        replies.remove(index);
        return true;
    }
    replies
        .iter_mut()
        .any(|reply| remove_nested(&mut reply.replies, id))
}
