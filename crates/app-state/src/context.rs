//! Session context
//!
//! Explicit, injected replacement for ambient auth/app globals: the hosting
//! screen builds a [`SessionContext`] when the comment overlay opens and it is
//! dropped together with the overlay session.

use api_client::Comment;
use serde::{Deserialize, Serialize};

/// Maximum length of a comment, in grapheme clusters
pub const MAX_COMMENT_LENGTH: usize = 500;

/// The signed-in user viewing the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// User identifier, compared with comment authors
    pub id: String,
    /// Username (without `@`)
    pub username: String,
}

impl Viewer {
    /// Create a viewer
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// Overlay behaviour settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Maximum comment length, in grapheme clusters
    pub max_comment_length: usize,
    /// Composer placeholder when writing a top-level comment
    pub comment_placeholder: String,
    /// Composer placeholder when replying
    pub reply_placeholder: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_comment_length: MAX_COMMENT_LENGTH,
            comment_placeholder: "Add a comment...".to_string(),
            reply_placeholder: "Reply to comment...".to_string(),
        }
    }
}

/// Context injected into a comment overlay session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    viewer: Option<Viewer>,
    config: OverlayConfig,
}

impl SessionContext {
    /// Context for a signed-in viewer with default settings
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer: Some(viewer),
            config: OverlayConfig::default(),
        }
    }

    /// Context with nobody signed in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replace the overlay settings
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// The signed-in viewer, if any
    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// Overlay settings
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Whether the viewer wrote this comment
    ///
    /// Presentation hint for offering "delete"; the API remains the
    /// authority on whether a deletion is allowed.
    pub fn can_delete(&self, comment: &Comment) -> bool {
        match &self.viewer {
            Some(viewer) => !viewer.id.is_empty() && viewer.id == comment.author.id,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::test_utils::{comments, users};

    #[test]
    fn test_can_delete_own_comment_only() {
        let ctx = SessionContext::new(Viewer::new("u-bob", "bob"));

        let own = comments::by(users::bob(), "c1", "mine");
        let other = comments::by(users::alice(), "c2", "theirs");

        assert!(ctx.can_delete(&own));
        assert!(!ctx.can_delete(&other));
    }

    #[test]
    fn test_anonymous_cannot_delete() {
        let ctx = SessionContext::anonymous();
        assert!(ctx.viewer().is_none());
        assert!(!ctx.can_delete(&comments::top_level("c1", "hi")));
    }

    #[test]
    fn test_overlay_config_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.max_comment_length, 500);
        assert_eq!(config.comment_placeholder, "Add a comment...");
        assert_eq!(config.reply_placeholder, "Reply to comment...");
    }

    #[test]
    fn test_overlay_config_partial_json() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{ "max_comment_length": 280 }"#).unwrap();
        assert_eq!(config.max_comment_length, 280);
        assert_eq!(config.reply_placeholder, "Reply to comment...");

        let ctx = SessionContext::anonymous().with_config(config);
        assert_eq!(ctx.config().max_comment_length, 280);
    }
}
