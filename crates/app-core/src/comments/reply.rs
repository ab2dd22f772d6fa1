//! Reply target
//!
//! Tracks whether the composer is writing a top-level comment or replying to
//! a specific one, and prefills the draft with a mention when a reply starts.

use super::composer::Composer;
use super::signals::{SignalSender, ViewSignal};
use api_client::Comment;
use app_state::OverlayConfig;

/// What the next submission answers
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReplyTarget {
    /// Next submission is a top-level comment
    #[default]
    Idle,
    /// Next submission replies to this comment
    Replying(Comment),
}

impl ReplyTarget {
    /// The comment being replied to
    pub fn comment(&self) -> Option<&Comment> {
        match self {
            ReplyTarget::Idle => None,
            ReplyTarget::Replying(comment) => Some(comment),
        }
    }

    /// Parent id for the next submission
    pub fn parent_id(&self) -> Option<&str> {
        self.comment().map(|c| c.id.as_str())
    }

    /// Whether a reply is being composed
    pub fn is_replying(&self) -> bool {
        matches!(self, ReplyTarget::Replying(_))
    }

    /// Composer placeholder for this target
    pub fn placeholder<'a>(&self, config: &'a OverlayConfig) -> &'a str {
        match self {
            ReplyTarget::Idle => &config.comment_placeholder,
            ReplyTarget::Replying(_) => &config.reply_placeholder,
        }
    }

    /// "Replying to" label: the author's username, falling back to their name
    pub fn label(&self) -> Option<&str> {
        self.comment().map(|c| c.author.label())
    }

    /// Start replying to `comment`
    ///
    /// Replaces any previous target. With a non-empty `username` the draft
    /// becomes `"@username "`; otherwise it is left as is.
    pub fn begin(
        &mut self,
        comment: Comment,
        username: Option<&str>,
        composer: &mut Composer,
        signals: &SignalSender,
    ) {
        tracing::debug!("Replying to comment {}", comment.id);
        *self = ReplyTarget::Replying(comment);

        if let Some(username) = username.filter(|u| !u.is_empty()) {
            composer.set_draft(&format!("@{} ", username));
        }
        signals.emit(ViewSignal::RequestInputFocus);
    }

    /// Abandon the reply, discarding the draft
    ///
    /// Does nothing when no reply is in progress. Returns whether a reply was
    /// cancelled.
    pub fn cancel(&mut self, composer: &mut Composer, signals: &SignalSender) -> bool {
        if !self.is_replying() {
            return false;
        }
        *self = ReplyTarget::Idle;
        composer.clear();
        signals.emit(ViewSignal::DismissKeyboard);
        true
    }

    /// Reset after a successful submission, whatever the target was
    pub fn consume_on_submit(&mut self, composer: &mut Composer, signals: &SignalSender) {
        *self = ReplyTarget::Idle;
        composer.clear();
        signals.emit(ViewSignal::DismissKeyboard);
    }
}
