//! Comment submission
//!
//! Validates the draft, creates the comment through the API and reconciles
//! the store: top-level comments are prepended, replies trigger a re-fetch
//! because the server nests them under their parent.

use api_client::{ApiError, Comment, NewComment};
use thiserror::Error;

use super::composer::grapheme_len;
use super::session::{CommentSession, CREATE_MUTATION};
use super::signals::ViewSignal;

/// Notice shown when a reply was saved but the list could not be refreshed
pub const REPLY_REFRESH_NOTICE: &str = "Reply posted. Pull to refresh to see it.";

/// Submission errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    /// The draft is empty after trimming
    #[error("Comment is empty")]
    EmptyContent,

    /// The trimmed draft exceeds the length limit
    #[error("Comment is too long ({actual}/{max} characters)")]
    ContentTooLong {
        /// Limit in grapheme clusters
        max: usize,
        /// Length of the trimmed draft
        actual: usize,
    },

    /// Another submission of this session is in flight
    #[error("A comment is already being posted")]
    AlreadySubmitting,

    /// The API rejected or failed the creation
    #[error("Failed to post comment: {0}")]
    CreateFailed(#[source] ApiError),

    /// The overlay is not open
    #[error("Comment overlay is not open")]
    SessionClosed,
}

/// How the store absorbs a created comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Insert the returned comment at the front
    Prepend,
    /// Reload the subject so the reply shows up nested under its parent
    Refetch,
}

impl Reconciliation {
    /// Strategy for a submission with this parent
    pub fn for_parent(parent_id: Option<&str>) -> Self {
        match parent_id {
            Some(_) => Reconciliation::Refetch,
            None => Reconciliation::Prepend,
        }
    }
}

/// Trim `draft` and check it against the length limit
///
/// # Errors
///
/// [`SubmitError::EmptyContent`] for blank drafts and
/// [`SubmitError::ContentTooLong`] above `max_length` grapheme clusters.
pub fn validate_content(draft: &str, max_length: usize) -> Result<String, SubmitError> {
    let content = draft.trim();
    if content.is_empty() {
        return Err(SubmitError::EmptyContent);
    }

    let actual = grapheme_len(content);
    if actual > max_length {
        return Err(SubmitError::ContentTooLong {
            max: max_length,
            actual,
        });
    }
    Ok(content.to_string())
}

impl CommentSession {
    /// Post the current draft
    ///
    /// The draft goes out trimmed, as a reply when a reply target is set.
    /// On success the draft is cleared, the reply target resets and the
    /// comment appears in the store (prepended, or via a re-fetch for
    /// replies). On failure nothing changes so the user can retry.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::EmptyContent`] / [`SubmitError::ContentTooLong`]:
    ///   validation failed, no request was made
    /// - [`SubmitError::AlreadySubmitting`]: a previous submit is in flight
    /// - [`SubmitError::CreateFailed`]: the API call failed
    /// - [`SubmitError::SessionClosed`]: the overlay is not open
    pub async fn submit(&self) -> Result<Comment, SubmitError> {
        let (ticket, input, mutation) = {
            let state = self.state.lock();
            let ticket = state.ticket().ok_or(SubmitError::SessionClosed)?;
            let content = validate_content(
                state.composer.draft(),
                self.context.config().max_comment_length,
            )?;
            let mutation = self
                .mutations
                .try_begin(CREATE_MUTATION)
                .map_err(|_| SubmitError::AlreadySubmitting)?;

            let input = NewComment {
                subject_id: ticket.subject_id.clone(),
                content,
                parent_id: state.reply.parent_id().map(str::to_string),
            };
            (ticket, input, mutation)
        };

        let reconciliation = Reconciliation::for_parent(input.parent_id.as_deref());
        tracing::debug!(
            "Posting comment on {} (reply to {:?})",
            input.subject_id,
            input.parent_id
        );

        let created = match self.api.create_comment(input).await {
            Ok(comment) => {
                mutation.succeed();
                comment
            }
            Err(error) => {
                mutation.fail();
                tracing::warn!("Failed to post comment on {}: {}", ticket.subject_id, error);
                return Err(SubmitError::CreateFailed(error));
            }
        };
        tracing::info!("Posted comment {} on {}", created.id, ticket.subject_id);

        let refetch = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if !state.is_current(&ticket) {
                tracing::debug!("Comment {} created after its session ended", created.id);
                return Ok(created);
            }

            let refetch = match reconciliation {
                Reconciliation::Prepend => {
                    state.store.prepend(created.clone());
                    None
                }
                Reconciliation::Refetch => state.begin_fetch(),
            };
            state.reply.consume_on_submit(&mut state.composer, &self.signals);
            state.composer.hide_emoji_picker(&self.signals);
            refetch
        };

        if let Some(ticket) = refetch {
            if let Err(error) = self.fetch_into_store(ticket).await {
                tracing::warn!("Reply {} posted but the refresh failed: {}", created.id, error);
                self.signals
                    .emit(ViewSignal::Notice(REPLY_REFRESH_NOTICE.to_string()));
            }
        }

        Ok(created)
    }
}
