//! Comment deletion
//!
//! Deletes through the API first and removes from the store only once the
//! API confirms. There is no optimistic removal.

use api_client::ApiError;
use thiserror::Error;

use super::session::CommentSession;

/// Deletion errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeleteError {
    /// The API rejected or failed the deletion; the store is unchanged
    #[error("Failed to delete comment: {0}")]
    DeleteFailed(#[source] ApiError),

    /// The overlay is not open
    #[error("Comment overlay is not open")]
    SessionClosed,
}

fn mutation_key(comment_id: &str) -> String {
    format!("comment:delete:{}", comment_id)
}

impl CommentSession {
    /// Delete a comment
    ///
    /// Confirmation is the view's job; this call deletes immediately. Ids the
    /// store does not hold are still sent to the API.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError::DeleteFailed`] when the API call fails and
    /// [`DeleteError::SessionClosed`] when the overlay is not open.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), DeleteError> {
        let ticket = self
            .state
            .lock()
            .ticket()
            .ok_or(DeleteError::SessionClosed)?;
        let mutation = self.mutations.begin(mutation_key(comment_id));

        if let Err(error) = self.api.delete_comment(comment_id).await {
            mutation.fail();
            tracing::warn!("Failed to delete comment {}: {}", comment_id, error);
            return Err(DeleteError::DeleteFailed(error));
        }
        mutation.succeed();

        let mut state = self.state.lock();
        if !state.is_current(&ticket) {
            tracing::debug!("Comment {} deleted after its session ended", comment_id);
            return Ok(());
        }
        if state.store.remove_by_id(comment_id) {
            tracing::info!("Deleted comment {}", comment_id);
        } else {
            tracing::debug!("Deleted comment {} was not in the list", comment_id);
        }
        Ok(())
    }

    /// Whether a deletion of this comment is in flight
    pub fn is_deleting(&self, comment_id: &str) -> bool {
        self.mutations.is_pending(&mutation_key(comment_id))
    }
}
