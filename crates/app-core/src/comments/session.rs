//! Comment overlay session
//!
//! [`CommentSession`] owns everything one comment overlay needs: the store,
//! the reply target, the composer and the lifecycle phase. Every method takes
//! `&self`; state sits behind a mutex that is never held across an `.await`.
//!
//! Each open starts a new epoch. Async completions carry the epoch they were
//! started in and are discarded when the session has since closed or moved on
//! to another subject.

use std::sync::Arc;

use api_client::{ApiError, Comment, CommentApi};
use app_state::{MutationTracker, SessionContext};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use super::composer::Composer;
use super::lifecycle::{LifecycleAction, Visibility};
use super::reply::ReplyTarget;
use super::signals::{self, SignalReceiver, SignalSender, ViewSignal};
use super::store::CommentStore;

/// Mutation key guarding comment creation
pub(crate) const CREATE_MUTATION: &str = "comment:create";

/// Errors from loading a subject's comments
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// The API call failed; the store was left as it was
    #[error("Failed to load comments: {0}")]
    FetchFailed(#[source] ApiError),

    /// The overlay is not open
    #[error("Comment overlay is not open")]
    SessionClosed,
}

/// Identifies the session generation an async operation belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub(crate) epoch: u64,
    pub(crate) subject_id: String,
}

#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) visibility: Visibility,
    pub(crate) subject_id: Option<String>,
    pub(crate) epoch: u64,
    pub(crate) store: CommentStore,
    pub(crate) reply: ReplyTarget,
    pub(crate) composer: Composer,
    pub(crate) fetches_in_flight: usize,
}

impl SessionState {
    fn new(max_length: usize) -> Self {
        Self {
            visibility: Visibility::Closed,
            subject_id: None,
            epoch: 0,
            store: CommentStore::new(),
            reply: ReplyTarget::Idle,
            composer: Composer::new(max_length),
            fetches_in_flight: 0,
        }
    }

    pub(crate) fn ticket(&self) -> Option<Ticket> {
        if !self.visibility.is_active() {
            return None;
        }
        self.subject_id.as_ref().map(|subject_id| Ticket {
            epoch: self.epoch,
            subject_id: subject_id.clone(),
        })
    }

    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.epoch == ticket.epoch && self.visibility.is_active()
    }

    pub(crate) fn begin_fetch(&mut self) -> Option<Ticket> {
        let ticket = self.ticket()?;
        self.fetches_in_flight += 1;
        Some(ticket)
    }
}

/// Everything the view needs to render the overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    /// Lifecycle phase
    pub visibility: Visibility,
    /// Subject the overlay is showing
    pub subject_id: Option<String>,
    /// Top-level comments in display order
    pub comments: Vec<Comment>,
    /// Composer draft
    pub draft: String,
    /// Composer placeholder
    pub placeholder: String,
    /// "Replying to" label while composing a reply
    pub replying_to: Option<String>,
    /// Whether the emoji picker is shown
    pub emoji_picker_open: bool,
    /// Whether a fetch for this session is in flight
    pub loading: bool,
    /// Whether a submission is in flight
    pub submitting: bool,
    /// Whether the post button is enabled
    pub can_post: bool,
    /// Graphemes left before the length limit
    pub remaining: isize,
}

/// Interaction engine of one comment overlay
///
/// Created once per hosting screen together with the receiver for its
/// [`ViewSignal`]s.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use api_client::{ClientConfig, HttpCommentApi};
/// use app_core::comments::CommentSession;
/// use app_state::{SessionContext, Viewer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpCommentApi::new(ClientConfig::new("https://api.example.com"))?;
/// let context = SessionContext::new(Viewer::new("u-1", "alice"));
/// let (session, _signals) = CommentSession::new(Arc::new(api), context);
///
/// session.set_visibility(true, "post-1").await?;
/// session.set_draft("Nice shot!");
/// let comment = session.submit().await?;
/// println!("posted {}", comment.id);
/// # Ok(())
/// # }
/// ```
pub struct CommentSession {
    pub(super) api: Arc<dyn CommentApi>,
    pub(super) context: SessionContext,
    pub(super) signals: SignalSender,
    pub(super) mutations: MutationTracker,
    pub(super) state: Mutex<SessionState>,
}

impl std::fmt::Debug for CommentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentSession")
            .field("context", &self.context)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl CommentSession {
    /// Create a closed session and the receiver for its view signals
    pub fn new(api: Arc<dyn CommentApi>, context: SessionContext) -> (Self, SignalReceiver) {
        let (signals, receiver) = signals::channel();
        let max_length = context.config().max_comment_length;

        let session = Self {
            api,
            context,
            signals,
            mutations: MutationTracker::new(),
            state: Mutex::new(SessionState::new(max_length)),
        };
        (session, receiver)
    }

    /// Injected context
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Apply the host's visibility flag for `subject_id`
    ///
    /// Showing the overlay (or switching it to another subject) starts a clean
    /// session and loads its comments. Hiding it starts the exit transition;
    /// `subject_id` is then ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::FetchFailed`] if the initial load fails. The
    /// overlay stays open with an empty list.
    pub async fn set_visibility(&self, visible: bool, subject_id: &str) -> Result<(), FetchError> {
        if !visible {
            self.close();
            return Ok(());
        }

        let ticket = {
            let mut state = self.state.lock();
            let same_subject = state.subject_id.as_deref() == Some(subject_id);
            if state.visibility.on_visibility(true, same_subject) != LifecycleAction::Open {
                return Ok(());
            }
            self.open_locked(&mut *state, subject_id)
        };

        match ticket {
            Some(ticket) => self.fetch_into_store(ticket).await,
            None => Ok(()),
        }
    }

    /// Hide the overlay
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.visibility.on_visibility(false, true) != LifecycleAction::Close {
            return;
        }

        tracing::info!(
            "Closing comments for {}",
            state.subject_id.as_deref().unwrap_or_default()
        );
        state.visibility = Visibility::Closing;
        state.reply = ReplyTarget::Idle;
        state.composer.hide_emoji_picker(&self.signals);
        state.composer.clear();
        state.fetches_in_flight = 0;

        self.signals.emit(ViewSignal::DismissKeyboard);
        self.signals.emit(ViewSignal::StartExitTransition);
    }

    /// The entrance transition finished
    pub fn entrance_finished(&self) {
        let mut state = self.state.lock();
        state.visibility = state.visibility.on_entrance_finished();
    }

    /// The exit transition finished; session state is discarded
    pub fn exit_finished(&self) {
        let mut state = self.state.lock();
        let next = state.visibility.on_exit_finished();
        if next == Visibility::Closed && state.visibility != Visibility::Closed {
            state.store.clear();
            state.subject_id = None;
            self.mutations.clear();
        }
        state.visibility = next;
    }

    /// Reload the comments of the open subject
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::SessionClosed`] when the overlay is not open and
    /// [`FetchError::FetchFailed`] when the API call fails.
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let ticket = self
            .state
            .lock()
            .begin_fetch()
            .ok_or(FetchError::SessionClosed)?;
        self.fetch_into_store(ticket).await
    }

    fn open_locked(&self, state: &mut SessionState, subject_id: &str) -> Option<Ticket> {
        tracing::info!("Opening comments for {}", subject_id);

        state.epoch += 1;
        state.visibility = Visibility::Opening;
        state.subject_id = Some(subject_id.to_string());
        state.store.clear();
        state.reply = ReplyTarget::Idle;
        state.composer.hide_emoji_picker(&self.signals);
        state.composer.reset();
        state.fetches_in_flight = 0;
        self.mutations.clear();

        self.signals.emit(ViewSignal::StartEntranceTransition);
        state.begin_fetch()
    }

    pub(crate) async fn fetch_into_store(&self, ticket: Ticket) -> Result<(), FetchError> {
        let result = self.api.fetch_comments(&ticket.subject_id).await;

        let mut state = self.state.lock();
        if !state.is_current(&ticket) {
            tracing::debug!(
                "Discarding comments for {} fetched by a previous session",
                ticket.subject_id
            );
            return Ok(());
        }
        state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);

        match result {
            Ok(comments) => {
                tracing::debug!("Loaded {} comments for {}", comments.len(), ticket.subject_id);
                state.store.load(comments);
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Failed to load comments for {}: {}", ticket.subject_id, error);
                Err(FetchError::FetchFailed(error))
            }
        }
    }

    // =========================================================================
    // Composer
    // =========================================================================

    /// Start replying to `comment`, mentioning `username` in the draft
    pub fn begin_reply(&self, comment: Comment, username: Option<&str>) {
        self.with_active("begin reply", |state| {
            state
                .reply
                .begin(comment, username, &mut state.composer, &self.signals)
        });
    }

    /// Abandon the reply in progress; returns whether there was one
    pub fn cancel_reply(&self) -> bool {
        self.with_active("cancel reply", |state| {
            state.reply.cancel(&mut state.composer, &self.signals)
        })
        .unwrap_or(false)
    }

    /// Replace the draft text
    pub fn set_draft(&self, text: &str) {
        self.with_active("edit draft", |state| state.composer.set_draft(text));
    }

    /// Append an emoji to the draft; returns whether it fit
    pub fn insert_emoji(&self, emoji: &str) -> bool {
        self.with_active("insert emoji", |state| state.composer.insert_emoji(emoji))
            .unwrap_or(false)
    }

    /// Show or hide the emoji picker
    pub fn toggle_emoji_picker(&self) {
        self.with_active("toggle emoji picker", |state| {
            state.composer.toggle_emoji_picker(&self.signals)
        });
    }

    /// The composer input gained focus
    pub fn on_input_focus(&self) {
        self.with_active("focus input", |state| {
            state.composer.on_input_focus(&self.signals)
        });
    }

    fn with_active<R>(&self, action: &str, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let mut state = self.state.lock();
        if !state.visibility.is_active() {
            tracing::debug!("Ignoring {} while {:?}", action, state.visibility);
            return None;
        }
        Some(f(&mut *state))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lifecycle phase
    pub fn visibility(&self) -> Visibility {
        self.state.lock().visibility
    }

    /// Subject of the current session
    pub fn subject_id(&self) -> Option<String> {
        self.state.lock().subject_id.clone()
    }

    /// Top-level comments in display order
    pub fn comments(&self) -> Vec<Comment> {
        self.state.lock().store.comments().to_vec()
    }

    /// Composer draft
    pub fn draft(&self) -> String {
        self.state.lock().composer.draft().to_string()
    }

    /// Comment being replied to
    pub fn reply_target(&self) -> Option<Comment> {
        self.state.lock().reply.comment().cloned()
    }

    /// Composer placeholder
    pub fn placeholder(&self) -> String {
        self.state
            .lock()
            .reply
            .placeholder(self.context.config())
            .to_string()
    }

    /// "Replying to" label while composing a reply
    pub fn replying_to_label(&self) -> Option<String> {
        self.state.lock().reply.label().map(str::to_string)
    }

    /// Whether the emoji picker is shown
    pub fn is_emoji_picker_open(&self) -> bool {
        self.state.lock().composer.is_emoji_picker_open()
    }

    /// Whether a fetch for this session is in flight
    pub fn is_loading(&self) -> bool {
        self.state.lock().fetches_in_flight > 0
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.mutations.is_pending(CREATE_MUTATION)
    }

    /// Whether the post button is enabled
    pub fn can_post(&self) -> bool {
        let state = self.state.lock();
        state.visibility.is_active() && state.composer.can_post(self.is_submitting())
    }

    /// Whether the viewer may be offered "delete" for `comment`
    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.context.can_delete(comment)
    }

    /// Consistent view of the whole overlay
    pub fn snapshot(&self) -> OverlaySnapshot {
        let state = self.state.lock();
        let submitting = self.is_submitting();

        OverlaySnapshot {
            visibility: state.visibility,
            subject_id: state.subject_id.clone(),
            comments: state.store.comments().to_vec(),
            draft: state.composer.draft().to_string(),
            placeholder: state.reply.placeholder(self.context.config()).to_string(),
            replying_to: state.reply.label().map(str::to_string),
            emoji_picker_open: state.composer.is_emoji_picker_open(),
            loading: state.fetches_in_flight > 0,
            submitting,
            can_post: state.visibility.is_active() && state.composer.can_post(submitting),
            remaining: state.composer.remaining(),
        }
    }
}
