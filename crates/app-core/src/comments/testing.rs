//! In-memory comment API for session tests
//!
//! Behaves like a small server: created comments are stored and returned by
//! later fetches. Each operation can be made to fail or be held at a gate
//! until the test releases it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use api_client::test_utils::{fixed_time, users};
use api_client::{ApiError, Comment, CommentApi, NewComment};
use app_state::{SessionContext, Viewer};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::session::CommentSession;
use super::signals::{drain, SignalReceiver};

type Gate = Mutex<Option<Arc<Notify>>>;

#[derive(Default)]
pub(crate) struct FakeCommentApi {
    threads: Mutex<HashMap<String, Vec<Comment>>>,
    created: Mutex<Vec<NewComment>>,
    next_id: AtomicUsize,

    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,

    fail_fetch: AtomicBool,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,

    fetch_gate: Gate,
    create_gate: Gate,
    delete_gate: Gate,
}

impl FakeCommentApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_thread(self, subject_id: &str, comments: Vec<Comment>) -> Self {
        self.set_thread(subject_id, comments);
        self
    }

    pub(crate) fn set_thread(&self, subject_id: &str, comments: Vec<Comment>) {
        self.threads.lock().insert(subject_id.to_string(), comments);
    }

    pub(crate) fn hold_fetches(&self) -> Arc<Notify> {
        hold(&self.fetch_gate)
    }

    pub(crate) fn hold_creates(&self) -> Arc<Notify> {
        hold(&self.create_gate)
    }

    pub(crate) fn hold_deletes(&self) -> Arc<Notify> {
        hold(&self.delete_gate)
    }

    pub(crate) fn fail_fetches(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn created(&self) -> Vec<NewComment> {
        self.created.lock().clone()
    }
}

fn hold(gate: &Gate) -> Arc<Notify> {
    let notify = Arc::new(Notify::new());
    *gate.lock() = Some(notify.clone());
    notify
}

async fn pass(gate: &Gate) {
    let notify = gate.lock().clone();
    if let Some(notify) = notify {
        notify.notified().await;
    }
}

fn remove_from(comments: &mut Vec<Comment>, id: &str) -> bool {
    if let Some(index) = comments.iter().position(|c| c.id == id) {
        comments.remove(index);
        return true;
    }
    comments.iter_mut().any(|c| remove_from(&mut c.replies, id))
}

#[async_trait]
impl CommentApi for FakeCommentApi {
    async fn fetch_comments(&self, subject_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        pass(&self.fetch_gate).await;

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::new(503, "NetworkError", "Service unavailable"));
        }
        Ok(self
            .threads
            .lock()
            .get(subject_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_comment(&self, input: NewComment) -> Result<Comment, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().push(input.clone());
        pass(&self.create_gate).await;

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ApiError::new(500, "InternalServerError", "Could not save"));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut comment = Comment::new(format!("new-{}", n), users::alice(), input.content);
        comment.created_at = fixed_time();
        comment.parent_id = input.parent_id.clone();

        let mut threads = self.threads.lock();
        let thread = threads.entry(input.subject_id).or_default();
        match &input.parent_id {
            None => thread.insert(0, comment.clone()),
            Some(parent_id) => {
                if let Some(parent) = thread.iter_mut().find(|c| &c.id == parent_id) {
                    parent.replies.push(comment.clone());
                }
            }
        }
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        pass(&self.delete_gate).await;

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ApiError::new(403, "Forbidden", "Not your comment"));
        }
        for thread in self.threads.lock().values_mut() {
            remove_from(thread, comment_id);
        }
        Ok(())
    }
}

/// Closed session viewed by Alice
pub(crate) fn session_with(api: Arc<FakeCommentApi>) -> (CommentSession, SignalReceiver) {
    let context = SessionContext::new(Viewer::new(users::alice().id, users::alice().username));
    CommentSession::new(api, context)
}

/// Session opened on `subject_id` with the open-time signals drained
pub(crate) async fn open_session(
    api: Arc<FakeCommentApi>,
    subject_id: &str,
) -> (Arc<CommentSession>, SignalReceiver) {
    let (session, mut rx) = session_with(api);
    session
        .set_visibility(true, subject_id)
        .await
        .expect("open fetch");
    drain(&mut rx);
    (Arc::new(session), rx)
}

/// Yield to spawned tasks until `condition` holds
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
