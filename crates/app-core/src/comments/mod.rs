//! Comment overlay engine
//!
//! State and interaction logic behind the comment overlay of a post: the
//! comment list, reply targeting, the composer, submission, deletion and the
//! overlay lifecycle. Rendering is left to the host; it drives a
//! [`CommentSession`] and listens to its [`ViewSignal`]s.

pub mod composer;
pub mod deletion;
pub mod lifecycle;
pub mod reply;
pub mod session;
pub mod signals;
pub mod store;
pub mod submission;

#[cfg(test)]
pub(crate) mod testing;

pub use composer::{grapheme_len, Composer};
pub use deletion::DeleteError;
pub use lifecycle::{LifecycleAction, Visibility};
pub use reply::ReplyTarget;
pub use session::{CommentSession, FetchError, OverlaySnapshot};
pub use signals::{SignalReceiver, SignalSender, ViewSignal};
pub use store::CommentStore;
pub use submission::{validate_content, Reconciliation, SubmitError, REPLY_REFRESH_NOTICE};
