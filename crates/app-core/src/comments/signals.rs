//! Outbound view signals
//!
//! Fire-and-forget notifications the comment engine emits for the view layer
//! (focus, keyboard, picker, transitions, notices). They never carry data the
//! engine depends on.

use tokio::sync::mpsc;

/// A notification for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSignal {
    /// Focus the composer input
    RequestInputFocus,
    /// Dismiss the on-screen keyboard
    DismissKeyboard,
    /// Show the auxiliary emoji picker
    ShowEmojiPicker,
    /// Hide the auxiliary emoji picker
    HideEmojiPicker,
    /// Start the overlay entrance transition
    StartEntranceTransition,
    /// Start the overlay exit transition
    StartExitTransition,
    /// Show a transient, dismissible notice
    Notice(String),
}

/// Receiving half handed to the view layer
pub type SignalReceiver = mpsc::UnboundedReceiver<ViewSignal>;

/// Sending half owned by a comment session
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<ViewSignal>,
}

impl SignalSender {
    /// Emit a signal
    ///
    /// Signals sent after the view dropped its receiver are discarded.
    pub fn emit(&self, signal: ViewSignal) {
        if self.tx.send(signal).is_err() {
            tracing::trace!("View signal dropped: receiver closed");
        }
    }
}

/// Create a connected sender/receiver pair
pub fn channel() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalSender { tx }, rx)
}

/// Drain every signal currently queued
pub fn drain(rx: &mut SignalReceiver) -> Vec<ViewSignal> {
    let mut signals = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        signals.push(signal);
    }
    signals
}
