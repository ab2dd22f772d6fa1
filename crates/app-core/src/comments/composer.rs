//! Comment composer
//!
//! Draft text and the auxiliary emoji picker of the overlay input bar.
//! Length is measured in grapheme clusters so emoji and combined characters
//! count once.

use super::signals::{SignalSender, ViewSignal};
use unicode_segmentation::UnicodeSegmentation;

/// Number of grapheme clusters in `text`
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Composer state for one overlay session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    draft: String,
    emoji_picker_open: bool,
    max_length: usize,
}

impl Composer {
    /// Create an empty composer that caps drafts at `max_length` graphemes
    pub fn new(max_length: usize) -> Self {
        Self {
            draft: String::new(),
            emoji_picker_open: false,
            max_length,
        }
    }

    /// Current draft text, untrimmed
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Maximum draft length in grapheme clusters
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Graphemes left before the limit
    pub fn remaining(&self) -> isize {
        self.max_length as isize - grapheme_len(&self.draft) as isize
    }

    /// Replace the draft, truncating at the length limit
    pub fn set_draft(&mut self, text: &str) {
        self.draft = truncate_graphemes(text, self.max_length);
    }

    /// Append an emoji unless that would exceed the limit
    ///
    /// Returns whether the emoji was inserted.
    pub fn insert_emoji(&mut self, emoji: &str) -> bool {
        if grapheme_len(&self.draft) + grapheme_len(emoji) > self.max_length {
            return false;
        }
        self.draft.push_str(emoji);
        true
    }

    /// Empty the draft
    pub fn clear(&mut self) {
        self.draft.clear();
    }

    /// Whether the draft holds something other than whitespace
    pub fn has_content(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Whether the post button is enabled
    pub fn can_post(&self, submitting: bool) -> bool {
        self.has_content() && !submitting
    }

    /// Whether the emoji picker is shown
    pub fn is_emoji_picker_open(&self) -> bool {
        self.emoji_picker_open
    }

    /// Flip the emoji picker
    ///
    /// Opening the picker dismisses the keyboard; closing it hands focus back
    /// to the input.
    pub fn toggle_emoji_picker(&mut self, signals: &SignalSender) {
        if self.emoji_picker_open {
            self.emoji_picker_open = false;
            signals.emit(ViewSignal::HideEmojiPicker);
            signals.emit(ViewSignal::RequestInputFocus);
        } else {
            self.emoji_picker_open = true;
            signals.emit(ViewSignal::DismissKeyboard);
            signals.emit(ViewSignal::ShowEmojiPicker);
        }
    }

    /// Hide the emoji picker if it is shown
    pub fn hide_emoji_picker(&mut self, signals: &SignalSender) {
        if self.emoji_picker_open {
            self.emoji_picker_open = false;
            signals.emit(ViewSignal::HideEmojiPicker);
        }
    }

    /// The input gained focus; the keyboard replaces the picker
    pub fn on_input_focus(&mut self, signals: &SignalSender) {
        self.hide_emoji_picker(signals);
    }

    /// Back to an empty draft with the picker closed, without signals
    pub fn reset(&mut self) {
        self.draft.clear();
        self.emoji_picker_open = false;
    }
}

fn truncate_graphemes(text: &str, max: usize) -> String {
    match text.grapheme_indices(true).nth(max) {
        Some((byte_offset, _)) => text[..byte_offset].to_string(),
        None => text.to_string(),
    }
}
