//! UI state for rendering.

use std::path::PathBuf;

use tokio::sync::oneshot;

use notechat_app::SuggestionsView;
use notechat_core::{prompt, FloatingPosition, Message, SuggestedAction};

/// Editable single-line text with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Take the value and reset.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_index(self.cursor);
        self.value.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at_cursor();
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.remove_at_cursor();
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn remove_at_cursor(&mut self) {
        if let Some((byte_idx, ch)) = self.value.char_indices().nth(self.cursor) {
            self.value
                .replace_range(byte_idx..byte_idx + ch.len_utf8(), "");
        }
    }
}

/// What an open dialog is asking for.
#[derive(Debug)]
pub enum DialogKind {
    /// New API key.
    ApiKey,
    /// Path of the document to use as page context.
    Document,
    /// Target language for a translation; the answer goes back to the controller.
    Language(oneshot::Sender<String>),
}

/// A modal prompt on top of the panel.
#[derive(Debug)]
pub struct Dialog {
    pub kind: DialogKind,
    pub input: TextInput,
}

impl Dialog {
    pub fn new(kind: DialogKind) -> Self {
        Self {
            kind,
            input: TextInput::default(),
        }
    }
}

/// Snapshot of data for rendering (no async, no locks).
#[derive(Debug)]
pub struct UiState {
    /// Transcript as rendered by the controller.
    pub messages: Vec<Message>,

    /// Whether the chat panel is shown.
    pub panel_visible: bool,

    /// Typing indicator.
    pub pending: bool,

    /// Suggested actions.
    pub suggestions: SuggestionsView,

    /// Highlighted suggestion, index into `SuggestedAction::all()`.
    pub selected_action: Option<usize>,

    /// Chat input.
    pub input: TextInput,

    /// Placeholder for an empty input.
    pub placeholder: String,

    /// Lines scrolled back from the newest.
    pub scroll_back: usize,

    /// Docked to the right edge instead of floating.
    pub docked: bool,

    /// Floating panel origin.
    pub position: FloatingPosition,

    /// Position moved since the panel was opened.
    pub position_dirty: bool,

    /// Whether a model client is configured.
    pub configured: bool,

    /// Active document.
    pub document: Option<PathBuf>,

    /// Open modal dialog.
    pub dialog: Option<Dialog>,

    /// Status message to display in footer.
    pub status_message: Option<String>,

    /// Startup failure reported by the backend.
    pub fatal: Option<String>,

    /// Set when the app should exit.
    pub quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            panel_visible: false,
            pending: false,
            suggestions: SuggestionsView::Hidden,
            selected_action: None,
            input: TextInput::default(),
            placeholder: prompt::DEFAULT_PLACEHOLDER.to_string(),
            scroll_back: 0,
            docked: false,
            position: FloatingPosition::default(),
            position_dirty: false,
            configured: false,
            document: None,
            dialog: None,
            status_message: None,
            fatal: None,
            quit: false,
        }
    }
}

impl UiState {
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether suggestions can be clicked.
    pub fn suggestions_ready(&self) -> bool {
        self.suggestions == SuggestionsView::Ready
    }

    pub fn selected(&self) -> Option<SuggestedAction> {
        self.selected_action
            .and_then(|i| SuggestedAction::all().get(i).copied())
    }

    pub fn select_next_action(&mut self) {
        let count = SuggestedAction::all().len();
        self.selected_action = Some(match self.selected_action {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    pub fn select_prev_action(&mut self) {
        let count = SuggestedAction::all().len();
        self.selected_action = Some(match self.selected_action {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }

    /// Move the floating panel by a cell offset.
    pub fn move_panel(&mut self, dx: i32, dy: i32) {
        let shift = |v: u16, d: i32| (i32::from(v) + d).clamp(0, i32::from(u16::MAX)) as u16;
        self.position = FloatingPosition {
            x: shift(self.position.x, dx),
            y: shift(self.position.y, dy),
        };
        self.position_dirty = true;
    }
}
