//! Event types for communication between the backend runtime and the UI thread.

use std::path::PathBuf;

use tokio::sync::oneshot;

use notechat_app::SuggestionsView;
use notechat_core::{FloatingPosition, Message, SuggestedAction};

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// Panel shown or hidden.
    PanelVisible(bool),

    /// Transcript emptied for a new session.
    TranscriptCleared,

    /// A message to append to the transcript.
    Message(Message),

    /// Typing indicator on or off.
    Pending(bool),

    /// Suggested actions state changed.
    Suggestions(SuggestionsView),

    /// Focus the input and show a placeholder.
    FocusInput(String),

    /// Jump back to the newest line.
    ScrollToLatest,

    /// Ask the user for a target language. Dropping the sender means cancelled.
    PickLanguage(oneshot::Sender<String>),

    /// Panel layout loaded or changed.
    Layout {
        docked: bool,
        position: FloatingPosition,
    },

    /// Whether a model client is configured.
    Configured(bool),

    /// Active document path changed.
    Document(Option<PathBuf>),

    /// Transient status line.
    Status(String),

    /// The backend could not start; the UI should exit.
    Fatal(String),
}

/// Commands sent from the UI thread to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Open the panel if closed, close it otherwise.
    TogglePanel,

    /// Close the panel.
    ClosePanel,

    /// Send the input text.
    Submit(String),

    /// Run a suggested action.
    RunAction(SuggestedAction),

    /// Store a new API key (empty clears it).
    SetKey(String),

    /// Switch the active document; used from the next open.
    SetDocument(Option<PathBuf>),

    /// Flip between docked and floating layout.
    ToggleDock,

    /// Persist the floating panel position.
    SavePosition(FloatingPosition),

    /// Shut down.
    Quit,
}
