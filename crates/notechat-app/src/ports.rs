//! Seams between the controller and its host.
//!
//! The controller never draws anything itself. It raises render
//! instructions into a [`PanelSink`], reads the open document through a
//! [`DocumentSource`] and asks for a target language through a
//! [`LanguagePicker`].

use async_trait::async_trait;

use notechat_core::Message;

/// State of the suggested-actions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionsView {
    /// List is not shown.
    Hidden,
    /// List is shown but the page context is still being read.
    Loading,
    /// List is shown and clickable.
    Ready,
}

/// Render sink implemented by the panel.
#[async_trait]
pub trait PanelSink: Send + Sync {
    /// Show or hide the whole panel.
    async fn set_panel_visible(&self, visible: bool);

    /// Remove every rendered message.
    async fn clear_transcript(&self);

    /// Append a message. Bot messages are rendered as formatted markup,
    /// user and error messages as plain text.
    async fn render_message(&self, message: &Message);

    /// Show or hide the pending ("typing") indicator.
    async fn set_pending(&self, pending: bool);

    /// Update the suggested-actions list.
    async fn set_suggestions(&self, view: SuggestionsView);

    /// Focus the input and replace its placeholder.
    async fn focus_input(&self, placeholder: &str);

    /// Scroll the transcript to the newest entry.
    async fn scroll_to_latest(&self);
}

/// Access to the document currently open in the host.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Full text of the active document, or `None` if nothing is open.
    async fn active_document_text(&self) -> Option<String>;
}

/// Modal asking the user for a target language.
#[async_trait]
pub trait LanguagePicker: Send + Sync {
    /// Resolves once with the chosen language, or `None` if the modal was
    /// dismissed without a choice.
    async fn pick_language(&self) -> Option<String>;
}
