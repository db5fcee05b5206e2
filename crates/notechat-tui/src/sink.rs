//! Port implementations for the terminal front end.

use std::io::Write;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use notechat_app::{LanguagePicker, PanelSink, SuggestionsView};
use notechat_core::{ChatRole, Message};

use crate::event::UiEvent;

/// Forwards render instructions to the UI thread.
#[derive(Clone)]
pub struct ChannelSink {
    ui_tx: mpsc::Sender<UiEvent>,
}

impl ChannelSink {
    pub fn new(ui_tx: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    async fn send(&self, event: UiEvent) {
        if self.ui_tx.send(event).await.is_err() {
            debug!("UI thread gone, dropping render instruction");
        }
    }
}

#[async_trait]
impl PanelSink for ChannelSink {
    async fn set_panel_visible(&self, visible: bool) {
        self.send(UiEvent::PanelVisible(visible)).await;
    }

    async fn clear_transcript(&self) {
        self.send(UiEvent::TranscriptCleared).await;
    }

    async fn render_message(&self, message: &Message) {
        self.send(UiEvent::Message(message.clone())).await;
    }

    async fn set_pending(&self, pending: bool) {
        self.send(UiEvent::Pending(pending)).await;
    }

    async fn set_suggestions(&self, view: SuggestionsView) {
        self.send(UiEvent::Suggestions(view)).await;
    }

    async fn focus_input(&self, placeholder: &str) {
        self.send(UiEvent::FocusInput(placeholder.to_string())).await;
    }

    async fn scroll_to_latest(&self) {
        self.send(UiEvent::ScrollToLatest).await;
    }
}

/// Asks the UI thread to open the language dialog and waits for the answer.
#[derive(Clone)]
pub struct ChannelPicker {
    ui_tx: mpsc::Sender<UiEvent>,
}

impl ChannelPicker {
    pub fn new(ui_tx: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }
}

#[async_trait]
impl LanguagePicker for ChannelPicker {
    async fn pick_language(&self) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        self.ui_tx.send(UiEvent::PickLanguage(tx)).await.ok()?;
        rx.await.ok()
    }
}

/// Prints rendered messages to stdout, for one-shot questions.
pub struct StdoutSink;

#[async_trait]
impl PanelSink for StdoutSink {
    async fn set_panel_visible(&self, _visible: bool) {}
    async fn clear_transcript(&self) {}

    async fn render_message(&self, message: &Message) {
        let mut out = std::io::stdout().lock();
        let _ = match message.role {
            ChatRole::User => Ok(()),
            ChatRole::Bot => writeln!(out, "{}", message.content),
            ChatRole::Error => writeln!(out, "error: {}", message.content),
        };
    }

    async fn set_pending(&self, _pending: bool) {}
    async fn set_suggestions(&self, _view: SuggestionsView) {}
    async fn focus_input(&self, _placeholder: &str) {}
    async fn scroll_to_latest(&self) {}
}

/// Picker for contexts with no one to ask.
pub struct NoPicker;

#[async_trait]
impl LanguagePicker for NoPicker {
    async fn pick_language(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sink_forwards_events() {
        let (tx, mut rx) = mpsc::channel(8);
        let sink = ChannelSink::new(tx);

        sink.set_pending(true).await;
        sink.render_message(&Message::bot("hi")).await;

        assert!(matches!(rx.recv().await, Some(UiEvent::Pending(true))));
        match rx.recv().await {
            Some(UiEvent::Message(m)) => assert_eq!(m.content, "hi"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_picker_returns_answer() {
        let (tx, mut rx) = mpsc::channel(8);
        let picker = ChannelPicker::new(tx);

        let answer = tokio::spawn(async move { picker.pick_language().await });
        match rx.recv().await {
            Some(UiEvent::PickLanguage(reply)) => reply.send("German".to_string()).unwrap(),
            other => panic!("unexpected event: {:?}", other),
        }

        assert_eq!(answer.await.unwrap().as_deref(), Some("German"));
    }

    #[tokio::test]
    async fn test_picker_dismissed() {
        let (tx, mut rx) = mpsc::channel(8);
        let picker = ChannelPicker::new(tx);

        let answer = tokio::spawn(async move { picker.pick_language().await });
        if let Some(UiEvent::PickLanguage(reply)) = rx.recv().await {
            drop(reply);
        }

        assert_eq!(answer.await.unwrap(), None);
    }
}
