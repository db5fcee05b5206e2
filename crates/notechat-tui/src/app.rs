//! Application state and main event loop.

use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::debug;

use notechat_app::SuggestionsView;
use notechat_core::SuggestedAction;

use crate::event::{BackendCommand, UiEvent};
use crate::state::{Dialog, DialogKind, UiState};
use crate::ui;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl App {
    /// Create a new application instance with channel handles.
    pub fn new(ui_rx: mpsc::Receiver<UiEvent>, cmd_tx: mpsc::Sender<BackendCommand>) -> Self {
        Self {
            state: UiState::default(),
            ui_rx,
            cmd_tx,
        }
    }

    /// Open the panel as soon as the backend is up.
    pub fn open_on_start(&self) {
        self.send(BackendCommand::TogglePanel);
    }

    /// Startup failure reported by the backend, if any.
    pub fn fatal(&self) -> Option<&str> {
        self.state.fatal.as_deref()
    }

    /// Run the main event loop.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }

            if self.state.should_quit() {
                break;
            }
        }

        if self.state.position_dirty {
            self.send(BackendCommand::SavePosition(self.state.position));
        }
        self.send(BackendCommand::Quit);

        Ok(())
    }

    fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.blocking_send(cmd).is_err() {
            debug!("Backend gone, dropping command");
        }
    }

    /// Apply an event from the backend to the UI state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PanelVisible(visible) => {
                self.state.panel_visible = visible;
                if visible {
                    self.state.selected_action = None;
                    self.state.scroll_back = 0;
                } else if self.state.position_dirty {
                    self.state.position_dirty = false;
                    self.send(BackendCommand::SavePosition(self.state.position));
                }
            }
            UiEvent::TranscriptCleared => {
                self.state.messages.clear();
            }
            UiEvent::Message(message) => {
                self.state.messages.push(message);
            }
            UiEvent::Pending(pending) => {
                self.state.pending = pending;
            }
            UiEvent::Suggestions(view) => {
                self.state.suggestions = view;
                if view == SuggestionsView::Hidden {
                    self.state.selected_action = None;
                }
            }
            UiEvent::FocusInput(placeholder) => {
                self.state.placeholder = placeholder;
            }
            UiEvent::ScrollToLatest => {
                self.state.scroll_back = 0;
            }
            UiEvent::PickLanguage(reply) => {
                self.state.dialog = Some(Dialog::new(DialogKind::Language(reply)));
            }
            UiEvent::Layout { docked, position } => {
                self.state.docked = docked;
                self.state.position = position;
                self.state.position_dirty = false;
            }
            UiEvent::Configured(configured) => {
                self.state.configured = configured;
            }
            UiEvent::Document(path) => {
                self.state.document = path;
            }
            UiEvent::Status(message) => {
                self.state.status_message = Some(message);
            }
            UiEvent::Fatal(message) => {
                self.state.fatal = Some(message);
                self.state.quit = true;
            }
        }
    }

    /// Handle a key press.
    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('c') {
            self.state.quit = true;
            return;
        }

        if self.state.dialog.is_some() {
            self.handle_dialog_key(key.code);
            return;
        }

        // Status line shows until the next key.
        self.state.status_message = None;

        if ctrl {
            match key.code {
                KeyCode::Char('o') => self.send(BackendCommand::TogglePanel),
                KeyCode::Char('k') => {
                    self.state.dialog = Some(Dialog::new(DialogKind::ApiKey));
                }
                KeyCode::Char('f') => {
                    let mut dialog = Dialog::new(DialogKind::Document);
                    if let Some(path) = &self.state.document {
                        for c in path.to_string_lossy().chars() {
                            dialog.input.insert(c);
                        }
                    }
                    self.state.dialog = Some(dialog);
                }
                KeyCode::Char('d') => self.send(BackendCommand::ToggleDock),
                KeyCode::Char('q') => self.state.quit = true,
                _ => {}
            }
            return;
        }

        if alt {
            if self.state.panel_visible && !self.state.docked {
                match key.code {
                    KeyCode::Left => self.state.move_panel(-2, 0),
                    KeyCode::Right => self.state.move_panel(2, 0),
                    KeyCode::Up => self.state.move_panel(0, -1),
                    KeyCode::Down => self.state.move_panel(0, 1),
                    _ => {}
                }
            }
            return;
        }

        if !self.state.panel_visible {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.state.quit = true,
                KeyCode::Enter => self.send(BackendCommand::TogglePanel),
                _ => {}
            }
            return;
        }

        self.handle_panel_key(key.code);
    }

    /// Handle key press while the panel is open.
    fn handle_panel_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.send(BackendCommand::ClosePanel),

            KeyCode::Enter => {
                if self.state.input.is_blank() {
                    if let Some(action) = self.state.selected() {
                        self.run_action(action);
                    }
                    return;
                }
                let text = self.state.input.take();
                self.send(BackendCommand::Submit(text));
            }

            KeyCode::Tab => {
                if self.state.suggestions_ready() {
                    self.state.select_next_action();
                }
            }
            KeyCode::BackTab => {
                if self.state.suggestions_ready() {
                    self.state.select_prev_action();
                }
            }

            KeyCode::F(n) => {
                if let Some(action) = SuggestedAction::all().get(usize::from(n).wrapping_sub(1)) {
                    self.run_action(*action);
                }
            }

            KeyCode::Char(c) => self.state.input.insert(c),
            KeyCode::Backspace => self.state.input.backspace(),
            KeyCode::Delete => self.state.input.delete(),
            KeyCode::Left => self.state.input.left(),
            KeyCode::Right => self.state.input.right(),
            KeyCode::Home => self.state.input.home(),
            KeyCode::End => self.state.input.end(),

            KeyCode::Up => {
                self.state.scroll_back += 1;
            }
            KeyCode::Down => {
                self.state.scroll_back = self.state.scroll_back.saturating_sub(1);
            }
            KeyCode::PageUp => {
                self.state.scroll_back += 10;
            }
            KeyCode::PageDown => {
                self.state.scroll_back = self.state.scroll_back.saturating_sub(10);
            }

            _ => {}
        }
    }

    /// Suggestions only respond while the list is shown.
    fn run_action(&mut self, action: SuggestedAction) {
        if self.state.suggestions == SuggestionsView::Hidden {
            return;
        }
        self.state.selected_action = None;
        self.send(BackendCommand::RunAction(action));
    }

    /// Handle key press while a dialog is open.
    fn handle_dialog_key(&mut self, code: KeyCode) {
        let Some(dialog) = self.state.dialog.as_mut() else {
            return;
        };

        match code {
            // Dropping a language reply sender reports the dialog as dismissed.
            KeyCode::Esc => {
                self.state.dialog = None;
            }
            KeyCode::Enter => {
                let Some(dialog) = self.state.dialog.take() else {
                    return;
                };
                let value = dialog.input.value;
                match dialog.kind {
                    DialogKind::ApiKey => self.send(BackendCommand::SetKey(value)),
                    DialogKind::Document => {
                        let path = value.trim();
                        let path = (!path.is_empty()).then(|| PathBuf::from(path));
                        self.send(BackendCommand::SetDocument(path));
                    }
                    DialogKind::Language(reply) => {
                        let _ = reply.send(value);
                    }
                }
            }
            KeyCode::Char(c) => dialog.input.insert(c),
            KeyCode::Backspace => dialog.input.backspace(),
            KeyCode::Delete => dialog.input.delete(),
            KeyCode::Left => dialog.input.left(),
            KeyCode::Right => dialog.input.right(),
            KeyCode::Home => dialog.input.home(),
            KeyCode::End => dialog.input.end(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use notechat_core::{FloatingPosition, Message};
    use tokio::sync::oneshot;

    use super::*;

    struct Harness {
        app: App,
        cmd_rx: mpsc::Receiver<BackendCommand>,
    }

    fn harness() -> Harness {
        let (_ui_tx, ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        Harness {
            app: App::new(ui_rx, cmd_tx),
            cmd_rx,
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn open_panel(app: &mut App) {
        app.apply_event(UiEvent::PanelVisible(true));
        app.apply_event(UiEvent::Suggestions(SuggestionsView::Ready));
    }

    #[test]
    fn test_enter_submits_input() {
        let mut h = harness();
        open_panel(&mut h.app);
        type_text(&mut h.app, "hello");
        press(&mut h.app, KeyCode::Enter);

        match h.cmd_rx.try_recv() {
            Ok(BackendCommand::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(h.app.state.input.value.is_empty());
    }

    #[test]
    fn test_enter_runs_selected_action() {
        let mut h = harness();
        open_panel(&mut h.app);
        press(&mut h.app, KeyCode::Tab);
        press(&mut h.app, KeyCode::Enter);

        assert!(matches!(
            h.cmd_rx.try_recv(),
            Ok(BackendCommand::RunAction(SuggestedAction::Summarize))
        ));
    }

    #[test]
    fn test_function_key_runs_action() {
        let mut h = harness();
        open_panel(&mut h.app);
        press(&mut h.app, KeyCode::F(4));

        assert!(matches!(
            h.cmd_rx.try_recv(),
            Ok(BackendCommand::RunAction(SuggestedAction::Translate))
        ));
    }

    #[test]
    fn test_actions_ignored_when_hidden() {
        let mut h = harness();
        open_panel(&mut h.app);
        h.app.apply_event(UiEvent::Suggestions(SuggestionsView::Hidden));
        press(&mut h.app, KeyCode::F(1));

        assert!(h.cmd_rx.try_recv().is_err());
    }

    #[test]
    fn test_escape_closes_panel() {
        let mut h = harness();
        open_panel(&mut h.app);
        press(&mut h.app, KeyCode::Esc);

        assert!(matches!(h.cmd_rx.try_recv(), Ok(BackendCommand::ClosePanel)));
    }

    #[test]
    fn test_language_dialog_answers_picker() {
        let mut h = harness();
        open_panel(&mut h.app);
        let (tx, mut rx) = oneshot::channel();
        h.app.apply_event(UiEvent::PickLanguage(tx));

        type_text(&mut h.app, "French");
        press(&mut h.app, KeyCode::Enter);

        assert_eq!(rx.try_recv().unwrap(), "French");
        assert!(h.app.state.dialog.is_none());
    }

    #[test]
    fn test_language_dialog_escape_dismisses() {
        let mut h = harness();
        open_panel(&mut h.app);
        let (tx, mut rx) = oneshot::channel::<String>();
        h.app.apply_event(UiEvent::PickLanguage(tx));

        press(&mut h.app, KeyCode::Esc);

        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }

    #[test]
    fn test_key_dialog_sends_key() {
        let mut h = harness();
        h.app
            .handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL));
        type_text(&mut h.app, "secret");
        press(&mut h.app, KeyCode::Enter);

        match h.cmd_rx.try_recv() {
            Ok(BackendCommand::SetKey(key)) => assert_eq!(key, "secret"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_moved_panel_position_saved_on_close() {
        let mut h = harness();
        h.app.apply_event(UiEvent::Layout {
            docked: false,
            position: FloatingPosition { x: 10, y: 5 },
        });
        open_panel(&mut h.app);
        h.app
            .handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::ALT));
        h.app.apply_event(UiEvent::PanelVisible(false));

        match h.cmd_rx.try_recv() {
            Ok(BackendCommand::SavePosition(p)) => {
                assert_eq!(p, FloatingPosition { x: 12, y: 5 })
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!h.app.state.position_dirty);
    }

    #[test]
    fn test_transcript_events() {
        let mut h = harness();
        h.app.apply_event(UiEvent::Message(Message::user("a")));
        h.app.apply_event(UiEvent::TranscriptCleared);
        h.app.apply_event(UiEvent::Message(Message::bot("b")));

        assert_eq!(h.app.state.messages.len(), 1);
        assert_eq!(h.app.state.messages[0].content, "b");
    }

    #[test]
    fn test_fatal_quits() {
        let mut h = harness();
        h.app.apply_event(UiEvent::Fatal("bad settings".to_string()));
        assert!(h.app.state.should_quit());
        assert_eq!(h.app.fatal(), Some("bad settings"));
    }
}
