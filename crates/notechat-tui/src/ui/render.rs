//! Main render function for the TUI.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use notechat_app::SuggestionsView;
use notechat_core::FloatingPosition;
use notechat_ui::{truncate, ChatWidget, Footer, InputBox, InputDialog, SuggestionsWidget};

use crate::state::{DialogKind, UiState};

/// Floating panel size.
const PANEL_WIDTH: u16 = 64;
const PANEL_HEIGHT: u16 = 24;

/// Narrowest docked panel.
const MIN_DOCK_WIDTH: u16 = 40;

const HIDDEN_HELP: &str =
    " Enter/^O: open chat | ^K: API key | ^F: document | ^D: dock | q: quit ";
const PANEL_HELP: &str =
    " Enter: send | Tab/F1-F4: actions | Esc: close | ^D: dock | Alt+arrows: move | ^C: quit ";

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &UiState) {
    let [body_area, footer_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

    render_document(frame, body_area, state);

    if state.panel_visible {
        let panel_area = if state.docked {
            docked_rect(body_area)
        } else {
            floating_rect(state.position, body_area)
        };
        render_panel(frame, panel_area, state);
    }

    let help = if state.panel_visible {
        PANEL_HELP
    } else {
        HIDDEN_HELP
    };
    Footer::new(help)
        .status(state.status_message.as_deref())
        .render(frame, footer_area);

    if let Some(dialog) = &state.dialog {
        let (title, prompt, masked) = match dialog.kind {
            DialogKind::ApiKey => ("API Key", "Gemini API key (empty to clear):", true),
            DialogKind::Document => ("Document", "Path of the active document:", false),
            DialogKind::Language(_) => ("Translate", "Target language:", false),
        };
        InputDialog::new(title, prompt, &dialog.input.value)
            .cursor(dialog.input.cursor)
            .masked(masked)
            .render(frame);
    }
}

/// Background pane standing in for the note editor.
fn render_document(frame: &mut Frame, area: Rect, state: &UiState) {
    let width = area.width.saturating_sub(4) as usize;
    let document = match &state.document {
        Some(path) => truncate(&path.display().to_string(), width.saturating_sub(18)),
        None => "(none)".to_string(),
    };
    let (key_text, key_style) = if state.configured {
        ("configured", Style::default().fg(Color::Green))
    } else {
        ("not set (^K to add)", Style::default().fg(Color::Yellow))
    };

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Active document: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(document),
        ]),
        Line::from(vec![
            Span::styled("  API key: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(key_text, key_style),
        ]),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" notechat ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(paragraph, area);
}

/// Chat panel: transcript, optional suggestions, input.
fn render_panel(frame: &mut Frame, area: Rect, state: &UiState) {
    frame.render_widget(Clear, area);

    let suggestions_height = if state.suggestions == SuggestionsView::Hidden {
        0
    } else {
        3
    };

    let [chat_area, suggestions_area, input_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(suggestions_height),
        Constraint::Length(3),
    ])
    .areas(area);

    ChatWidget::new(&state.messages)
        .pending(state.pending)
        .scroll_back(state.scroll_back)
        .title(" AI Chat ")
        .render(frame, chat_area);

    if suggestions_height > 0 {
        SuggestionsWidget::new()
            .loading(state.suggestions == SuggestionsView::Loading)
            .selected(state.selected_action)
            .render(frame, suggestions_area);
    }

    InputBox::new(&state.input.value)
        .cursor(state.input.cursor)
        .focused(state.dialog.is_none())
        .placeholder(&state.placeholder)
        .render(frame, input_area);
}

/// Panel at the stored position, pulled back inside the area if it would overflow.
fn floating_rect(position: FloatingPosition, area: Rect) -> Rect {
    let width = PANEL_WIDTH.min(area.width);
    let height = PANEL_HEIGHT.min(area.height);
    let x = area.x + position.x.min(area.width - width);
    let y = area.y + position.y.min(area.height - height);
    Rect::new(x, y, width, height)
}

/// Panel along the right edge, full height.
fn docked_rect(area: Rect) -> Rect {
    let width = (area.width / 5 * 2).max(MIN_DOCK_WIDTH).min(area.width);
    Rect::new(area.right() - width, area.y, width, area.height)
}
