//! Modal dialogs.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Create a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// A single-line text prompt (API key, target language).
#[derive(Debug, Clone)]
pub struct InputDialog<'a> {
    /// Dialog title.
    title: &'a str,
    /// Prompt message.
    prompt: &'a str,
    /// Current input value.
    value: &'a str,
    /// Cursor position in chars.
    cursor: usize,
    /// Replace each char with `*` when drawn.
    masked: bool,
    /// Width of the dialog.
    width: u16,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> InputDialog<'a> {
    /// Create a new input dialog.
    pub fn new(title: &'a str, prompt: &'a str, value: &'a str) -> Self {
        Self {
            title,
            prompt,
            value,
            cursor: value.chars().count(),
            masked: false,
            width: 60,
            theme: Theme::default(),
        }
    }

    /// Set the cursor position.
    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    /// Hide the typed value.
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Set the dialog width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// The input line as drawn, with a `|` cursor.
    pub fn display_value(&self) -> String {
        let shown: Vec<char> = if self.masked {
            self.value.chars().map(|_| '*').collect()
        } else {
            self.value.chars().collect()
        };
        let cursor_pos = self.cursor.min(shown.len());
        let before: String = shown[..cursor_pos].iter().collect();
        let after: String = shown[cursor_pos..].iter().collect();
        format!("  {}|{}", before, after)
    }

    /// Render the dialog.
    pub fn render(self, frame: &mut Frame) {
        let area = centered_rect(self.width, 7, frame.area());

        frame.render_widget(Clear, area);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.prompt),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.display_value(),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                "  [Enter] Submit  [Esc] Cancel",
                self.theme.muted_style(),
            )),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.focused_border())
                .title(format!(" {} ", self.title)),
        );

        frame.render_widget(paragraph, area);
    }
}
