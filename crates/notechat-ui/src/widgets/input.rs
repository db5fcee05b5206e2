//! Chat input box.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Single-line input with placeholder and a `|` cursor.
#[derive(Debug, Clone)]
pub struct InputBox<'a> {
    /// Current value.
    value: &'a str,
    /// Cursor position in chars.
    cursor: usize,
    /// Whether the box has keyboard focus.
    focused: bool,
    /// Shown while the value is empty.
    placeholder: &'a str,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> InputBox<'a> {
    /// Create a new input box.
    pub fn new(value: &'a str) -> Self {
        Self {
            value,
            cursor: value.chars().count(),
            focused: true,
            placeholder: "",
            theme: Theme::default(),
        }
    }

    /// Set the cursor position.
    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set whether the box is focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set placeholder text.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// The line as drawn.
    pub fn line(&self) -> Line<'static> {
        if self.value.is_empty() {
            let cursor = if self.focused { "|" } else { "" };
            return Line::from(vec![
                Span::raw(cursor),
                Span::styled(self.placeholder.to_string(), self.theme.muted_style()),
            ]);
        }

        if !self.focused {
            return Line::from(self.value.to_string());
        }

        let char_count = self.value.chars().count();
        let cursor_pos = self.cursor.min(char_count);
        let before: String = self.value.chars().take(cursor_pos).collect();
        let after: String = self.value.chars().skip(cursor_pos).collect();
        Line::from(format!("{}|{}", before, after))
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let paragraph = Paragraph::new(self.line()).style(Style::default()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Message "),
        );

        frame.render_widget(paragraph, area);
    }
}
