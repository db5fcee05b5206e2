//! Theme and style definitions.

use ratatui::style::{Color, Modifier, Style};

/// Colors used by the panel.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color (focused borders, selection)
    pub accent: Color,
    /// Muted color (timestamps, placeholders, hints)
    pub muted: Color,
    /// User message color
    pub user: Color,
    /// Bot message color
    pub bot: Color,
    /// Error message color
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            user: Color::Cyan,
            bot: Color::Green,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// Style for focused borders.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for unfocused borders.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for muted/secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for the selected row of a list.
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for user messages.
    pub fn user_style(&self) -> Style {
        Style::default().fg(self.user)
    }

    /// Style for bot messages.
    pub fn bot_style(&self) -> Style {
        Style::default().fg(self.bot)
    }

    /// Style for error messages.
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }
}
