//! Footer line: key hints, or a transient status message.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;

/// Footer widget displaying help text or status.
#[derive(Debug, Clone)]
pub struct Footer<'a> {
    /// Key hints.
    text: &'a str,
    /// Status message shown instead of the hints.
    status: Option<&'a str>,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> Footer<'a> {
    /// Create a new footer with help text.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            status: None,
            theme: Theme::default(),
        }
    }

    /// Show a status message in place of the hints.
    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Render the footer.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let footer = match self.status {
            Some(status) => Paragraph::new(status).style(Style::default().fg(self.theme.accent)),
            None => Paragraph::new(self.text).style(Style::default().fg(self.theme.muted)),
        };
        frame.render_widget(footer, area);
    }
}
