//! Suggested-action chips shown above the input.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use notechat_core::SuggestedAction;

use crate::theme::Theme;

/// Row of suggested actions; a loading line until page context is ready.
#[derive(Debug, Clone)]
pub struct SuggestionsWidget {
    /// Whether page context is still loading.
    loading: bool,
    /// Index into `SuggestedAction::all()`.
    selected: Option<usize>,
    /// Theme for styling.
    theme: Theme,
}

impl SuggestionsWidget {
    /// Create a new widget in the ready state.
    pub fn new() -> Self {
        Self {
            loading: false,
            selected: None,
            theme: Theme::default(),
        }
    }

    /// Show the loading line instead of the actions.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Highlight an action.
    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// The line as drawn.
    pub fn line(&self) -> Line<'static> {
        if self.loading {
            return Line::from(Span::styled(
                "Loading page context...",
                self.theme.muted_style().add_modifier(Modifier::ITALIC),
            ));
        }

        let mut spans = Vec::new();
        for (i, action) in SuggestedAction::all().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let label = format!("[{}] {}", i + 1, action.label());
            if self.selected == Some(i) {
                spans.push(Span::styled(label, self.theme.selected_style()));
            } else {
                spans.push(Span::raw(label));
            }
        }
        Line::from(spans)
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.line()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.unfocused_border())
                .title(" Suggestions "),
        );
        frame.render_widget(paragraph, area);
    }
}

impl Default for SuggestionsWidget {
    fn default() -> Self {
        Self::new()
    }
}
