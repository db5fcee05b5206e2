//! Transcript widget.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use notechat_core::{ChatRole, Message};

use crate::theme::Theme;
use crate::utils::wrap_text_indented;

const INDENT: &str = "  ";

/// Renders the conversation, newest entry at the bottom.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    /// Messages to display.
    messages: &'a [Message],
    /// Whether the typing indicator is shown.
    pending: bool,
    /// Lines scrolled up from the bottom (0 = follow newest).
    scroll_back: usize,
    /// Title override.
    title: Option<String>,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    /// Create a new chat widget.
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            pending: false,
            scroll_back: 0,
            title: None,
            theme: Theme::default(),
        }
    }

    /// Show the typing indicator below the last message.
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Scroll up from the newest line.
    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }

    /// Set a custom title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Build every line of the transcript for a given text width.
    pub fn lines(&self, text_width: usize) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        for msg in self.messages {
            let (prefix, style) = match msg.role {
                ChatRole::User => ("You: ", self.theme.user_style()),
                ChatRole::Bot => ("AI: ", self.theme.bot_style()),
                ChatRole::Error => ("Error: ", self.theme.error_style()),
            };

            lines.push(Line::from(vec![
                Span::styled(prefix, style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    msg.timestamp.format("%H:%M:%S").to_string(),
                    self.theme.muted_style(),
                ),
            ]));

            if msg.role.is_formatted() {
                lines.extend(formatted_lines(&msg.content, text_width));
            } else {
                let body_style = match msg.role {
                    ChatRole::Error => self.theme.error_style(),
                    _ => Style::default(),
                };
                for wrapped in wrap_text_indented(&msg.content, text_width, INDENT) {
                    lines.push(Line::from(Span::styled(wrapped, body_style)));
                }
            }

            lines.push(Line::from(""));
        }

        if self.pending {
            lines.push(Line::from(vec![
                Span::styled(
                    "AI: ",
                    self.theme.bot_style().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "typing...",
                    self.theme.muted_style().add_modifier(Modifier::ITALIC),
                ),
            ]));
        }

        lines
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        let all_lines = self.lines(text_width);
        let total_lines = all_lines.len();

        let max_offset = total_lines.saturating_sub(visible_height);
        let offset = max_offset.saturating_sub(self.scroll_back);

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(offset)
            .take(visible_height)
            .collect();

        let title = self.title.unwrap_or_else(|| " Chat ".to_string());
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.unfocused_border())
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}

/// Light markdown styling for bot answers: headings, bullets, bold spans
/// and fenced code.
fn formatted_lines(text: &str, text_width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }

        if in_code {
            lines.push(Line::from(Span::styled(
                format!("{INDENT}{INDENT}{raw}"),
                Style::default().add_modifier(Modifier::DIM),
            )));
            continue;
        }

        if let Some(heading) = heading_text(trimmed) {
            for wrapped in wrap_text_indented(heading, text_width, INDENT) {
                lines.push(Line::from(Span::styled(
                    wrapped,
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )));
            }
            continue;
        }

        let (indent, body) = match trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            Some(item) => ("  • ", item),
            None => (INDENT, raw),
        };

        let continuation = " ".repeat(indent.chars().count());
        for (i, wrapped) in wrap_text_indented(body, text_width, &continuation)
            .into_iter()
            .enumerate()
        {
            let content = wrapped[continuation.len()..].to_string();
            let lead = if i == 0 { indent } else { continuation.as_str() };
            let mut spans = vec![Span::raw(lead.to_string())];
            spans.extend(bold_spans(&content));
            lines.push(Line::from(spans));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(INDENT));
    }

    lines
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    line[hashes..].strip_prefix(' ')
}

/// Split on `**` markers, alternating plain and bold spans.
fn bold_spans(text: &str) -> Vec<Span<'static>> {
    text.split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            if i % 2 == 1 {
                Span::styled(part.to_string(), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(part.to_string())
            }
        })
        .collect()
}
