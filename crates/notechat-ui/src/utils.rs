//! Text utilities for rendering.

use unicode_width::UnicodeWidthChar;

/// Wrap text with an indent prefix on every line.
///
/// Breaks at the last space that fits, or mid-word when there is none.
pub fn wrap_text_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    let effective_width = width.saturating_sub(indent.chars().count());

    if effective_width == 0 {
        return vec![format!("{}{}", indent, text)];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            lines.push(indent.to_string());
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut start = 0;

        while start < chars.len() {
            if chars.len() - start <= effective_width {
                let rest: String = chars[start..].iter().collect();
                lines.push(format!("{}{}", indent, rest));
                break;
            }

            let end = start + effective_width;
            let break_at = chars[start..end]
                .iter()
                .rposition(|c| *c == ' ')
                .filter(|offset| *offset > 0)
                .unwrap_or(effective_width);

            let chunk: String = chars[start..start + break_at].iter().collect();
            lines.push(format!("{}{}", indent, chunk.trim_end()));

            start += break_at;
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
    }

    if lines.is_empty() {
        lines.push(indent.to_string());
    }

    lines
}

/// Truncate a string to fit within a given display width, adding an ellipsis if needed.
pub fn truncate(text: &str, max_width: usize) -> String {
    if max_width < 3 {
        return text.chars().take(max_width).collect();
    }

    let total: usize = text
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
        .sum();
    if total <= max_width {
        return text.to_string();
    }

    let mut width = 0;
    let mut result = String::new();
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push_str("...");
    result
}
