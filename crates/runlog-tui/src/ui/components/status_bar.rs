use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::app::Focus;
use crate::ui::Theme;

/// Status bar showing keyboard shortcuts, or a message when one is set
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    message: Option<(&'a str, Style)>,
    right_text: Option<String>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            message: None,
            right_text: None,
        }
    }

    /// Add keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    /// Show a message instead of the hints
    pub fn message(mut self, text: &'a str, style: Style) -> Self {
        self.message = Some((text, style));
        self
    }

    /// Set text to display on the right side
    pub fn right<S: Into<String>>(mut self, text: S) -> Self {
        self.right_text = Some(text.into());
        self
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        buf.set_style(area, Theme::status_bar());

        let line = match self.message {
            Some((text, style)) => Line::from(Span::styled(text, style)),
            None => {
                let mut spans = Vec::new();
                for (i, (key, desc)) in self.hints.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled("  ", Theme::status_bar()));
                    }
                    spans.push(Span::styled(format!("[{}]", key), Theme::status_bar_key()));
                    spans.push(Span::styled(format!(" {}", desc), Theme::status_bar()));
                }
                Line::from(spans)
            }
        };
        let line_width = line.width() as u16;

        // Render hints on the left
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        // Render right text if present
        if let Some(right) = self.right_text {
            let right_width = right.width() as u16;
            let right_span = Span::styled(&right, Theme::status_bar());
            let right_x = area.x + area.width.saturating_sub(right_width + 2);
            if right_x > area.x + line_width + 2 {
                buf.set_span(right_x, area.y, &right_span, right_width);
            }
        }
    }
}

/// Hints for the focused pane
pub fn viewer_hints(focus: Focus) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![("Tab", "Pane")];
    match focus {
        Focus::Diagnostics => hints.push(("Enter", "Jump")),
        Focus::Log => {
            hints.push(("Enter", "Expand"));
            hints.push(("y", "Copy"));
        }
    }
    hints.extend([("n/N", "Next/Prev"), ("?", "Help"), ("q", "Quit")]);
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_hints_and_right_text() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints([("q", "Quit")])
            .right("2/2 open")
            .render(area, &mut buf);

        let text = row_text(&buf, 60);
        assert!(text.starts_with(" [q] Quit"));
        assert!(text.trim_end().ends_with("2/2 open"));
    }

    #[test]
    fn test_message_replaces_hints() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints([("q", "Quit")])
            .message("Copied lines 1-20", Theme::status_bar())
            .render(area, &mut buf);

        let text = row_text(&buf, 40);
        assert!(text.contains("Copied lines 1-20"));
        assert!(!text.contains("[q]"));
    }

    #[test]
    fn test_hints_follow_focus() {
        assert!(viewer_hints(Focus::Log).contains(&("y", "Copy")));
        assert!(!viewer_hints(Focus::Diagnostics).contains(&("y", "Copy")));
    }
}
