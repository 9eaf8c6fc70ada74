use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// Right-aligned echo of the typing buffer while a session is open.
pub struct TypingIndicator<'a> {
    buffer: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingIndicator<'a> {
    pub fn new(buffer: &'a str, theme: &'a Theme) -> Self {
        Self { buffer, theme }
    }
}

impl Widget for TypingIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let line = Line::from(vec![
            Span::styled("typing: ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("{} ", self.buffer),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ])
        .right_aligned();
        line.render(area, buf);
    }
}
