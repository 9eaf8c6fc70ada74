use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("letters", "type a word; it is picked once the match is clear"),
    ("Backspace", "remove the last word of the active version"),
    ("Delete, Ctrl+X", "clear the active version"),
    ("Tab / Down", "next version"),
    ("Up / Shift+Tab", "previous version"),
    ("Enter", "next question (once answered or skipped)"),
    ("Esc", "skip the question and reveal the answers"),
    ("Left / Right", "revisit earlier questions"),
    ("Shift, Ctrl+S", "read the active version aloud"),
    ("Right click", "read the clicked version aloud"),
    ("F5 / F6", "slower / faster speech"),
    ("Ctrl+O", "open a lesson file"),
    ("F1", "toggle this help"),
    ("Ctrl+Q", "quit"),
];

pub struct HelpModal<'a> {
    theme: &'a Theme,
}

impl<'a> HelpModal<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn height() -> u16 {
        KEY_BINDINGS.len() as u16 + 4
    }
}

impl Widget for HelpModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Keys ")
            .title_bottom(Line::from(" F1 or Esc to close ").right_aligned())
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let key_width = KEY_BINDINGS.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut lines = vec![Line::default()];
        lines.extend(KEY_BINDINGS.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:>key_width$}  "),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*action, Style::default().fg(colors.fg())),
            ])
        }));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
