use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub const PROMPT_HEIGHT: u16 = 6;

/// Modal for typing the path of a lesson file.
pub struct PathPrompt<'a> {
    input: &'a LineInput,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> PathPrompt<'a> {
    pub fn new(input: &'a LineInput, error: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            input,
            error,
            theme,
        }
    }
}

impl Widget for PathPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Open lesson file ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let (before, at, after) = self.input.render_parts();
        let cursor_style = Style::default()
            .fg(colors.bg())
            .bg(colors.fg())
            .add_modifier(Modifier::BOLD);
        let field = Line::from(vec![
            Span::raw(" "),
            Span::styled(before, Style::default().fg(colors.fg())),
            Span::styled(at.map_or_else(|| " ".to_string(), String::from), cursor_style),
            Span::styled(after, Style::default().fg(colors.fg())),
        ]);

        let status = match self.error {
            Some(err) => Span::styled(format!(" {err}"), Style::default().fg(colors.incorrect())),
            None if self.input.completion_error => Span::styled(
                " cannot read that directory",
                Style::default().fg(colors.warning()),
            ),
            None => Span::styled(
                " [Tab] Complete  [Enter] Load  [Esc] Cancel",
                Style::default().fg(colors.muted()),
            ),
        };

        Paragraph::new(vec![Line::default(), field, Line::default(), Line::from(status)])
            .block(block)
            .render(area, buf);
    }
}
