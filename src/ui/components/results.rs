use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use reword::quiz::summary::{Outcome, QuizSummary};

use crate::ui::theme::Theme;

/// End-of-quiz screen: score line and one row per question.
pub struct ResultsScreen<'a> {
    summary: &'a QuizSummary,
    theme: &'a Theme,
}

impl<'a> ResultsScreen<'a> {
    pub fn new(summary: &'a QuizSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for ResultsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(" Quiz complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let score_color = if summary.total > 0 && summary.score as usize == summary.total {
            colors.correct()
        } else {
            colors.fg()
        };
        let headline = vec![
            Line::default(),
            Line::from(vec![
                Span::styled(
                    format!("  Score: {}/{}", summary.score, summary.total),
                    Style::default()
                        .fg(score_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({:.0}%, {} skipped)", summary.percent(), summary.skipped),
                    Style::default().fg(colors.muted()),
                ),
            ]),
        ];
        Paragraph::new(headline).render(rows[0], buf);

        let lines: Vec<Line> = summary
            .questions
            .iter()
            .map(|q| {
                let (mark, color) = match q.outcome {
                    Outcome::Correct => ("✓", colors.correct()),
                    Outcome::Skipped => ("–", colors.warning()),
                    Outcome::Unanswered => ("·", colors.muted()),
                };
                Line::from(vec![
                    Span::styled(format!("  {mark} "), Style::default().fg(color)),
                    Span::styled(
                        format!("{:>2}. ", q.index + 1),
                        Style::default().fg(colors.muted()),
                    ),
                    Span::styled(q.source_text.as_str(), Style::default().fg(colors.fg())),
                ])
            })
            .collect();
        Paragraph::new(lines).render(rows[1], buf);

        Paragraph::new(Line::from(Span::styled(
            "  [r/Enter] Play again  [Ctrl+O] Open lessons  [q] Quit",
            Style::default().fg(colors.accent()),
        )))
        .render(rows[2], buf);
    }
}
