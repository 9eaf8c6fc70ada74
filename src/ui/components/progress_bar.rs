use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Finished questions as a bar: correct ones first, then skipped ones.
pub struct ProgressBar<'a> {
    correct: usize,
    skipped: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(correct: usize, skipped: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            correct,
            skipped,
            total,
            theme,
        }
    }

    fn cells(&self, width: u16) -> (u16, u16) {
        if self.total == 0 {
            return (0, 0);
        }
        let scale = |n: usize| ((n.min(self.total) * width as usize) / self.total) as u16;
        let correct = scale(self.correct);
        let done = scale(self.correct + self.skipped).max(correct);
        (correct, done)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (correct, done) = self.cells(inner.width);
        for offset in 0..inner.width {
            let bg = if offset < correct {
                colors.bar_filled()
            } else if offset < done {
                colors.warning()
            } else {
                colors.bar_empty()
            };
            buf[(inner.x + offset, inner.y)].set_style(Style::default().bg(bg));
        }

        let label = format!(
            "{}/{} done, {} correct",
            self.correct + self.skipped,
            self.total,
            self.correct
        );
        let label_x = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        buf.set_stringn(
            label_x,
            inner.y,
            &label,
            inner.width as usize,
            Style::default().fg(colors.fg()),
        );
    }
}
