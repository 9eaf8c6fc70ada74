use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header: Rect,
    pub progress: Rect,
    pub source: Rect,
    pub versions: Rect,
    pub feedback: Rect,
    pub footer: Rect,
}

impl QuizLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        // Progress bar is the first thing to go on short terminals.
        let progress_height = if area.height >= 24 { 3 } else { 0 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(progress_height),
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(1),
                Constraint::Length(footer_lines),
            ])
            .split(area);

        Self {
            header: rows[0],
            progress: rows[1],
            source: rows[2],
            versions: rows[3],
            feedback: rows[4],
            footer: rows[5],
        }
    }
}

/// Greedy word wrap of key hints into lines no wider than `width`.
pub fn wrap_hints(hints: &[&str], width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let needed = if line.is_empty() {
            hint.chars().count() + 1
        } else {
            line.chars().count() + 2 + hint.chars().count()
        };
        if !line.is_empty() && needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if line.is_empty() {
            line.push(' ');
        } else {
            line.push_str("  ");
        }
        line.push_str(hint);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_fit_on_one_line_when_wide() {
        let lines = wrap_hints(&["[Tab] Next", "[Esc] Skip"], 80);
        assert_eq!(lines, vec![" [Tab] Next  [Esc] Skip".to_string()]);
    }

    #[test]
    fn hints_wrap_when_narrow() {
        let lines = wrap_hints(&["[Tab] Next", "[Esc] Skip", "", "[F1] Help"], 14);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 14));
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(60, 20, area), area);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
    }

    #[test]
    fn short_terminal_drops_progress_bar() {
        let layout = QuizLayout::new(Rect::new(0, 0, 80, 20), 1);
        assert_eq!(layout.progress.height, 0);
        assert!(layout.versions.height >= 4);
    }
}
