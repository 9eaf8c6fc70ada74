use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Widget};

use reword::quiz::view::VersionView;
use reword::quiz::{VersionId, VersionStatus};

use crate::ui::theme::Theme;

/// What a mouse click at a given cell refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Panel(VersionId),
    Entry(VersionId, usize),
    Slot(VersionId, usize),
}

impl HitTarget {
    pub fn version(&self) -> VersionId {
        match *self {
            HitTarget::Panel(id) | HitTarget::Entry(id, _) | HitTarget::Slot(id, _) => id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chip {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Screen placement of one version block and its clickable words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelGeometry {
    pub version: usize,
    pub area: Rect,
    pub chips: Vec<Chip>,
}

fn chip_width(word: &str) -> u16 {
    Span::raw(word).width() as u16 + 2
}

/// Left-to-right placement with wrapping. Returns one rect per width and
/// the number of rows used.
fn flow(widths: &[u16], origin_x: u16, origin_y: u16, width: u16) -> (Vec<Rect>, u16) {
    if width == 0 || widths.is_empty() {
        return (Vec::new(), 0);
    }
    let right = origin_x + width;
    let mut rects = Vec::with_capacity(widths.len());
    let (mut x, mut row) = (origin_x, 0u16);
    for &w in widths {
        let w = w.min(width);
        if x > origin_x && x + w > right {
            x = origin_x;
            row += 1;
        }
        rects.push(Rect::new(x, origin_y + row, w, 1));
        x = x.saturating_add(w + 1);
    }
    (rects, row + 1)
}

fn entry_widths(view: &VersionView) -> Vec<u16> {
    view.entries.iter().map(|e| chip_width(&e.word)).collect()
}

fn slot_widths(view: &VersionView) -> Vec<u16> {
    view.slots.iter().map(|s| chip_width(&s.word)).collect()
}

pub fn panel_height(view: &VersionView, width: u16) -> u16 {
    let inner = width.saturating_sub(2);
    let (_, answer_rows) = flow(&entry_widths(view), 0, 0, inner);
    let (_, slot_rows) = flow(&slot_widths(view), 0, 0, inner);
    let revealed = u16::from(view.revealed.is_some());
    2 + answer_rows.max(1) + slot_rows.max(1) + revealed
}

pub fn layout_panel(view: &VersionView, area: Rect) -> PanelGeometry {
    let inner = Block::bordered().inner(area);
    let bottom = inner.y + inner.height;
    let visible = |r: &Rect| r.y < bottom;

    let (entry_rects, answer_rows) = flow(&entry_widths(view), inner.x, inner.y, inner.width);
    let slots_y = inner.y + answer_rows.max(1);
    let (slot_rects, _) = flow(&slot_widths(view), inner.x, slots_y, inner.width);

    let mut chips = Vec::new();
    for (pos, rect) in entry_rects.into_iter().enumerate().filter(|(_, r)| visible(r)) {
        chips.push(Chip {
            rect,
            target: HitTarget::Entry(view.id, pos),
        });
    }
    for (slot, rect) in slot_rects.into_iter().enumerate().filter(|(_, r)| visible(r)) {
        chips.push(Chip {
            rect,
            target: HitTarget::Slot(view.id, slot),
        });
    }

    PanelGeometry {
        version: view.id.version,
        area,
        chips,
    }
}

/// Stacks version panels top to bottom, scrolling just far enough that the
/// active one is fully visible.
pub fn layout_versions(
    area: Rect,
    versions: &[VersionView],
    active: Option<usize>,
) -> Vec<PanelGeometry> {
    let heights: Vec<u16> = versions
        .iter()
        .map(|v| panel_height(v, area.width))
        .collect();

    let mut first = 0;
    if let Some(active) = active.filter(|&a| a < versions.len()) {
        while first < active && heights[first..=active].iter().sum::<u16>() > area.height {
            first += 1;
        }
    }

    let bottom = area.y + area.height;
    let mut y = area.y;
    let mut panels = Vec::new();
    for (view, &h) in versions.iter().zip(&heights).skip(first) {
        if y >= bottom {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, h.min(bottom - y));
        panels.push(layout_panel(view, rect));
        y += h;
    }
    panels
}

pub fn hit_test(
    panels: &[PanelGeometry],
    versions: &[VersionView],
    x: u16,
    y: u16,
) -> Option<HitTarget> {
    let contains = |r: &Rect| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height;
    let panel = panels.iter().find(|p| contains(&p.area))?;
    match panel.chips.iter().find(|c| contains(&c.rect)) {
        Some(chip) => Some(chip.target),
        None => versions.get(panel.version).map(|v| HitTarget::Panel(v.id)),
    }
}

pub struct VersionPanel<'a> {
    view: &'a VersionView,
    geometry: &'a PanelGeometry,
    active: bool,
    theme: &'a Theme,
}

impl<'a> VersionPanel<'a> {
    pub fn new(
        view: &'a VersionView,
        geometry: &'a PanelGeometry,
        active: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            view,
            geometry,
            active,
            theme,
        }
    }
}

impl Widget for VersionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let border = match view.status {
            VersionStatus::Correct => colors.correct(),
            VersionStatus::Incorrect => colors.incorrect(),
            _ if self.active => colors.border_active(),
            _ => colors.border(),
        };
        let marker = if self.active { "▶ " } else { "" };
        let status = match view.status {
            VersionStatus::Correct => " ✓",
            VersionStatus::Incorrect => " ✗",
            _ => "",
        };
        let block = Block::bordered()
            .title(format!(" {marker}{}{status} ", view.label))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if view.entries.is_empty() {
            let hint = if view.editable {
                "type or click words to build the sentence"
            } else {
                "(no answer)"
            };
            buf.set_stringn(
                inner.x,
                inner.y,
                hint,
                inner.width as usize,
                Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC),
            );
        }

        for chip in &self.geometry.chips {
            let (text, style) = match chip.target {
                HitTarget::Entry(_, pos) => (
                    &view.entries[pos].word,
                    Style::default()
                        .fg(colors.answer_fg())
                        .add_modifier(Modifier::BOLD),
                ),
                HitTarget::Slot(_, slot) => {
                    let slot = &view.slots[slot];
                    let style = if slot.available {
                        Style::default().fg(colors.chip_fg()).bg(colors.chip_bg())
                    } else {
                        Style::default().fg(colors.muted()).bg(colors.chip_used())
                    };
                    (&slot.word, style)
                }
                HitTarget::Panel(_) => continue,
            };
            buf.set_stringn(
                chip.rect.x,
                chip.rect.y,
                format!(" {text} "),
                chip.rect.width as usize,
                style,
            );
        }

        // A clipped panel has no row of its own for the sentence.
        let fits = area.height >= panel_height(view, area.width);
        if let Some(sentence) = view.revealed.as_ref().filter(|_| fits) {
            let y = inner.y + inner.height - 1;
            buf.set_stringn(
                inner.x,
                y,
                format!("✓ {sentence}"),
                inner.width as usize,
                Style::default().fg(colors.correct()),
            );
        }
    }
}
