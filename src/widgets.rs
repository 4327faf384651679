//! Lines paired with tap targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

/// Collects [`Line`]s for a paragraph and remembers which of them are
/// buttons, so target rows follow the text when lines are added above.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("TOTAL POINTS: 12"));
/// cl.push_clickable(Line::from(" [W] Save"), SAVE_PROGRESS);
/// cl.register_targets(area, &mut cs, 1, 1);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register one full-width row per clickable line. Assumes no wrapping;
    /// lines past the bottom of `area` are skipped.
    ///
    /// `top_offset`/`bottom_offset` are the rows taken by borders.
    pub fn register_targets(&self, area: Rect, cs: &mut ClickState, top_offset: u16, bottom_offset: u16) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            let row = content_y + line_idx;
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}
