//! Input normalization and tap targets.
//!
//! Render code registers rectangles with an action ID every frame; the DOM
//! mouse handler maps pixels to a cell and asks which action sits there.

use ratzilla::ratatui::layout::Rect;

/// Keyboard and pointer input, reduced to what the scenes care about.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// Tap on a registered target, carrying its action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Targets registered by the last frame, plus the terminal size they were
/// laid out for.
#[derive(Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Full-width one-row target. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action under a cell. Later registrations sit on top.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Resolve a tap given in pixels relative to the grid's top-left corner.
    pub fn resolve_pixel(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_x_to_col(x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Pixel Y (relative to the grid top) to terminal row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let row = (click_y / (grid_height / terminal_rows as f64)) as u16;
    if row >= terminal_rows { None } else { Some(row) }
}

/// Pixel X (relative to the grid left edge) to terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let col = (click_x / (grid_width / terminal_cols as f64)) as u16;
    if col >= terminal_cols { None } else { Some(col) }
}
