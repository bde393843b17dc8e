/*
 *  display/layout.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Fixed six-panel dashboard geometry for the 600x448 panel
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

/// Panel width and height in pixels.
pub const SCREEN_WIDTH: u32 = 600;
pub const SCREEN_HEIGHT: u32 = 448;

/// Each dashboard panel is square.
pub const PANEL_WIDTH: u32 = 196;
pub const PANEL_HEIGHT: u32 = 196;

/// Thickness of the frame and divider lines.
pub const BORDER_WIDTH: u32 = 3;

/// Number of metric panels (3 columns x 2 rows).
pub const PANEL_COUNT: usize = 6;
const PANEL_COLS: usize = 3;

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Derived dashboard geometry.
///
/// Everything here is recomputed from the constants above; nothing is
/// persisted. The composer receives a `Layout` explicitly instead of reading
/// shared class-level state.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Full screen extent.
    pub screen: Rect,

    /// Six panel rectangles, row-major: top row 0..3, bottom row 3..6.
    pub panels: [Rect; PANEL_COUNT],

    /// Date/time strip spanning the width below the two panel rows.
    pub date_time: Rect,
}

impl Layout {
    pub fn new() -> Self {
        let border = BORDER_WIDTH as i32;
        let mut panels = [Rect::new(0, 0, PANEL_WIDTH, PANEL_HEIGHT); PANEL_COUNT];
        for (idx, panel) in panels.iter_mut().enumerate() {
            let col = (idx % PANEL_COLS) as i32;
            let row = (idx / PANEL_COLS) as i32;
            panel.x = border * (col + 1) + PANEL_WIDTH as i32 * col;
            panel.y = border * (row + 1) + PANEL_HEIGHT as i32 * row;
        }

        // Whatever height remains under the two panel rows, inside the frame.
        let strip_h = SCREEN_HEIGHT - (BORDER_WIDTH * 4 + PANEL_HEIGHT * 2);
        let date_time = Rect::new(
            border,
            border * 3 + PANEL_HEIGHT as i32 * 2,
            SCREEN_WIDTH - BORDER_WIDTH * 2,
            strip_h,
        );

        Layout {
            screen: Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT),
            panels,
            date_time,
        }
    }

    /// Bottom edge of the panel grid; vertical dividers stop here.
    pub fn grid_bottom(&self) -> i32 {
        self.date_time.y - BORDER_WIDTH as i32
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_positions() {
        let layout = Layout::new();
        assert_eq!(layout.panels[0], Rect::new(3, 3, 196, 196));
        assert_eq!(layout.panels[1], Rect::new(202, 3, 196, 196));
        assert_eq!(layout.panels[2], Rect::new(401, 3, 196, 196));
        assert_eq!(layout.panels[3], Rect::new(3, 202, 196, 196));
        assert_eq!(layout.panels[5], Rect::new(401, 202, 196, 196));
    }

    #[test]
    fn test_panels_are_pairwise_disjoint() {
        let layout = Layout::new();
        for i in 0..PANEL_COUNT {
            for j in (i + 1)..PANEL_COUNT {
                assert!(
                    !layout.panels[i].intersects(&layout.panels[j]),
                    "panels {} and {} overlap",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_panels_fit_inside_the_frame() {
        let layout = Layout::new();
        let border = BORDER_WIDTH as i32;
        let interior = Rect::new(
            border,
            border,
            SCREEN_WIDTH - BORDER_WIDTH * 2,
            SCREEN_HEIGHT - BORDER_WIDTH * 2,
        );
        for panel in &layout.panels {
            assert!(interior.contains(panel));
        }
        assert!(interior.contains(&layout.date_time));
    }

    #[test]
    fn test_date_time_strip() {
        let layout = Layout::new();
        assert_eq!(layout.date_time, Rect::new(3, 401, 594, 44));
        // The strip starts one border below the bottom panel row.
        assert_eq!(layout.date_time.y, layout.panels[3].bottom() + BORDER_WIDTH as i32);
        assert_eq!(layout.grid_bottom(), 398);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 10, 10);
        let c = Rect::new(10, 0, 10, 10);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c)); // edge-adjacent, not overlapping
    }
}
