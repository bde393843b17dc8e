/*
 *  font.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Bitmap glyph metrics and coverage model
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

use std::collections::HashMap;
use std::fmt;

/// One character's coverage mask plus metrics.
///
/// `left`/`top` are bearings subtracted from the cursor when plotting (they
/// may be negative); `advance_x`/`advance_y` displace the cursor after the
/// glyph is drawn. Coverage is row-major, `width * height` entries.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub code: char,
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub advance_x: i32,
    pub advance_y: i32,
    data: Vec<bool>,
}

impl Glyph {
    /// Build a glyph. `data` must hold exactly `width * height` coverage
    /// cells, row-major.
    ///
    /// # Panics
    ///
    /// Panics when the coverage length does not match the dimensions; a
    /// short mask would otherwise index out of range in `covered`.
    pub fn new(
        code: char,
        width: u32,
        height: u32,
        left: i32,
        top: i32,
        advance_x: i32,
        advance_y: i32,
        data: Vec<bool>,
    ) -> Self {
        assert_eq!(
            data.len(),
            (width * height) as usize,
            "glyph {:?} coverage is {} cells, expected {}x{}",
            code,
            data.len(),
            width,
            height
        );
        Glyph { code, width, height, left, top, advance_x, advance_y, data }
    }

    /// Coverage at glyph-local (x, y).
    pub fn covered(&self, x: u32, y: u32) -> bool {
        self.data[(y * self.width + x) as usize]
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} size({}, {}), offset({}, {}) advance({}, {})",
            self.code, self.width, self.height, self.left, self.top, self.advance_x, self.advance_y
        )
    }
}

/// An immutable bitmap font: glyphs keyed by code point plus the line height
/// used for baseline placement.
#[derive(Debug, Clone)]
pub struct Font {
    id: String,
    height: i32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub fn new(id: impl Into<String>, height: i32, glyphs: Vec<Glyph>) -> Self {
        let glyphs = glyphs.into_iter().map(|g| (g.code, g)).collect();
        Font { id: id.into(), height, glyphs }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Line height; the text cursor starts `height` pixels below the draw
    /// origin so glyphs hang from a common baseline.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Glyph lookup. There is no fallback glyph; the renderer turns a miss
    /// into `RenderError::GlyphNotFound`.
    pub fn glyph(&self, code: char) -> Option<&Glyph> {
        self.glyphs.get(&code)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_glyph(code: char, w: u32, h: u32) -> Glyph {
        Glyph::new(code, w, h, 0, h as i32, w as i32 + 2, 0, vec![true; (w * h) as usize])
    }

    #[test]
    fn test_glyph_coverage_indexing() {
        let mut data = vec![false; 6];
        data[1 * 3 + 2] = true; // (x=2, y=1) in a 3x2 mask
        let glyph = Glyph::new('x', 3, 2, 0, 2, 4, 0, data);
        assert!(glyph.covered(2, 1));
        assert!(!glyph.covered(0, 0));
        assert!(!glyph.covered(2, 0));
    }

    #[test]
    #[should_panic(expected = "coverage is 5 cells")]
    fn test_glyph_rejects_short_coverage() {
        Glyph::new('x', 3, 2, 0, 2, 4, 0, vec![false; 5]);
    }

    #[test]
    fn test_font_lookup() {
        let font = Font::new("large", 40, vec![solid_glyph('A', 8, 10), solid_glyph('B', 8, 10)]);
        assert_eq!(font.height(), 40);
        assert_eq!(font.glyph_count(), 2);
        assert_eq!(font.glyph('A').unwrap().code, 'A');
        assert!(font.glyph('Z').is_none());
    }

    #[test]
    fn test_glyph_display_format() {
        let glyph = solid_glyph('H', 4, 5);
        assert_eq!(format!("{}", glyph), "'H' size(4, 5), offset(0, 5) advance(6, 0)");
    }
}
