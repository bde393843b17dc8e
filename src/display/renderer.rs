/*
 *  display/renderer.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Drawing primitives over the backend pixel sink
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

use crate::assets::Image;
use crate::display::color::Color;
use crate::display::error::RenderError;
use crate::display::layout::Rect;
use crate::display::traits::DisplayBackend;
use crate::font::Font;

/// Ink bounding box of a rendered string: the tight rectangle over the
/// covered pixels, not the advance-width box.
///
/// The sentinel minimums stay put for a string with no covered pixels
/// (empty string, or all-blank glyphs); such a box is degenerate and has no
/// meaningful extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Larger than any coordinate a 600x448 panel can produce.
    pub const SENTINEL: i32 = 65536;

    fn empty() -> Self {
        BoundingBox {
            min_x: Self::SENTINEL,
            min_y: Self::SENTINEL,
            max_x: 0,
            max_y: 0,
        }
    }

    fn update(&mut self, x: i32, y: i32) {
        if x < self.min_x {
            self.min_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// True when the string produced no covered pixels.
    pub fn is_degenerate(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Translates drawing intents into individual pixel writes.
///
/// Primitives write straight through to the backend; there is no clipping
/// here. Callers supply in-bounds geometry and the backend ignores anything
/// outside its extent.
#[derive(Debug)]
pub struct Renderer<B: DisplayBackend> {
    backend: B,
    width: u32,
    height: u32,
}

impl<B: DisplayBackend> Renderer<B> {
    /// Wrap a backend and run its one-time setup.
    pub fn new(mut backend: B, width: u32, height: u32) -> Self {
        backend.setup();
        Renderer { backend, width, height }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Present the composed frame.
    pub fn show(&mut self) {
        self.backend.show();
    }

    /// Set every pixel of the full screen extent. Unlike the other
    /// primitives, Clear is a legitimate argument here.
    pub fn clear(&mut self, color: Color) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                self.backend.set_pixel(x, y, color);
            }
        }
    }

    /// Fill a w x h block anchored at (x, y).
    pub fn rectangle(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        if color.is_clear() {
            return;
        }
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.backend.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// 1-pixel run covering x in [x_start, x_end).
    pub fn line_horizontal(&mut self, x_start: i32, x_end: i32, y: i32, color: Color) {
        if color.is_clear() {
            return;
        }
        for x in x_start..x_end {
            self.backend.set_pixel(x, y, color);
        }
    }

    /// 1-pixel run covering y in [y_start, y_end).
    pub fn line_vertical(&mut self, x: i32, y_start: i32, y_end: i32, color: Color) {
        if color.is_clear() {
            return;
        }
        for y in y_start..y_end {
            self.backend.set_pixel(x, y, color);
        }
    }

    /// Four-sided 1-pixel outline; the interior is untouched.
    pub fn box_outline(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let (w, h) = (w as i32, h as i32);
        self.line_horizontal(x, x + w, y, color);
        self.line_horizontal(x, x + w, y + h, color);
        self.line_vertical(x, y, y + h, color);
        self.line_vertical(x + w, y, y + h, color);
    }

    /// Copy image pixels to the surface at (x, y), skipping the transparent
    /// Clear index.
    pub fn blit(&mut self, x: i32, y: i32, image: &Image) {
        for iy in 0..image.height() as i32 {
            for ix in 0..image.width() as i32 {
                let color = image.pixel(ix as u32, iy as u32);
                if !color.is_clear() {
                    self.backend.set_pixel(x + ix, y + iy, color);
                }
            }
        }
    }

    /// Draw `text` left-to-right with the baseline at `y + font.height()`.
    ///
    /// Each glyph's covered cells plot at
    /// `(cur_x - glyph.left + lx, cur_y - glyph.top + ly)`; the cursor then
    /// moves by the glyph's advance. A missing glyph aborts the whole draw.
    pub fn print(
        &mut self,
        x: i32,
        y: i32,
        font: &Font,
        color: Color,
        text: &str,
    ) -> Result<(), RenderError> {
        if color.is_clear() {
            return Ok(());
        }
        let mut cur_x = x;
        let mut cur_y = y + font.height();
        for code in text.chars() {
            let glyph = font.glyph(code).ok_or_else(|| RenderError::GlyphNotFound {
                font: font.id().to_string(),
                code,
            })?;
            for ly in 0..glyph.height {
                for lx in 0..glyph.width {
                    if glyph.covered(lx, ly) {
                        self.backend.set_pixel(
                            cur_x - glyph.left + lx as i32,
                            cur_y - glyph.top + ly as i32,
                            color,
                        );
                    }
                }
            }
            cur_x += glyph.advance_x;
            cur_y += glyph.advance_y;
        }
        Ok(())
    }

    /// Measure the ink bounding box `print` would produce from origin
    /// (0, 0): the same glyph walk, without writing pixels.
    pub fn bounding_box(&self, font: &Font, text: &str) -> Result<BoundingBox, RenderError> {
        let mut bbox = BoundingBox::empty();
        let mut cur_x = 0;
        let mut cur_y = font.height();
        for code in text.chars() {
            let glyph = font.glyph(code).ok_or_else(|| RenderError::GlyphNotFound {
                font: font.id().to_string(),
                code,
            })?;
            for ly in 0..glyph.height {
                for lx in 0..glyph.width {
                    if glyph.covered(lx, ly) {
                        bbox.update(cur_x - glyph.left + lx as i32, cur_y - glyph.top + ly as i32);
                    }
                }
            }
            cur_x += glyph.advance_x;
            cur_y += glyph.advance_y;
        }
        Ok(bbox)
    }

    /// Center the string's ink bounding box within `rect` and draw it.
    ///
    /// Centering offsets use integer truncation. A string without any
    /// covered pixels draws nothing; the degenerate measurement never leaks
    /// into the centering arithmetic.
    pub fn print_centered(
        &mut self,
        rect: Rect,
        font: &Font,
        color: Color,
        text: &str,
    ) -> Result<(), RenderError> {
        let bbox = self.bounding_box(font, text)?;
        if bbox.is_degenerate() {
            return Ok(());
        }
        let dx = (rect.w as i32 - bbox.width()) / 2;
        let dy = (rect.h as i32 - bbox.height()) / 2;
        self.print(rect.x + dx - bbox.min_x, rect.y + dy - bbox.min_y, font, color, text)
    }
}
