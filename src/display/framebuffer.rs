/*
 *  display/framebuffer.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Array-backed display backend for tests and the PPM emulator
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

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::display::color::Color;
use crate::display::traits::DisplayBackend;

/// In-memory indexed-color surface implementing `DisplayBackend`.
///
/// Used directly by unit and integration tests, and wrapped by `PpmBackend`
/// when running without panel hardware. Operation counters are recorded so
/// tests can assert on backend interaction, not just pixel contents.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    width: u32,
    height: u32,
    pixels: Vec<Color>,

    /// Number of times setup() was called.
    pub setup_count: usize,

    /// Number of times show() was called.
    pub show_count: usize,
}

impl MemoryBackend {
    pub fn new(width: u32, height: u32) -> Self {
        MemoryBackend {
            width,
            height,
            pixels: vec![Color::White; (width * height) as usize],
            setup_count: 0,
            show_count: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y), or None when out of range.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.pixels.get((y as u32 * self.width + x as u32) as usize).copied()
    }

    /// Raw row-major frame contents.
    pub fn as_slice(&self) -> &[Color] {
        &self.pixels
    }

    /// Count pixels currently holding `color`.
    pub fn count_of(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Write the frame as a binary PPM (P6) using the palette RGB table.
    pub fn save_to_ppm(&self, path: &Path) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "P6")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;
        for &pixel in &self.pixels {
            let (r, g, b) = pixel.rgb();
            out.write_all(&[r, g, b])?;
        }
        out.flush()
    }
}

impl DisplayBackend for MemoryBackend {
    fn setup(&mut self) {
        self.setup_count += 1;
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
    }

    fn show(&mut self) {
        self.show_count += 1;
    }
}

/// Emulator backend: a `MemoryBackend` that snapshots every presented frame
/// to a PPM file. Stands in for the panel when running off-hardware.
#[derive(Debug)]
pub struct PpmBackend {
    surface: MemoryBackend,
    path: PathBuf,
}

impl PpmBackend {
    pub fn new(width: u32, height: u32, path: PathBuf) -> Self {
        PpmBackend {
            surface: MemoryBackend::new(width, height),
            path,
        }
    }

    pub fn surface(&self) -> &MemoryBackend {
        &self.surface
    }
}

impl DisplayBackend for PpmBackend {
    fn setup(&mut self) {
        self.surface.setup();
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.surface.set_pixel(x, y, color);
    }

    fn show(&mut self) {
        self.surface.show();
        match self.surface.save_to_ppm(&self.path) {
            Ok(()) => debug!("frame written to {}", self.path.display()),
            Err(e) => error!("failed to write frame to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_white() {
        let fb = MemoryBackend::new(16, 8);
        assert_eq!(fb.count_of(Color::White), 16 * 8);
        assert_eq!(fb.pixel(0, 0), Some(Color::White));
    }

    #[test]
    fn test_set_pixel_in_bounds() {
        let mut fb = MemoryBackend::new(16, 8);
        fb.set_pixel(3, 2, Color::Red);
        assert_eq!(fb.pixel(3, 2), Some(Color::Red));
        assert_eq!(fb.count_of(Color::Red), 1);
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_ignored() {
        let mut fb = MemoryBackend::new(16, 8);
        fb.set_pixel(-1, 0, Color::Red);
        fb.set_pixel(0, -1, Color::Red);
        fb.set_pixel(16, 0, Color::Red);
        fb.set_pixel(0, 8, Color::Red);
        assert_eq!(fb.count_of(Color::Red), 0);
    }

    #[test]
    fn test_pixel_out_of_bounds_is_none() {
        let fb = MemoryBackend::new(16, 8);
        assert_eq!(fb.pixel(-1, 0), None);
        assert_eq!(fb.pixel(16, 0), None);
        assert_eq!(fb.pixel(0, 8), None);
    }

    #[test]
    fn test_counters() {
        let mut fb = MemoryBackend::new(4, 4);
        fb.setup();
        fb.show();
        fb.show();
        assert_eq!(fb.setup_count, 1);
        assert_eq!(fb.show_count, 2);
    }
}
