/*
 *  assets.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Indexed-color image model and the asset store behind icons and fonts
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

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::display::color::Color;
use crate::font::{Font, Glyph};

/// Error type for asset loading/validation.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: '{0}'")]
    NotFound(String),
    #[error("corrupt asset '{id}': {reason}")]
    Corrupt { id: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bundle parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable rectangular indexed-color pixel buffer.
///
/// Pixels are validated palette indices at construction, so queries never
/// fail. Index 7 (Clear) marks transparent pixels that blitting skips.
#[derive(Debug, Clone)]
pub struct Image {
    id: String,
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl Image {
    pub fn new(id: impl Into<String>, width: u32, height: u32, data: Vec<u8>) -> Result<Self, AssetError> {
        let id = id.into();
        if data.len() != (width * height) as usize {
            return Err(AssetError::Corrupt {
                id,
                reason: format!(
                    "pixel data is {} bytes, expected {}x{} = {}",
                    data.len(),
                    width,
                    height,
                    width * height
                ),
            });
        }
        let mut pixels = Vec::with_capacity(data.len());
        for (i, &index) in data.iter().enumerate() {
            match Color::from_index(index) {
                Some(color) => pixels.push(color),
                None => {
                    return Err(AssetError::Corrupt {
                        id,
                        reason: format!("palette index {} at pixel {} is out of range", index, i),
                    });
                }
            }
        }
        Ok(Image { id, width, height, data: pixels })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at image-local (x, y). Callers iterate 0..width / 0..height.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.data[(y * self.width + x) as usize]
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.width, self.height)
    }
}

/// Where icons and fonts come from. The dashboard only ever asks for assets
/// by identifier; the warning and unknown-condition icons are expected to
/// exist in any usable store.
pub trait AssetStore {
    fn load_image(&self, id: &str) -> Result<Image, AssetError>;
    fn load_font(&self, id: &str) -> Result<Font, AssetError>;
}

// Serde shapes for the on-disk bundle. Glyph coverage travels as 0/1 bytes;
// it is converted (and length-checked) when the Font is built.

#[derive(Debug, Deserialize)]
struct ImageRecord {
    id: String,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct GlyphRecord {
    code: char,
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    advance_x: i32,
    advance_y: i32,
    data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct FontRecord {
    id: String,
    height: i32,
    glyphs: Vec<GlyphRecord>,
}

#[derive(Debug, Deserialize)]
struct Bundle {
    images: Vec<ImageRecord>,
    fonts: Vec<FontRecord>,
}

/// Asset store backed by a single JSON bundle, parsed once at startup.
///
/// The original deployment kept these rows in a sqlite file; a serde bundle
/// holds the same tables without another storage engine in the stack.
pub struct BundleStore {
    images: HashMap<String, Image>,
    fonts: HashMap<String, Font>,
}

impl BundleStore {
    pub fn open(path: &Path) -> Result<Self, AssetError> {
        let raw = fs::read_to_string(path)?;
        let bundle: Bundle = serde_json::from_str(&raw)?;

        let mut images = HashMap::new();
        for record in bundle.images {
            let image = Image::new(record.id.clone(), record.width, record.height, record.data)?;
            images.insert(record.id, image);
        }

        let mut fonts = HashMap::new();
        for record in bundle.fonts {
            let font = build_font(record)?;
            fonts.insert(font.id().to_string(), font);
        }

        info!(
            "asset bundle '{}': {} images, {} fonts",
            path.display(),
            images.len(),
            fonts.len()
        );
        Ok(BundleStore { images, fonts })
    }
}

fn build_font(record: FontRecord) -> Result<Font, AssetError> {
    let mut glyphs = Vec::with_capacity(record.glyphs.len());
    for g in record.glyphs {
        if g.data.len() != (g.width * g.height) as usize {
            return Err(AssetError::Corrupt {
                id: record.id.clone(),
                reason: format!(
                    "glyph {:?} coverage is {} cells, expected {}x{}",
                    g.code,
                    g.data.len(),
                    g.width,
                    g.height
                ),
            });
        }
        let coverage = g.data.iter().map(|&b| b != 0).collect();
        glyphs.push(Glyph::new(
            g.code, g.width, g.height, g.left, g.top, g.advance_x, g.advance_y, coverage,
        ));
    }
    Ok(Font::new(record.id, record.height, glyphs))
}

impl AssetStore for BundleStore {
    fn load_image(&self, id: &str) -> Result<Image, AssetError> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(id.to_string()))
    }

    fn load_font(&self, id: &str) -> Result<Font, AssetError> {
        self.fonts
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(id.to_string()))
    }
}

/// In-memory store for tests. Records every image load so tests can assert
/// how often the composer re-fetched the forecast icon.
#[derive(Debug, Default)]
pub struct MemoryStore {
    images: HashMap<String, Image>,
    fonts: HashMap<String, Font>,
    image_loads: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, image: Image) {
        self.images.insert(image.id().to_string(), image);
    }

    pub fn insert_font(&mut self, font: Font) {
        self.fonts.insert(font.id().to_string(), font);
    }

    /// Ids passed to `load_image`, in call order.
    pub fn image_loads(&self) -> Vec<String> {
        self.image_loads.borrow().clone()
    }
}

impl AssetStore for MemoryStore {
    fn load_image(&self, id: &str) -> Result<Image, AssetError> {
        self.image_loads.borrow_mut().push(id.to_string());
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(id.to_string()))
    }

    fn load_font(&self, id: &str) -> Result<Font, AssetError> {
        self.fonts
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_rejects_short_data() {
        let err = Image::new("bad", 4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, AssetError::Corrupt { .. }));
    }

    #[test]
    fn test_image_rejects_out_of_range_index() {
        let err = Image::new("bad", 2, 2, vec![0, 1, 8, 1]).unwrap_err();
        assert!(matches!(err, AssetError::Corrupt { .. }));
    }

    #[test]
    fn test_image_pixel_lookup() {
        let image = Image::new("ok", 2, 2, vec![0, 1, 4, 7]).unwrap();
        assert_eq!(image.pixel(0, 0), Color::Black);
        assert_eq!(image.pixel(1, 0), Color::White);
        assert_eq!(image.pixel(0, 1), Color::Red);
        assert_eq!(image.pixel(1, 1), Color::Clear);
        assert_eq!(format!("{}", image), "ok (2, 2)");
    }

    #[test]
    fn test_memory_store_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.load_image("nope"), Err(AssetError::NotFound(_))));
        assert!(matches!(store.load_font("nope"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_memory_store_records_image_loads() {
        let mut store = MemoryStore::new();
        store.insert_image(Image::new("clear_day", 1, 1, vec![0]).unwrap());
        store.load_image("clear_day").unwrap();
        store.load_image("clear_day").unwrap();
        assert_eq!(store.image_loads(), vec!["clear_day", "clear_day"]);
    }

    #[test]
    fn test_bundle_parsing() {
        let json = r#"{
            "images": [
                {"id": "warning", "width": 2, "height": 1, "data": [4, 7]}
            ],
            "fonts": [
                {"id": "small", "height": 16, "glyphs": [
                    {"code": "A", "width": 2, "height": 2, "left": 0, "top": 2,
                     "advance_x": 3, "advance_y": 0, "data": [1, 0, 0, 1]}
                ]}
            ]
        }"#;
        let dir = std::env::temp_dir().join("inkwx_bundle_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("assets.json");
        std::fs::write(&path, json).unwrap();

        let store = BundleStore::open(&path).unwrap();
        let image = store.load_image("warning").unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
        let font = store.load_font("small").unwrap();
        assert_eq!(font.height(), 16);
        let glyph = font.glyph('A').unwrap();
        assert!(glyph.covered(0, 0));
        assert!(!glyph.covered(1, 0));
        assert!(matches!(store.load_image("missing"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_bundle_rejects_bad_glyph_coverage() {
        let record = FontRecord {
            id: "small".to_string(),
            height: 16,
            glyphs: vec![GlyphRecord {
                code: 'A',
                width: 2,
                height: 2,
                left: 0,
                top: 2,
                advance_x: 3,
                advance_y: 0,
                data: vec![1, 0, 0],
            }],
        };
        assert!(matches!(build_font(record), Err(AssetError::Corrupt { .. })));
    }
}
