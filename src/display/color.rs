/*
 *  display/color.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Fixed 8-entry palette understood by the Inky-class panel
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

/// Palette index for the seven-color e-ink panel plus the transparent slot.
///
/// The numeric values are the wire indices the display controller expects;
/// they also index image asset pixel data, so they must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
    Green = 2,
    Blue = 3,
    Red = 4,
    Yellow = 5,
    Orange = 6,

    /// Transparent sentinel. Skipped by every draw primitive except
    /// `Renderer::clear`, and never part of visible output.
    Clear = 7,
}

impl Color {
    /// Wire index sent to the display controller.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Reverse lookup from a palette index, e.g. when decoding image assets.
    pub fn from_index(index: u8) -> Option<Color> {
        match index {
            0 => Some(Color::Black),
            1 => Some(Color::White),
            2 => Some(Color::Green),
            3 => Some(Color::Blue),
            4 => Some(Color::Red),
            5 => Some(Color::Yellow),
            6 => Some(Color::Orange),
            7 => Some(Color::Clear),
            _ => None,
        }
    }

    /// RGB triple used for PPM snapshots of a rendered frame.
    /// Clear maps to light gray so transparent regions stay visible.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::White => (255, 255, 255),
            Color::Green => (0, 255, 0),
            Color::Blue => (0, 0, 255),
            Color::Red => (255, 0, 0),
            Color::Yellow => (255, 255, 0),
            Color::Orange => (255, 128, 0),
            Color::Clear => (224, 224, 224),
        }
    }

    /// True for the transparent sentinel.
    pub fn is_clear(self) -> bool {
        self == Color::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for idx in 0u8..8 {
            let color = Color::from_index(idx).unwrap();
            assert_eq!(color.index(), idx);
        }
        assert_eq!(Color::from_index(8), None);
        assert_eq!(Color::from_index(255), None);
    }

    #[test]
    fn test_clear_is_the_only_transparent_slot() {
        for idx in 0u8..7 {
            assert!(!Color::from_index(idx).unwrap().is_clear());
        }
        assert!(Color::Clear.is_clear());
        assert_eq!(Color::Clear.index(), 7);
    }

    #[test]
    fn test_rgb_palette() {
        assert_eq!(Color::White.rgb(), (255, 255, 255));
        assert_eq!(Color::Orange.rgb(), (255, 128, 0));
        assert_eq!(Color::Clear.rgb(), (224, 224, 224));
    }
}
