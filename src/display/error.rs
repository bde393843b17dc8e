/*
 *  display/error.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Error types for the rendering subsystem
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

use std::error::Error;
use std::fmt;

/// Error type for draw operations.
///
/// A missing glyph aborts the whole string draw rather than substituting a
/// fallback character; the caller sees exactly which code point was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The font has no glyph for this code point.
    GlyphNotFound { font: String, code: char },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::GlyphNotFound { font, code } =>
                write!(f, "font '{}' has no glyph for {:?} (U+{:04X})", font, code, *code as u32),
        }
    }
}

impl Error for RenderError {}
