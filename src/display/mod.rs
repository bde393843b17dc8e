/*
 *  display/mod.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Rendering subsystem: palette, backend abstraction, primitives, geometry
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

pub mod color;
pub mod error;
pub mod framebuffer;
pub mod layout;
pub mod renderer;
pub mod traits;

pub use color::Color;
pub use error::RenderError;
pub use framebuffer::{MemoryBackend, PpmBackend};
pub use layout::{Layout, Rect};
pub use renderer::{BoundingBox, Renderer};
pub use traits::DisplayBackend;
