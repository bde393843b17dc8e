/*
 *  display/traits.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Backend abstraction the renderer draws through
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

use crate::display::color::Color;

/// Pixel sink behind the renderer.
///
/// Every display target (the Inky panel, the in-memory test surface, the PPM
/// emulator) exposes exactly these three operations. Calls are synchronous
/// and expected to be cheap; buffering and the actual panel refresh happen
/// inside `show`.
///
/// `set_pixel` owns bounds handling. The renderer deliberately performs no
/// clipping, matching the panel wrapper it replaced, so a backend must
/// tolerate coordinates outside its extent.
pub trait DisplayBackend {
    /// One-time hardware/bring-up hook, invoked when the renderer is built.
    fn setup(&mut self);

    /// Write a single pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Present the composed frame.
    fn show(&mut self);
}
