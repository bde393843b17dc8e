/*
 *  lib.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
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

pub mod app;
pub mod assets;
pub mod config;
pub mod display;
pub mod font;
pub mod weather;

pub use app::WeatherApp;
pub use assets::{AssetError, AssetStore, BundleStore, Image, MemoryStore};
pub use display::{Color, DisplayBackend, Layout, MemoryBackend, PpmBackend, Rect, RenderError, Renderer};
pub use font::{Font, Glyph};
pub use weather::{Forecast, MeasurementSystem, NwsForecast, WeatherError, WeatherIcon};
