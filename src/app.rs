/*
 *  app.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Dashboard composer: one full frame per update cycle
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

use chrono::Local;
use log::{error, warn};

use crate::assets::{AssetError, AssetStore, Image};
use crate::display::color::Color;
use crate::display::error::RenderError;
use crate::display::layout::{Layout, Rect, PANEL_HEIGHT, PANEL_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::display::renderer::Renderer;
use crate::display::traits::DisplayBackend;
use crate::font::Font;
use crate::weather::{Forecast, WeatherIcon};

const BACKGROUND_COLOR: Color = Color::White;
const TEXT_COLOR: Color = Color::Black;
const BORDER_COLOR: Color = Color::Black;

/// Split a panel's value area into two halves, odd remainder to the first.
fn split_heights(remaining: u32) -> (u32, u32) {
    let second = remaining / 2;
    (remaining - second, second)
}

/// The weather dashboard: six metric panels, a border grid, and a date/time
/// strip, recomposed in full on every update.
///
/// Fonts and the warning icon load once at construction and live for the
/// process lifetime. The weather icon is the only asset re-fetched at
/// runtime, and only when the classified condition changes.
#[derive(Debug)]
pub struct WeatherApp<F, A, B>
where
    F: Forecast,
    A: AssetStore,
    B: DisplayBackend,
{
    renderer: Renderer<B>,
    forecast: F,
    assets: A,
    layout: Layout,
    small_font: Font,
    medium_font: Font,
    large_font: Font,
    title_font: Font,
    warning: Image,
    icon: Option<(WeatherIcon, Image)>,
    show_warning: bool,
    last_update_ok: bool,
}

impl<F, A, B> WeatherApp<F, A, B>
where
    F: Forecast,
    A: AssetStore,
    B: DisplayBackend,
{
    /// Build the dashboard. Fails when a font or the warning icon is absent
    /// from the store; missing assets are fatal at startup.
    pub fn new(backend: B, forecast: F, assets: A, show_warning: bool) -> Result<Self, AssetError> {
        let renderer = Renderer::new(backend, SCREEN_WIDTH, SCREEN_HEIGHT);
        let small_font = assets.load_font("small")?;
        let medium_font = assets.load_font("medium")?;
        let large_font = assets.load_font("large")?;
        let title_font = assets.load_font("titles")?;
        let warning = assets.load_image("warning")?;
        Ok(WeatherApp {
            renderer,
            forecast,
            assets,
            layout: Layout::new(),
            small_font,
            medium_font,
            large_font,
            title_font,
            warning,
            icon: None,
            show_warning,
            last_update_ok: false,
        })
    }

    pub fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Refresh the forecast and compose one full frame.
    ///
    /// A failed forecast update is logged and the frame renders with the
    /// previous readings; it never takes the process down. Render errors
    /// (a glyph missing from a font) do propagate.
    pub async fn update(&mut self) -> Result<(), RenderError> {
        self.last_update_ok = match self.forecast.update().await {
            Ok(()) => true,
            Err(e) => {
                warn!("forecast update failed: {}; rendering stale data", e);
                false
            }
        };
        self.refresh_icon();

        self.renderer.clear(BACKGROUND_COLOR);
        self.draw_borders();
        self.draw_forecast_icon(0);
        self.draw_current_temp(1)?;
        self.draw_min_max_temp(2)?;
        self.draw_precip_chance(3)?;
        self.draw_wind(4)?;
        self.draw_humidity(5)?;
        self.draw_date_time()?;
        self.renderer.show();
        Ok(())
    }

    /// Swap the cached icon image when the classified condition changed.
    /// A load failure keeps the previous icon and retries next cycle.
    fn refresh_icon(&mut self) {
        let name = self.forecast.weather_icon();
        let stale = match &self.icon {
            Some((cached, _)) => *cached != name,
            None => true,
        };
        if !stale {
            return;
        }
        match self.assets.load_image(name.as_str()) {
            Ok(image) => self.icon = Some((name, image)),
            Err(e) => error!("weather icon '{}' unavailable: {}; keeping previous", name, e),
        }
    }

    fn draw_borders(&mut self) {
        let width = SCREEN_WIDTH;
        let height = SCREEN_HEIGHT;
        let thickness = crate::display::layout::BORDER_WIDTH;

        // Screen outline.
        self.renderer.rectangle(0, 0, width, thickness, BORDER_COLOR);
        self.renderer.rectangle(0, (height - thickness) as i32, width, thickness, BORDER_COLOR);
        self.renderer.rectangle(0, 0, thickness, height, BORDER_COLOR);
        self.renderer.rectangle((width - thickness) as i32, 0, thickness, height, BORDER_COLOR);

        // Horizontal dividers between the panel rows and above the strip.
        let first = self.layout.panels[0].bottom();
        self.renderer.rectangle(0, first, width, thickness, BORDER_COLOR);
        self.renderer.rectangle(0, self.layout.grid_bottom(), width, thickness, BORDER_COLOR);

        // Vertical dividers stop above the date/time strip.
        let grid_h = self.layout.grid_bottom() as u32;
        self.renderer.rectangle(self.layout.panels[0].right(), 0, thickness, grid_h, BORDER_COLOR);
        self.renderer.rectangle(self.layout.panels[1].right(), 0, thickness, grid_h, BORDER_COLOR);
    }

    fn draw_forecast_icon(&mut self, panel: usize) {
        let pos = self.layout.panels[panel];
        if let Some((_, image)) = &self.icon {
            self.renderer.blit(pos.x, pos.y, image);
        }
        if self.show_warning && !self.last_update_ok {
            self.renderer.blit(pos.x, pos.y, &self.warning);
        }
    }

    fn draw_single_value_panel(
        &mut self,
        panel: usize,
        title: &str,
        text: &str,
    ) -> Result<(), RenderError> {
        let pos = self.layout.panels[panel];
        let title_h = self.title_font.height() as u32;
        let title_area = Rect::new(pos.x, pos.y, PANEL_WIDTH, title_h);
        self.renderer.print_centered(title_area, &self.title_font, TEXT_COLOR, title)?;
        let value_area =
            Rect::new(pos.x, pos.y + title_h as i32, PANEL_WIDTH, PANEL_HEIGHT - title_h);
        self.renderer.print_centered(value_area, &self.large_font, TEXT_COLOR, text)
    }

    fn draw_double_value_panel(
        &mut self,
        panel: usize,
        title: &str,
        text1: &str,
        text2: &str,
    ) -> Result<(), RenderError> {
        let pos = self.layout.panels[panel];
        let title_h = self.title_font.height() as u32;
        let title_area = Rect::new(pos.x, pos.y, PANEL_WIDTH, title_h);
        self.renderer.print_centered(title_area, &self.title_font, TEXT_COLOR, title)?;

        let (upper_h, lower_h) = split_heights(PANEL_HEIGHT - title_h);
        let upper = Rect::new(pos.x, pos.y + title_h as i32, PANEL_WIDTH, upper_h);
        let lower = Rect::new(pos.x, upper.bottom(), PANEL_WIDTH, lower_h);
        self.renderer.print_centered(upper, &self.medium_font, TEXT_COLOR, text1)?;
        self.renderer.print_centered(lower, &self.medium_font, TEXT_COLOR, text2)
    }

    fn draw_current_temp(&mut self, panel: usize) -> Result<(), RenderError> {
        let text = format!("{}{}", self.forecast.temperature(), self.forecast.temperature_label());
        self.draw_single_value_panel(panel, "Currently", &text)
    }

    fn draw_min_max_temp(&mut self, panel: usize) -> Result<(), RenderError> {
        let label = self.forecast.temperature_label();
        let max_text = format!("Hi {}{}", self.forecast.temperature_max(), label);
        let min_text = format!("Lo {}{}", self.forecast.temperature_min(), label);
        // "Forcasted" matches the shipped title art; do not correct it.
        self.draw_double_value_panel(panel, "Forcasted", &max_text, &min_text)
    }

    fn draw_precip_chance(&mut self, panel: usize) -> Result<(), RenderError> {
        let text = format!("{}%", self.forecast.precipitation_chance());
        self.draw_single_value_panel(panel, "Precip Chance", &text)
    }

    fn draw_wind(&mut self, panel: usize) -> Result<(), RenderError> {
        let speed = format!("{}{}", self.forecast.wind_speed(), self.forecast.speed_label());
        let heading = format!("{}°", self.forecast.wind_heading());
        self.draw_double_value_panel(panel, "Wind", &speed, &heading)
    }

    fn draw_humidity(&mut self, panel: usize) -> Result<(), RenderError> {
        let humidity = format!("{}%", self.forecast.humidity());
        let dew = format!("{}{}", self.forecast.dewpoint(), self.forecast.temperature_label());
        self.draw_double_value_panel(panel, "Humidity/Dew", &humidity, &dew)
    }

    fn draw_date_time(&mut self) -> Result<(), RenderError> {
        let stamp = Local::now().format("%m/%d/%Y, %a %I:%M%p").to_string();
        self.renderer.print_centered(self.layout.date_time, &self.small_font, TEXT_COLOR, &stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_heights_even() {
        assert_eq!(split_heights(100), (50, 50));
    }

    #[test]
    fn test_split_heights_odd_remainder_goes_to_the_first_half() {
        assert_eq!(split_heights(101), (51, 50));
        // Panel minus a 27px title strip: the real dashboard case.
        assert_eq!(split_heights(PANEL_HEIGHT - 27), (85, 84));
    }
}
