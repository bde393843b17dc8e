/*
 *  weather.rs
 *
 *  inkwx - weather at a glance
 *  (c) 2023-26 Ian Bullard
 *
 *  Forecast data source contract, icon vocabulary, and the NWS grid client
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

use std::fmt::{self, Display};

use chrono::{DateTime, Local, Timelike, Utc};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NWS_BASE_URL: &str = "https://api.weather.gov";
const USER_AGENT: &str = concat!("inkwx/", env!("CARGO_PKG_VERSION"));

/// Error type for forecast source operations.
#[derive(Debug)]
pub enum WeatherError {
    HttpRequestError(reqwest::Error),
    DeserializationError(serde_json::Error),
    /// An expected measurement was absent or null in the API payload.
    MissingData(String),
    ApiError(String),
}

impl Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::HttpRequestError(e) => write!(f, "HTTP request error: {}", e),
            WeatherError::DeserializationError(e) => write!(f, "JSON deserialization error: {}", e),
            WeatherError::MissingData(msg) => write!(f, "missing weather data: {}", msg),
            WeatherError::ApiError(msg) => write!(f, "NWS API error: {}", msg),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::HttpRequestError(err)
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::DeserializationError(err)
    }
}

/// Unit system the dashboard displays in. The NWS grid reports metric; the
/// accessors convert on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Imperial,
    Metric,
}

impl MeasurementSystem {
    pub fn temperature_label(self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "°F",
            MeasurementSystem::Metric => "°C",
        }
    }

    pub fn speed_label(self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "mph",
            MeasurementSystem::Metric => "kph",
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn kph_to_mph(kph: f64) -> f64 {
    kph * 0.62137119223733
}

/// Classified weather condition, doubling as the icon asset identifier.
///
/// The string forms must match the asset ids shipped in the bundle exactly,
/// including the two long-standing typos (`thuderstorm_full`,
/// `rain_parital_night`) baked into the asset pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherIcon {
    SnowLight,
    SnowMedium,
    SnowHeavy,
    SnowBlowing,
    SnowRain,
    RainSnow,
    MixedPrecipitation,
    RainHail,
    Hail,
    CloudsFull,
    Windy,
    Fog,
    RainLight,
    RainHeavy,
    RainBlowing,
    ThunderstormFull,
    RainFreezing,
    RainFreezingHeavy,
    ClearNight,
    FogNight,
    CloudLightNight,
    CloudMediumNight,
    CloudHeavyNight,
    RainPartialNight,
    SnowPartialNight,
    ThunderstormPartialNight,
    ClearDayHot,
    ClearDay,
    FogDay,
    CloudLightDay,
    CloudMediumDay,
    CloudHeavyDay,
    RainPartialDay,
    SnowPartialDay,
    ThunderstormPartialDay,
    #[default]
    Unknown,
}

impl WeatherIcon {
    /// Image asset id for this condition.
    pub fn as_str(self) -> &'static str {
        match self {
            WeatherIcon::SnowLight => "snow_light",
            WeatherIcon::SnowMedium => "snow_medium",
            WeatherIcon::SnowHeavy => "snow_heavy",
            WeatherIcon::SnowBlowing => "snow_blowing",
            WeatherIcon::SnowRain => "snow_rain",
            WeatherIcon::RainSnow => "rain_snow",
            WeatherIcon::MixedPrecipitation => "mixed_precipitation",
            WeatherIcon::RainHail => "rain_hail",
            WeatherIcon::Hail => "hail",
            WeatherIcon::CloudsFull => "clouds_full",
            WeatherIcon::Windy => "windy",
            WeatherIcon::Fog => "fog",
            WeatherIcon::RainLight => "rain_light",
            WeatherIcon::RainHeavy => "rain_heavy",
            WeatherIcon::RainBlowing => "rain_blowing",
            WeatherIcon::ThunderstormFull => "thuderstorm_full",
            WeatherIcon::RainFreezing => "rain_freezing",
            WeatherIcon::RainFreezingHeavy => "rain_freezing_heavy",
            WeatherIcon::ClearNight => "clear_night",
            WeatherIcon::FogNight => "fog_night",
            WeatherIcon::CloudLightNight => "cloud_light_night",
            WeatherIcon::CloudMediumNight => "cloud_medium_night",
            WeatherIcon::CloudHeavyNight => "cloud_heavy_night",
            WeatherIcon::RainPartialNight => "rain_parital_night",
            WeatherIcon::SnowPartialNight => "snow_partial_night",
            WeatherIcon::ThunderstormPartialNight => "thunderstorm_partial_night",
            WeatherIcon::ClearDayHot => "clear_day_hot",
            WeatherIcon::ClearDay => "clear_day",
            WeatherIcon::FogDay => "fog_day",
            WeatherIcon::CloudLightDay => "cloud_light_day",
            WeatherIcon::CloudMediumDay => "cloud_medium_day",
            WeatherIcon::CloudHeavyDay => "cloud_heavy_day",
            WeatherIcon::RainPartialDay => "rain_partial_day",
            WeatherIcon::SnowPartialDay => "snow_partial_day",
            WeatherIcon::ThunderstormPartialDay => "thunderstorm_partial_day",
            WeatherIcon::Unknown => "unknown",
        }
    }
}

impl Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A periodic source of current/forecasted conditions.
///
/// `update` refreshes the internal readings; the accessors are cheap reads
/// of whatever the last successful refresh produced. On failure the caller
/// decides whether stale values are acceptable (the dashboard keeps them).
#[allow(async_fn_in_trait)]
pub trait Forecast {
    async fn update(&mut self) -> Result<(), WeatherError>;

    fn temperature(&self) -> i32;
    fn temperature_max(&self) -> i32;
    fn temperature_min(&self) -> i32;
    fn temperature_label(&self) -> &str;
    fn precipitation_chance(&self) -> i32;
    fn wind_speed(&self) -> i32;
    fn speed_label(&self) -> &str;
    fn wind_heading(&self) -> i32;
    fn humidity(&self) -> i32;
    fn dewpoint(&self) -> i32;
    fn weather_icon(&self) -> WeatherIcon;
}

/// Metric readings from the last successful grid fetch.
#[derive(Debug, Clone, Default)]
struct Readings {
    temperature: f64,
    temperature_max: f64,
    temperature_min: f64,
    precipitation_chance: f64,
    wind_speed: f64,
    wind_heading: f64,
    humidity: f64,
    dewpoint: f64,
    icon: WeatherIcon,
}

/// National Weather Service forecast source (api.weather.gov).
///
/// The grid-data endpoint for a lat/lon is resolved once via the points API
/// and cached for the process lifetime.
pub struct NwsForecast {
    client: Client,
    latitude: f64,
    longitude: f64,
    units: MeasurementSystem,
    use_20ft_wind: bool,
    grid_url: Option<String>,
    readings: Readings,
}

impl NwsForecast {
    pub fn new(
        latitude: f64,
        longitude: f64,
        units: MeasurementSystem,
        use_20ft_wind: bool,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(NwsForecast {
            client,
            latitude,
            longitude,
            units,
            use_20ft_wind,
            grid_url: None,
            readings: Readings::default(),
        })
    }

    async fn resolve_grid_url(&mut self) -> Result<String, WeatherError> {
        let url = format!("{}/points/{},{}", NWS_BASE_URL, self.latitude, self.longitude);
        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let grid = body["properties"]["forecastGridData"]
            .as_str()
            .ok_or_else(|| {
                WeatherError::ApiError("points response lacks forecastGridData".to_string())
            })?
            .to_string();
        info!("NWS grid endpoint for ({}, {}): {}", self.latitude, self.longitude, grid);
        self.grid_url = Some(grid.clone());
        Ok(grid)
    }

    fn numeric(props: &Value, measurement: &str) -> Result<f64, WeatherError> {
        current_value(&props[measurement])
            .and_then(|v| v.as_f64())
            .ok_or_else(|| WeatherError::MissingData(measurement.to_string()))
    }
}

impl Forecast for NwsForecast {
    async fn update(&mut self) -> Result<(), WeatherError> {
        let grid_url = match &self.grid_url {
            Some(url) => url.clone(),
            None => self.resolve_grid_url().await?,
        };
        let body: Value = self
            .client
            .get(&grid_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let props = &body["properties"];

        let (speed_key, heading_key) = if self.use_20ft_wind {
            ("twentyFootWindSpeed", "twentyFootWindDirection")
        } else {
            ("windSpeed", "windDirection")
        };

        let mut next = Readings {
            temperature: Self::numeric(props, "temperature")?,
            temperature_max: Self::numeric(props, "maxTemperature")?,
            temperature_min: Self::numeric(props, "minTemperature")?,
            precipitation_chance: Self::numeric(props, "probabilityOfPrecipitation")?,
            wind_speed: Self::numeric(props, speed_key)?,
            wind_heading: Self::numeric(props, heading_key)?,
            humidity: Self::numeric(props, "relativeHumidity")?,
            dewpoint: Self::numeric(props, "dewpoint")?,
            icon: WeatherIcon::Unknown,
        };

        // Condition/intensity ride along as a list inside the current value.
        let conditions = current_value(&props["weather"]).unwrap_or(Value::Null);
        let weather = conditions[0]["weather"].as_str().unwrap_or("").to_string();
        let intensity = conditions[0]["intensity"].as_str().unwrap_or("").to_string();
        let sky_cover = Self::numeric(props, "skyCover").unwrap_or(0.0);
        let heat_index = Self::numeric(props, "heatIndex").unwrap_or(0.0);

        let hour = Local::now().hour();
        let is_day = hour > 6 && hour < 18;
        next.icon = classify_icon(&weather, &intensity, sky_cover, heat_index > 100.0, is_day);

        debug!(
            "NWS update: {}{} sky {}% -> {}",
            next.temperature,
            self.units.temperature_label(),
            sky_cover,
            next.icon
        );
        self.readings = next;
        Ok(())
    }

    fn temperature(&self) -> i32 {
        self.convert_temp(self.readings.temperature)
    }

    fn temperature_max(&self) -> i32 {
        self.convert_temp(self.readings.temperature_max)
    }

    fn temperature_min(&self) -> i32 {
        self.convert_temp(self.readings.temperature_min)
    }

    fn temperature_label(&self) -> &str {
        self.units.temperature_label()
    }

    fn precipitation_chance(&self) -> i32 {
        self.readings.precipitation_chance.round() as i32
    }

    fn wind_speed(&self) -> i32 {
        match self.units {
            MeasurementSystem::Imperial => kph_to_mph(self.readings.wind_speed).round() as i32,
            MeasurementSystem::Metric => self.readings.wind_speed.round() as i32,
        }
    }

    fn speed_label(&self) -> &str {
        self.units.speed_label()
    }

    fn wind_heading(&self) -> i32 {
        self.readings.wind_heading.round() as i32
    }

    fn humidity(&self) -> i32 {
        self.readings.humidity.round() as i32
    }

    fn dewpoint(&self) -> i32 {
        self.convert_temp(self.readings.dewpoint)
    }

    fn weather_icon(&self) -> WeatherIcon {
        self.readings.icon
    }
}

impl NwsForecast {
    fn convert_temp(&self, celsius: f64) -> i32 {
        match self.units {
            MeasurementSystem::Imperial => celsius_to_fahrenheit(celsius).round() as i32,
            MeasurementSystem::Metric => celsius.round() as i32,
        }
    }
}

/// Pick the entry of a grid measurement series that covers "now".
///
/// Series values carry `validTime` interval stamps like
/// `2023-06-01T18:00:00+00:00/PT3H`; the last entry whose start precedes the
/// current instant wins, falling back to the first entry.
fn current_value(series: &Value) -> Option<Value> {
    let values = series["values"].as_array()?;
    let mut result = values.first().map(|v| v["value"].clone())?;
    let now = Utc::now();
    for entry in values {
        let Some(stamp) = entry["validTime"].as_str() else {
            continue;
        };
        let Some(start) = stamp.split('/').next() else {
            continue;
        };
        if let Ok(valid) = DateTime::parse_from_rfc3339(start) {
            if valid.with_timezone(&Utc) < now {
                result = entry["value"].clone();
            }
        }
    }
    Some(result)
}

fn is_light(intensity: &str) -> bool {
    intensity == "very_light" || intensity == "light"
}

/// Map raw NWS condition fields onto the fixed icon vocabulary.
///
/// Precipitation phenomena win over sky cover; sky cover only decides the
/// icon for otherwise quiet conditions.
pub fn classify_icon(
    weather: &str,
    intensity: &str,
    sky_cover: f64,
    is_hot: bool,
    is_day: bool,
) -> WeatherIcon {
    let light = is_light(intensity);
    match weather {
        "hail" => WeatherIcon::Hail,
        "thunderstorms" => {
            if light {
                if is_day {
                    WeatherIcon::ThunderstormPartialDay
                } else {
                    WeatherIcon::ThunderstormPartialNight
                }
            } else {
                WeatherIcon::ThunderstormFull
            }
        }
        "sleet" => WeatherIcon::RainSnow,
        "freezing_drizzle" | "freezing_rain" | "freezing_spray" => {
            if light {
                WeatherIcon::RainFreezing
            } else {
                WeatherIcon::RainFreezingHeavy
            }
        }
        "fog" | "freezing_fog" | "ice_fog" => {
            if light {
                if is_day {
                    WeatherIcon::FogDay
                } else {
                    WeatherIcon::FogNight
                }
            } else {
                WeatherIcon::Fog
            }
        }
        "snow" | "snow_showers" => {
            if light {
                if is_day {
                    WeatherIcon::SnowPartialDay
                } else {
                    WeatherIcon::SnowPartialNight
                }
            } else if intensity == "moderate" {
                WeatherIcon::SnowMedium
            } else {
                WeatherIcon::SnowHeavy
            }
        }
        "drizzle" | "rain" | "rain_showers" => {
            if light {
                if is_day {
                    WeatherIcon::RainPartialDay
                } else {
                    WeatherIcon::RainPartialNight
                }
            } else if intensity == "moderate" {
                WeatherIcon::RainLight
            } else {
                WeatherIcon::RainHeavy
            }
        }
        "blowing_dust" | "blowing_sand" | "blowing_snow" => WeatherIcon::Windy,
        "volcanic_ash" | "water_spouts" | "smoke" => WeatherIcon::Unknown,
        _ => {
            if sky_cover > 80.0 {
                WeatherIcon::CloudsFull
            } else if sky_cover > 60.0 {
                if is_day {
                    WeatherIcon::CloudHeavyDay
                } else {
                    WeatherIcon::CloudHeavyNight
                }
            } else if sky_cover > 40.0 {
                if is_day {
                    WeatherIcon::CloudMediumDay
                } else {
                    WeatherIcon::CloudMediumNight
                }
            } else if sky_cover > 25.0 {
                if is_day {
                    WeatherIcon::CloudLightDay
                } else {
                    WeatherIcon::CloudLightNight
                }
            } else if is_day && is_hot {
                WeatherIcon::ClearDayHot
            } else if is_day {
                WeatherIcon::ClearDay
            } else {
                WeatherIcon::ClearNight
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(kph_to_mph(100.0).round(), 62.0);
    }

    #[test]
    fn test_measurement_labels() {
        assert_eq!(MeasurementSystem::Imperial.temperature_label(), "°F");
        assert_eq!(MeasurementSystem::Metric.temperature_label(), "°C");
        assert_eq!(MeasurementSystem::Imperial.speed_label(), "mph");
        assert_eq!(MeasurementSystem::Metric.speed_label(), "kph");
    }

    #[test]
    fn test_icon_asset_ids_keep_their_historical_spellings() {
        assert_eq!(WeatherIcon::ThunderstormFull.as_str(), "thuderstorm_full");
        assert_eq!(WeatherIcon::RainPartialNight.as_str(), "rain_parital_night");
        assert_eq!(WeatherIcon::ClearDay.as_str(), "clear_day");
        assert_eq!(WeatherIcon::Unknown.as_str(), "unknown");
    }

    #[test]
    fn test_classify_precipitation_beats_sky_cover() {
        assert_eq!(classify_icon("hail", "heavy", 100.0, false, true), WeatherIcon::Hail);
        assert_eq!(
            classify_icon("rain", "heavy", 0.0, false, true),
            WeatherIcon::RainHeavy
        );
        assert_eq!(
            classify_icon("rain", "moderate", 0.0, false, true),
            WeatherIcon::RainLight
        );
        assert_eq!(
            classify_icon("rain_showers", "light", 0.0, false, false),
            WeatherIcon::RainPartialNight
        );
        assert_eq!(
            classify_icon("snow", "very_light", 0.0, false, true),
            WeatherIcon::SnowPartialDay
        );
        assert_eq!(
            classify_icon("thunderstorms", "heavy", 0.0, false, true),
            WeatherIcon::ThunderstormFull
        );
        assert_eq!(
            classify_icon("freezing_rain", "heavy", 0.0, false, true),
            WeatherIcon::RainFreezingHeavy
        );
        assert_eq!(classify_icon("sleet", "light", 0.0, false, true), WeatherIcon::RainSnow);
        assert_eq!(
            classify_icon("blowing_snow", "moderate", 0.0, false, true),
            WeatherIcon::Windy
        );
        assert_eq!(classify_icon("smoke", "", 0.0, false, true), WeatherIcon::Unknown);
    }

    #[test]
    fn test_classify_sky_cover_bands() {
        assert_eq!(classify_icon("", "", 90.0, false, true), WeatherIcon::CloudsFull);
        assert_eq!(classify_icon("", "", 70.0, false, true), WeatherIcon::CloudHeavyDay);
        assert_eq!(classify_icon("", "", 70.0, false, false), WeatherIcon::CloudHeavyNight);
        assert_eq!(classify_icon("", "", 50.0, false, true), WeatherIcon::CloudMediumDay);
        assert_eq!(classify_icon("", "", 30.0, false, false), WeatherIcon::CloudLightNight);
        assert_eq!(classify_icon("", "", 10.0, false, true), WeatherIcon::ClearDay);
        assert_eq!(classify_icon("", "", 10.0, true, true), WeatherIcon::ClearDayHot);
        assert_eq!(classify_icon("", "", 10.0, true, false), WeatherIcon::ClearNight);
    }

    #[test]
    fn test_current_value_picks_latest_started_entry() {
        let series = json!({
            "values": [
                {"validTime": "2000-01-01T00:00:00+00:00/PT1H", "value": 1.0},
                {"validTime": "2000-01-02T00:00:00+00:00/PT1H", "value": 2.0},
                {"validTime": "2999-01-01T00:00:00+00:00/PT1H", "value": 3.0}
            ]
        });
        // The year-2999 entry has not started yet.
        assert_eq!(current_value(&series).unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn test_current_value_falls_back_to_first_entry() {
        let series = json!({
            "values": [
                {"validTime": "2999-01-01T00:00:00+00:00/PT1H", "value": 9.5}
            ]
        });
        assert_eq!(current_value(&series).unwrap().as_f64(), Some(9.5));
    }

    #[test]
    fn test_current_value_of_empty_series_is_none() {
        assert!(current_value(&json!({"values": []})).is_none());
        assert!(current_value(&json!({})).is_none());
    }
}
