use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::weather::MeasurementSystem;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. All fields are Options so YAML and CLI
/// layers can be merged; getters apply the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,
    /// Human-readable station/location label.
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub measurement_system: Option<MeasurementSystem>,
    /// Minute marks (0-59) at which a refresh runs.
    pub update_on_the_minutes: Option<Vec<u32>>,
    /// Path to the JSON asset bundle (fonts + icons).
    pub assets: Option<PathBuf>,
    /// Prefer the fire-weather 20ft wind product over surface wind.
    pub use_20ft_wind: Option<bool>,
    /// Overlay the warning icon when the last forecast refresh failed.
    pub show_warning: Option<bool>,
    /// Where the emulator backend writes frame snapshots.
    pub frame_path: Option<PathBuf>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn location_name(&self) -> &str {
        self.location_name.as_deref().unwrap_or("Unknown")
    }

    pub fn latitude(&self) -> f64 {
        self.latitude.unwrap_or(44.1076)
    }

    pub fn longitude(&self) -> f64 {
        self.longitude.unwrap_or(-73.9209)
    }

    pub fn measurement_system(&self) -> MeasurementSystem {
        self.measurement_system.unwrap_or_default()
    }

    pub fn update_on_the_minutes(&self) -> Vec<u32> {
        self.update_on_the_minutes.clone().unwrap_or_else(|| vec![0])
    }

    pub fn assets(&self) -> PathBuf {
        self.assets.clone().unwrap_or_else(|| PathBuf::from("assets.json"))
    }

    pub fn use_20ft_wind(&self) -> bool {
        self.use_20ft_wind.unwrap_or(false)
    }

    pub fn show_warning(&self) -> bool {
        self.show_warning.unwrap_or(false)
    }

    pub fn frame_path(&self) -> PathBuf {
        self.frame_path.clone().unwrap_or_else(|| PathBuf::from("frame.ppm"))
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "inkwx", about = "inkwx weather dashboard", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub latitude: Option<f64>,
    #[arg(long)]
    pub longitude: Option<f64>,
    /// Path to the JSON asset bundle
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub assets: Option<PathBuf>,
    /// Frame snapshot output path
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub frame_path: Option<PathBuf>,
    /// Render exactly one frame and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub emulate: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();

    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;

    if cli.dump_config {
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok((cfg, cli))
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/inkwx/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/inkwx/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/inkwx.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["inkwx.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

/// Overlay `other` onto `base`: set fields carry over, unset fields keep
/// whatever the lower layer had.
fn merge(base: &mut Config, other: Config) {
    if other.log_level.is_some() { base.log_level = other.log_level }
    if other.location_name.is_some() { base.location_name = other.location_name }
    if other.latitude.is_some() { base.latitude = other.latitude }
    if other.longitude.is_some() { base.longitude = other.longitude }
    if other.measurement_system.is_some() { base.measurement_system = other.measurement_system }
    if other.update_on_the_minutes.is_some() { base.update_on_the_minutes = other.update_on_the_minutes }
    if other.assets.is_some() { base.assets = other.assets }
    if other.use_20ft_wind.is_some() { base.use_20ft_wind = other.use_20ft_wind }
    if other.show_warning.is_some() { base.show_warning = other.show_warning }
    if other.frame_path.is_some() { base.frame_path = other.frame_path }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone() }
    if cli.latitude.is_some() { cfg.latitude = cli.latitude }
    if cli.longitude.is_some() { cfg.longitude = cli.longitude }
    if cli.assets.is_some() { cfg.assets = cli.assets.clone() }
    if cli.frame_path.is_some() { cfg.frame_path = cli.frame_path.clone() }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let lat = cfg.latitude();
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ConfigError::Validation(format!("latitude {} out of range", lat)));
    }
    let lon = cfg.longitude();
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ConfigError::Validation(format!("longitude {} out of range", lon)));
    }
    for minute in cfg.update_on_the_minutes() {
        if minute > 59 {
            return Err(ConfigError::Validation(format!(
                "update_on_the_minutes entry {} is not a minute mark",
                minute
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.update_on_the_minutes(), vec![0]);
        assert_eq!(cfg.measurement_system(), MeasurementSystem::Imperial);
        assert!(!cfg.use_20ft_wind());
        assert!(!cfg.show_warning());
    }

    #[test]
    fn test_merge_prefers_the_overlay() {
        let mut base = Config { latitude: Some(1.0), longitude: Some(2.0), ..Default::default() };
        let overlay = Config { latitude: Some(10.0), ..Default::default() };
        merge(&mut base, overlay);
        assert_eq!(base.latitude(), 10.0);
        assert_eq!(base.longitude(), 2.0);
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = "latitude: 40.7\nlongitude: -74.0\nmeasurement_system: metric\nupdate_on_the_minutes: [0, 30]\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.latitude(), 40.7);
        assert_eq!(cfg.measurement_system(), MeasurementSystem::Metric);
        assert_eq!(cfg.update_on_the_minutes(), vec![0, 30]);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cfg = Config { latitude: Some(120.0), ..Default::default() };
        assert!(validate(&cfg).is_err());
        let cfg = Config { update_on_the_minutes: Some(vec![0, 60]), ..Default::default() };
        assert!(validate(&cfg).is_err());
    }
}
