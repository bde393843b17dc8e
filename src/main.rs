/*
 *  main.rs
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

use std::time::Duration;

use chrono::{Local, Timelike};
use env_logger::Env;
use log::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use inkwx::app::WeatherApp;
use inkwx::assets::BundleStore;
use inkwx::config;
use inkwx::display::framebuffer::PpmBackend;
use inkwx::display::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};
use inkwx::weather::NwsForecast;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Sleep until the next configured minute mark. The refresh cadence is
/// coarse on purpose; the panel takes seconds to refresh anyway.
async fn wait_for_next_mark(marks: &[u32]) {
    tokio::time::sleep(Duration::from_secs(60)).await;
    loop {
        if marks.contains(&Local::now().minute()) {
            return;
        }
        tokio::time::sleep(Duration::from_secs(20)).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cfg, cli) = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level())).init();
    info!("inkwx {} (built {})", env!("CARGO_PKG_VERSION"), BUILD_DATE);
    info!(
        "station '{}' at ({}, {}), updating on minutes {:?}",
        cfg.location_name(),
        cfg.latitude(),
        cfg.longitude(),
        cfg.update_on_the_minutes()
    );

    let assets = BundleStore::open(&cfg.assets())?;
    let forecast = NwsForecast::new(
        cfg.latitude(),
        cfg.longitude(),
        cfg.measurement_system(),
        cfg.use_20ft_wind(),
    )?;
    let backend = PpmBackend::new(SCREEN_WIDTH, SCREEN_HEIGHT, cfg.frame_path());
    let mut app = WeatherApp::new(backend, forecast, assets, cfg.show_warning())?;

    // First frame right away; later frames follow the minute marks.
    app.update().await?;

    if cli.emulate {
        info!("emulate mode: frame written to {}", cfg.frame_path().display());
        return Ok(());
    }

    let marks = cfg.update_on_the_minutes();

    #[cfg(unix)]
    {
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    info!("SIGINT received, shutting down");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("SIGTERM received, shutting down");
                    break;
                }
                _ = wait_for_next_mark(&marks) => {
                    if let Err(e) = app.update().await {
                        error!("frame update failed: {}", e);
                    }
                }
            }
        }
    }

    #[cfg(not(unix))]
    loop {
        wait_for_next_mark(&marks).await;
        if let Err(e) = app.update().await {
            error!("frame update failed: {}", e);
        }
    }

    #[cfg(unix)]
    Ok(())
}
