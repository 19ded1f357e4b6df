//! Almanac binary.
//!
//! Loads configuration, builds the calendars and a weather timeline, and
//! logs an hourly forecast starting at the configured date.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `almanac-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the reckoning engine from the configured calendars
//! 4. Create the timeline with seeded or OS-random dice
//! 5. Log one line per forecast hour
//! 6. Write a campaign save if a save path is configured

mod error;

use std::path::Path;
use std::sync::Arc;

use almanac_core::config::AlmanacConfig;
use almanac_core::{CampaignSave, ReckoningEngine, Timeline};
use almanac_types::{ElevationBand, SymbolSet, Weather};
use almanac_weather::RngDice;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const CONFIG_PATH: &str = "almanac-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, calendar setup, generation, or the
/// optional save fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging depends on it, so note the source
    //    and report it once the subscriber is up.
    let config_path = Path::new(CONFIG_PATH);
    let config_found = config_path.exists();
    let config = if config_found {
        AlmanacConfig::from_file(config_path)?
    } else {
        AlmanacConfig::default()
    };

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("almanac-engine starting");
    if config_found {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }

    // 3. Calendars.
    let reckoning = Arc::new(ReckoningEngine::from_config(&config.reckoning)?);
    info!(
        calendars = reckoning.calendar_names().collect::<Vec<_>>().join(", "),
        season_calendar = reckoning.season_calendar(),
        "Calendars loaded"
    );

    // 4. Timeline.
    let dice = if let Some(seed) = config.timeline.seed {
        info!(seed, "Using seeded dice");
        RngDice::seeded(seed)
    } else {
        RngDice::from_os_rng()
    };
    let mut timeline = Timeline::new(
        Arc::clone(&reckoning),
        dice,
        config.timeline.climate,
        config.timeline.elevation,
    )
    .with_margin(i64::from(config.timeline.margin_hours));

    // 5. Forecast.
    let forecast = &config.forecast;
    let start = reckoning.parse_date(&forecast.start_date, &forecast.calendar, ".")?;
    info!(
        calendar = forecast.calendar,
        start_date = forecast.start_date,
        start_hour = start,
        hours = forecast.hours,
        climate = %config.timeline.climate,
        elevation = config.timeline.elevation,
        band = ElevationBand::from_elevation(config.timeline.elevation).label(),
        "Generating forecast"
    );

    for offset in 0..forecast.hours {
        let epoch_hour = start.saturating_add(i64::from(offset));
        let date = reckoning.epoch_to_date(epoch_hour, &forecast.calendar)?;
        let hour = timeline.get(epoch_hour)?;
        let weather = &hour.weather;
        info!(
            time = %date.time_string(),
            date = %date.long_date(true),
            warnings = %weather.warning_symbols(forecast.symbols),
            weather = %weather,
            clouds = weather.cloud_cover,
            wind = format_args!(
                "{} {:.1} m/s {}",
                wind_direction(weather, forecast.symbols),
                weather.wind_speed_ms(),
                weather.wind_strength
            ),
            events = hour.events.len(),
            "Forecast"
        );
    }
    info!(cached_hours = timeline.len(), "Forecast complete");

    // 6. Save.
    if let Some(save_path) = &forecast.save_path {
        let save_name = save_path
            .file_stem()
            .map_or_else(|| "campaign".to_owned(), |stem| stem.to_string_lossy().into_owned());
        let save = CampaignSave {
            save_name,
            current_time: start,
            calendar_used: forecast.calendar.clone(),
            calendar: timeline.to_save(),
        };
        if let Err(err) = save.write_to(save_path) {
            warn!(path = %save_path.display(), %err, "Campaign save failed");
            return Err(err.into());
        }
    }

    Ok(())
}

fn wind_direction(weather: &Weather, symbols: SymbolSet) -> &'static str {
    match symbols {
        SymbolSet::Ascii => weather.wind_direction_short(),
        SymbolSet::Unicode => weather.wind_direction_arrow(),
    }
}
