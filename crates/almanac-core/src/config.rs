//! Configuration loading and typed config structures for the Almanac.
//!
//! The canonical configuration lives in `almanac-config.yaml` at the project
//! root. Every section and every field has a default, so an empty file (or
//! no file at all) yields the built-in human, drow, and kitsune calendars and
//! a temperate 1500 ft timeline.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use almanac_types::{Climate, SymbolSet};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The YAML parsed but describes an unusable setup.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration. Mirrors the structure of `almanac-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlmanacConfig {
    /// Calendars and the season calendar.
    #[serde(default)]
    pub reckoning: ReckoningConfig,

    /// Timeline cache settings.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// What the binary prints on startup.
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AlmanacConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if [`AlmanacConfig::validate`] fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if [`AlmanacConfig::validate`] fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-section checks that serde cannot express.
    ///
    /// Calendar contents are validated by the reckoning engine when it is
    /// built; this only checks that the sections agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.reckoning.calendars.contains_key(&self.forecast.calendar) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "forecast calendar {:?} is not configured",
                    self.forecast.calendar
                ),
            });
        }
        if self.forecast.hours == 0 {
            return Err(ConfigError::Invalid {
                reason: "forecast.hours must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reckoning
// ---------------------------------------------------------------------------

/// Calendar configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReckoningConfig {
    /// Calendar whose month names are the seasons.
    #[serde(default = "default_season_calendar")]
    pub season_calendar: String,

    /// Every known calendar, by name.
    #[serde(default = "default_calendars")]
    pub calendars: BTreeMap<String, CalendarConfig>,
}

impl Default for ReckoningConfig {
    fn default() -> Self {
        Self {
            season_calendar: default_season_calendar(),
            calendars: default_calendars(),
        }
    }
}

/// One calendar system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarConfig {
    /// Months in order. Their lengths add up to the year length.
    pub months: Vec<MonthConfig>,

    /// Days of the week in order. Absent for calendars without weeks.
    #[serde(default)]
    pub weekdays: Option<Vec<WeekdayConfig>>,

    /// Epoch hours at which each era after "before reckoning" begins,
    /// strictly ascending.
    pub era_start_hours: Vec<i64>,
}

/// A month and its length.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonthConfig {
    /// Month name.
    pub name: String,
    /// Length in days.
    pub days: u32,
}

/// A day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeekdayConfig {
    /// Full name.
    pub name: String,
    /// Short form, e.g. `Gon.`.
    pub abbreviation: String,
}

// ---------------------------------------------------------------------------
// Timeline, forecast, logging
// ---------------------------------------------------------------------------

/// Timeline cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineConfig {
    /// Hours generated on either side of a requested hour.
    #[serde(default = "default_margin_hours")]
    pub margin_hours: u32,

    /// Climate of the campaign region.
    #[serde(default)]
    pub climate: Climate,

    /// Elevation of the campaign region in feet.
    #[serde(default = "default_elevation")]
    pub elevation: i32,

    /// Seed for reproducible weather. OS entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            margin_hours: default_margin_hours(),
            climate: Climate::default(),
            elevation: default_elevation(),
            seed: None,
        }
    }
}

/// Forecast printed by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForecastConfig {
    /// Calendar used to read `start_date` and to print dates.
    #[serde(default = "default_forecast_calendar")]
    pub calendar: String,

    /// Short date (`day.month.year`) of the first forecast hour.
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Number of hours to print.
    #[serde(default = "default_forecast_hours")]
    pub hours: u32,

    /// Where to write a campaign save after the forecast, if anywhere.
    #[serde(default)]
    pub save_path: Option<PathBuf>,

    /// Glyphs for warning marks and wind arrows in forecast lines.
    #[serde(default)]
    pub symbols: SymbolSet,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            calendar: default_forecast_calendar(),
            start_date: default_start_date(),
            hours: default_forecast_hours(),
            save_path: None,
            symbols: SymbolSet::Ascii,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_season_calendar() -> String {
    "kitsune".to_owned()
}

const fn default_margin_hours() -> u32 {
    72
}

const fn default_elevation() -> i32 {
    1500
}

fn default_forecast_calendar() -> String {
    "human".to_owned()
}

fn default_start_date() -> String {
    "14.3.1394".to_owned()
}

const fn default_forecast_hours() -> u32 {
    48
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn months(entries: &[(&str, u32)]) -> Vec<MonthConfig> {
    entries
        .iter()
        .map(|(name, days)| MonthConfig {
            name: (*name).to_owned(),
            days: *days,
        })
        .collect()
}

fn default_calendars() -> BTreeMap<String, CalendarConfig> {
    let human = CalendarConfig {
        months: months(&[
            ("Sharis", 34),
            ("Lathis", 34),
            ("Sunus", 33),
            ("Talas", 34),
            ("Savris", 34),
            ("Malus", 33),
            ("Chautis", 34),
            ("Myrus", 34),
            ("Auris", 33),
        ]),
        weekdays: Some(
            [
                ("Gondag", "Gon."),
                ("Ildag", "Ild."),
                ("Waudag", "Wau."),
                ("Seludag", "Sel."),
                ("Tyrdag", "Tyr."),
                ("Liidag", "Lli."),
                ("Tordag", "Tor."),
                ("Eldag", "Eld."),
            ]
            .iter()
            .map(|(name, abbreviation)| WeekdayConfig {
                name: (*name).to_owned(),
                abbreviation: (*abbreviation).to_owned(),
            })
            .collect(),
        ),
        era_start_hours: vec![0],
    };

    let drow = CalendarConfig {
        months: months(&[
            ("Arcania", 36),
            ("Feralia", 36),
            ("Radikas", 36),
            ("Venia", 36),
            ("Noctil", 36),
            ("Aquor", 36),
            ("Mortalis", 36),
            ("Tenebris", 36),
        ]),
        weekdays: None,
        era_start_hours: vec![10_107_384],
    };

    let kitsune = CalendarConfig {
        months: months(&[("Winter", 76), ("Spring", 76), ("Summer", 76), ("Fall", 75)]),
        weekdays: None,
        era_start_hours: vec![-13_657_800],
    };

    BTreeMap::from([
        ("human".to_owned(), human),
        ("drow".to_owned(), drow),
        ("kitsune".to_owned(), kitsune),
    ])
}
