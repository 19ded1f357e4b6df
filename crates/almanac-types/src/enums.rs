//! Enumeration types for the Almanac simulation.
//!
//! Seasons and climates select rows of the climate tables; elevation bands
//! bucket a raw elevation in feet into the three adjustment classes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Elevation (in feet) at which the lowland band starts.
pub const LOWLAND_THRESHOLD_FT: i32 = 1000;

/// Elevation (in feet) above which the highland band starts.
pub const HIGHLAND_THRESHOLD_FT: i32 = 5000;

/// Errors returned when parsing an enumeration from its name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEnumError {
    /// The name does not match any known climate.
    #[error("unknown climate: {0}")]
    UnknownClimate(String),

    /// The name does not match any known season.
    #[error("unknown season: {0}")]
    UnknownSeason(String),
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// A season of the year. Selects temperature baselines and precipitation
/// frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Coldest season.
    Winter,
    /// Warming season.
    Spring,
    /// Warmest season.
    #[default]
    Summer,
    /// Cooling season.
    #[serde(alias = "autumn")]
    Fall,
}

impl Season {
    /// Every season, in calendar order.
    pub const ALL: [Self; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// Lowercase name used in configuration and save files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "winter" => Ok(Self::Winter),
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            other => Err(ParseEnumError::UnknownSeason(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Climate
// ---------------------------------------------------------------------------

/// A climate zone. Each climate has its own temperature, variation, and
/// precipitation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    /// Arctic and sub-arctic lands.
    Cold,
    /// Mid-latitude lands with four distinct seasons.
    #[default]
    Temperate,
    /// Hot and wet lands.
    Tropical,
    /// Hot and dry lands.
    Desert,
}

impl Climate {
    /// Every climate.
    pub const ALL: [Self; 4] = [Self::Cold, Self::Temperate, Self::Tropical, Self::Desert];

    /// Lowercase name used in configuration and save files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Temperate => "temperate",
            Self::Tropical => "tropical",
            Self::Desert => "desert",
        }
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Climate {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cold" => Ok(Self::Cold),
            "temperate" => Ok(Self::Temperate),
            "tropical" => Ok(Self::Tropical),
            "desert" => Ok(Self::Desert),
            other => Err(ParseEnumError::UnknownClimate(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Elevation band
// ---------------------------------------------------------------------------

/// Coarse elevation class used for temperature and precipitation adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationBand {
    /// Below 1000 ft.
    SeaLevel,
    /// 1000 ft up to and including 5000 ft.
    Lowland,
    /// Above 5000 ft.
    Highland,
}

impl ElevationBand {
    /// Classify an elevation in feet.
    pub const fn from_elevation(elevation_ft: i32) -> Self {
        if elevation_ft < LOWLAND_THRESHOLD_FT {
            Self::SeaLevel
        } else if elevation_ft <= HIGHLAND_THRESHOLD_FT {
            Self::Lowland
        } else {
            Self::Highland
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeaLevel => "Sea level",
            Self::Lowland => "Lowlands",
            Self::Highland => "Highlands",
        }
    }
}

// ---------------------------------------------------------------------------
// Symbol set
// ---------------------------------------------------------------------------

/// Glyphs used for weather warnings and wind arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolSet {
    /// Single ASCII letters, safe for any terminal.
    #[default]
    Ascii,
    /// Unicode pictographs. Not monospace in every font.
    Unicode,
}
