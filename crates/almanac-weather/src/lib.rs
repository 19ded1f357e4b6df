//! Weather generation for the Almanac simulation.
//!
//! The engine walks the clock one hour at a time, rolling dice against
//! climate tables to produce temperature, precipitation, wind, and cloud
//! cover. All randomness goes through [`DiceRoller`], so tests can script
//! every draw.
//!
//! # Modules
//!
//! - [`dice`] -- Dice notation and the draw service
//! - [`table`] -- Cumulative percentile tables
//! - [`climate`] -- Static climate, precipitation, wind, and cloud tables
//! - [`engine`] -- The hourly [`WeatherEngine`]
//! - [`error`] -- Error types

pub mod climate;
pub mod dice;
pub mod engine;
pub mod error;
pub mod table;

pub use climate::{
    ClimateProfile, ClimateTables, ElevationAdjustment, MAX_INTENSITY, PrecipitationIntensity,
    PrecipitationRow, SeasonalValues, TemperatureVariation, WindRow,
};
pub use dice::{DiceExpr, DiceRoller, RngDice, ScriptedDice};
pub use engine::{FREEZING_POINT_F, WARM_UP_HOURS, WeatherEngine};
pub use error::{ClimateError, TableLookupMiss};
pub use table::{PERCENTILE_DIE, PercentileTable};
