//! Static climate data.
//!
//! Temperatures are Fahrenheit, durations of temperature variations are in
//! days, and precipitation durations are in hours. [`ClimateTables::standard`]
//! builds the tables every engine uses unless it is given its own.

use almanac_types::{Climate, ElevationBand, Season};

use crate::dice::DiceExpr;
use crate::table::PercentileTable;

/// Highest precipitation intensity index (torrential).
pub const MAX_INTENSITY: usize = 3;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A multi-day deviation from the seasonal baseline temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureVariation {
    /// Degrees added to the baseline.
    pub delta: DiceExpr,
    /// Days the general temperature holds before it is re-rolled.
    pub duration_days: DiceExpr,
}

/// One kind of precipitation and how long it lasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecipitationRow {
    /// Label written into the weather, e.g. `"Light rain"`.
    pub label: String,
    /// Duration in hours.
    pub duration: DiceExpr,
}

/// A wind strength classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindRow {
    /// Label written into the weather, e.g. `"Strong winds"`.
    pub strength: String,
    /// Wind speed in miles per hour.
    pub speed: DiceExpr,
}

/// Adjustments applied for an elevation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevationAdjustment {
    /// Degrees added to the baseline temperature.
    pub temperature_delta: i32,
    /// Base precipitation intensity index, before the climate shift.
    pub precipitation_intensity: i32,
    /// Added to the precipitation frequency index.
    pub frequency_delta: i32,
}

/// One integer per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalValues {
    /// Winter value.
    pub winter: i32,
    /// Spring value.
    pub spring: i32,
    /// Summer value.
    pub summer: i32,
    /// Fall value.
    pub fall: i32,
}

impl SeasonalValues {
    /// Value for `season`.
    pub const fn get(&self, season: Season) -> i32 {
        match season {
            Season::Winter => self.winter,
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Fall => self.fall,
        }
    }
}

/// Everything the engine needs to know about one climate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimateProfile {
    /// Seasonal baseline temperatures.
    pub temperature_baseline: SeasonalValues,
    /// Multi-day variation table.
    pub temperature_variation: PercentileTable<TemperatureVariation>,
    /// Seasonal precipitation frequency indices.
    pub precipitation_frequency: SeasonalValues,
    /// Shift applied to the elevation's precipitation intensity.
    pub intensity_shift: i32,
}

/// Frozen and unfrozen precipitation tables for one intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecipitationIntensity {
    /// Used when the temperature is above freezing.
    pub unfrozen: PercentileTable<PrecipitationRow>,
    /// Used when the temperature is below freezing.
    pub frozen: PercentileTable<PrecipitationRow>,
}

// ---------------------------------------------------------------------------
// ClimateTables
// ---------------------------------------------------------------------------

/// The complete set of climate tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimateTables {
    cold: ClimateProfile,
    temperate: ClimateProfile,
    tropical: ClimateProfile,
    desert: ClimateProfile,
    sea_level: ElevationAdjustment,
    lowland: ElevationAdjustment,
    highland: ElevationAdjustment,
    precipitation_chances: Vec<u32>,
    light: PrecipitationIntensity,
    medium: PrecipitationIntensity,
    heavy: PrecipitationIntensity,
    torrential: PrecipitationIntensity,
    wind: PercentileTable<WindRow>,
    cloud_cover: PercentileTable<&'static str>,
}

impl Default for ClimateTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl ClimateTables {
    /// Profile of one climate.
    pub const fn profile(&self, climate: Climate) -> &ClimateProfile {
        match climate {
            Climate::Cold => &self.cold,
            Climate::Temperate => &self.temperate,
            Climate::Tropical => &self.tropical,
            Climate::Desert => &self.desert,
        }
    }

    /// Seasonal baseline temperature of a climate.
    pub const fn temperature_baseline(&self, climate: Climate, season: Season) -> i32 {
        self.profile(climate).temperature_baseline.get(season)
    }

    /// Multi-day temperature variation table of a climate.
    pub const fn temperature_variation_table(
        &self,
        climate: Climate,
    ) -> &PercentileTable<TemperatureVariation> {
        &self.profile(climate).temperature_variation
    }

    /// Seasonal precipitation frequency index of a climate.
    pub const fn precipitation_frequency(&self, climate: Climate, season: Season) -> i32 {
        self.profile(climate).precipitation_frequency.get(season)
    }

    /// Daily chance (percent) of precipitation for a frequency index.
    /// Out-of-range indices are clamped to the table.
    pub fn precipitation_chance(&self, frequency: i32) -> u32 {
        let last = self.precipitation_chances.len().saturating_sub(1);
        let index = usize::try_from(frequency.max(0)).unwrap_or(0).min(last);
        self.precipitation_chances.get(index).copied().unwrap_or(0)
    }

    /// Adjustments for an elevation band.
    pub const fn elevation_adjustment(&self, band: ElevationBand) -> ElevationAdjustment {
        match band {
            ElevationBand::SeaLevel => self.sea_level,
            ElevationBand::Lowland => self.lowland,
            ElevationBand::Highland => self.highland,
        }
    }

    /// Precipitation intensity index for a climate at an elevation band,
    /// clamped to `0..=MAX_INTENSITY`.
    pub fn intensity_index(&self, climate: Climate, band: ElevationBand) -> usize {
        let raw = self
            .elevation_adjustment(band)
            .precipitation_intensity
            .saturating_add(self.profile(climate).intensity_shift);
        usize::try_from(raw.max(0)).unwrap_or(0).min(MAX_INTENSITY)
    }

    /// Precipitation table for an intensity index (clamped).
    pub const fn precipitation_table(
        &self,
        intensity: usize,
        frozen: bool,
    ) -> &PercentileTable<PrecipitationRow> {
        let tables = match intensity {
            0 => &self.light,
            1 => &self.medium,
            2 => &self.heavy,
            _ => &self.torrential,
        };
        if frozen { &tables.frozen } else { &tables.unfrozen }
    }

    /// Precipitation table for a climate at an elevation band.
    pub fn precipitation_intensity_table(
        &self,
        climate: Climate,
        band: ElevationBand,
        frozen: bool,
    ) -> &PercentileTable<PrecipitationRow> {
        self.precipitation_table(self.intensity_index(climate, band), frozen)
    }

    /// Wind strength table.
    pub const fn wind_speed_table(&self) -> &PercentileTable<WindRow> {
        &self.wind
    }

    /// Cloud cover table; the payload is the label of each class.
    pub const fn cloud_cover_table(&self) -> &PercentileTable<&'static str> {
        &self.cloud_cover
    }

    /// Cloud cover labels in class order, `None` through `Overcast`.
    pub fn cloud_cover_labels(&self) -> Vec<&'static str> {
        self.cloud_cover.rows().map(|(_, label)| *label).collect()
    }

    /// Label of a cloud cover class, clamped to the table.
    pub fn cloud_cover_label(&self, class: usize) -> &'static str {
        let last = self.cloud_cover.len().saturating_sub(1);
        self.cloud_cover.row(class.min(last)).copied().unwrap_or("None")
    }

    /// Replace the multi-day temperature variation table of a climate.
    #[must_use]
    pub fn with_temperature_variation_table(
        mut self,
        climate: Climate,
        table: PercentileTable<TemperatureVariation>,
    ) -> Self {
        let profile = match climate {
            Climate::Cold => &mut self.cold,
            Climate::Temperate => &mut self.temperate,
            Climate::Tropical => &mut self.tropical,
            Climate::Desert => &mut self.desert,
        };
        profile.temperature_variation = table;
        self
    }

    /// Replace the precipitation table of an intensity index (clamped).
    #[must_use]
    pub fn with_precipitation_table(
        mut self,
        intensity: usize,
        frozen: bool,
        table: PercentileTable<PrecipitationRow>,
    ) -> Self {
        let tables = match intensity {
            0 => &mut self.light,
            1 => &mut self.medium,
            2 => &mut self.heavy,
            _ => &mut self.torrential,
        };
        if frozen {
            tables.frozen = table;
        } else {
            tables.unfrozen = table;
        }
        self
    }

    /// Replace the wind strength table.
    #[must_use]
    pub fn with_wind_speed_table(mut self, table: PercentileTable<WindRow>) -> Self {
        self.wind = table;
        self
    }

    /// Replace the cloud cover table.
    #[must_use]
    pub fn with_cloud_cover_table(mut self, table: PercentileTable<&'static str>) -> Self {
        self.cloud_cover = table;
        self
    }

    /// The built-in tables.
    pub fn standard() -> Self {
        Self {
            cold: ClimateProfile {
                temperature_baseline: seasonal(20, 30, 40, 30),
                temperature_variation: variation_table(
                    "cold temperature variation",
                    &[20, 40, 60, 80, 95, 99, 100],
                    &[
                        DiceExpr::new(1, 4, 0),
                        DiceExpr::new(1, 6, 1),
                        DiceExpr::new(1, 6, 2),
                        DiceExpr::new(1, 6, 2),
                        DiceExpr::new(1, 6, 1),
                        DiceExpr::new(1, 4, 0),
                        DiceExpr::new(1, 2, 0),
                    ],
                ),
                precipitation_frequency: seasonal(3, 2, 1, 2),
                intensity_shift: -1,
            },
            temperate: ClimateProfile {
                temperature_baseline: seasonal(30, 60, 80, 60),
                temperature_variation: variation_table(
                    "temperate temperature variation",
                    &[5, 15, 35, 65, 85, 95, 100],
                    &[
                        DiceExpr::new(1, 2, 0),
                        DiceExpr::new(1, 4, 0),
                        DiceExpr::new(1, 4, 1),
                        DiceExpr::new(1, 6, 1),
                        DiceExpr::new(1, 4, 1),
                        DiceExpr::new(1, 4, 0),
                        DiceExpr::new(1, 2, 0),
                    ],
                ),
                precipitation_frequency: seasonal(1, 2, 3, 2),
                intensity_shift: 0,
            },
            tropical: ClimateProfile {
                temperature_baseline: seasonal(50, 75, 95, 75),
                temperature_variation: warm_variation_table("tropical temperature variation"),
                precipitation_frequency: seasonal(1, 3, 2, 3),
                intensity_shift: 1,
            },
            desert: ClimateProfile {
                temperature_baseline: seasonal(50, 75, 95, 75),
                temperature_variation: warm_variation_table("desert temperature variation"),
                precipitation_frequency: seasonal(2, 0, 0, 0),
                intensity_shift: -1,
            },
            sea_level: ElevationAdjustment {
                temperature_delta: 10,
                precipitation_intensity: 2,
                frequency_delta: 0,
            },
            lowland: ElevationAdjustment {
                temperature_delta: 0,
                precipitation_intensity: 1,
                frequency_delta: 0,
            },
            highland: ElevationAdjustment {
                temperature_delta: -10,
                precipitation_intensity: 1,
                frequency_delta: -1,
            },
            precipitation_chances: vec![5, 15, 30, 60, 95],
            light: PrecipitationIntensity {
                unfrozen: precipitation_table(
                    "light precipitation",
                    &[
                        (20, "Light fog", DiceExpr::new(1, 8, 0)),
                        (40, "Medium fog", DiceExpr::new(1, 6, 0)),
                        (50, "Drizzle", DiceExpr::new(1, 4, 0)),
                        (75, "Drizzle", DiceExpr::new(2, 12, 0)),
                        (90, "Light rain", DiceExpr::new(1, 4, 0)),
                        (100, "Light rain", DiceExpr::new(1, 2, 0)),
                    ],
                ),
                frozen: precipitation_table(
                    "light frozen precipitation",
                    &[
                        (20, "Light fog", DiceExpr::new(1, 6, 0)),
                        (40, "Light fog", DiceExpr::new(1, 8, 0)),
                        (50, "Medium fog", DiceExpr::new(1, 4, 0)),
                        (60, "Light snow", DiceExpr::new(1, 1, 0)),
                        (75, "Light snow", DiceExpr::new(1, 4, 0)),
                        (100, "Light snow", DiceExpr::new(2, 12, 0)),
                    ],
                ),
            },
            medium: PrecipitationIntensity {
                unfrozen: precipitation_table(
                    "medium precipitation",
                    &[
                        (10, "Medium fog", DiceExpr::new(1, 8, 0)),
                        (20, "Medium fog", DiceExpr::new(1, 12, 0)),
                        (30, "Heavy fog", DiceExpr::new(1, 4, 0)),
                        (35, "Rain", DiceExpr::new(1, 4, 0)),
                        (70, "Rain", DiceExpr::new(1, 8, 0)),
                        (90, "Rain", DiceExpr::new(2, 12, 0)),
                        (100, "Rain", DiceExpr::new(1, 4, 0)),
                    ],
                ),
                frozen: precipitation_table(
                    "medium frozen precipitation",
                    &[
                        (10, "Medium fog", DiceExpr::new(1, 6, 0)),
                        (20, "Medium fog", DiceExpr::new(1, 8, 0)),
                        (30, "Heavy fog", DiceExpr::new(1, 4, 0)),
                        (50, "Medium snow", DiceExpr::new(1, 4, 0)),
                        (90, "Medium snow", DiceExpr::new(1, 8, 0)),
                        (100, "Medium snow", DiceExpr::new(2, 12, 0)),
                    ],
                ),
            },
            heavy: PrecipitationIntensity {
                unfrozen: precipitation_table(
                    "heavy precipitation",
                    &[
                        (10, "Heavy fog", DiceExpr::new(1, 8, 0)),
                        (20, "Heavy fog", DiceExpr::new(2, 6, 0)),
                        (50, "Heavy rain", DiceExpr::new(1, 12, 0)),
                        (70, "Heavy rain", DiceExpr::new(2, 12, 0)),
                        (85, "Thunderstorm", DiceExpr::new(1, 3, 0)),
                        (100, "Thunderstorm", DiceExpr::new(1, 6, 0)),
                    ],
                ),
                frozen: precipitation_table(
                    "heavy frozen precipitation",
                    &[
                        (10, "Medium fog", DiceExpr::new(1, 8, 0)),
                        (20, "Heavy fog", DiceExpr::new(2, 6, 0)),
                        (60, "Light snow", DiceExpr::new(2, 12, 0)),
                        (90, "Medium snow", DiceExpr::new(1, 8, 0)),
                        (100, "Heavy snow", DiceExpr::new(1, 6, 0)),
                    ],
                ),
            },
            torrential: PrecipitationIntensity {
                unfrozen: precipitation_table(
                    "torrential precipitation",
                    &[
                        (5, "Heavy fog", DiceExpr::new(1, 8, 0)),
                        (10, "Heavy fog", DiceExpr::new(2, 6, 0)),
                        (30, "Heavy rain", DiceExpr::new(2, 6, 0)),
                        (60, "Heavy rain", DiceExpr::new(2, 12, 0)),
                        (80, "Thunderstorm", DiceExpr::new(1, 3, 0)),
                        (100, "Thunderstorm", DiceExpr::new(1, 6, 0)),
                    ],
                ),
                frozen: precipitation_table(
                    "torrential frozen precipitation",
                    &[
                        (5, "Heavy fog", DiceExpr::new(1, 8, 0)),
                        (10, "Heavy fog", DiceExpr::new(2, 6, 0)),
                        (50, "Heavy snow", DiceExpr::new(1, 4, 0)),
                        (70, "Heavy snow", DiceExpr::new(1, 8, 0)),
                        (100, "Heavy snow", DiceExpr::new(2, 12, 0)),
                    ],
                ),
            },
            wind: PercentileTable::new(
                "wind speed",
                vec![
                    (50, wind("Light winds", DiceExpr::new(1, 11, 1))),
                    (80, wind("Moderate winds", DiceExpr::new(1, 10, 10))),
                    (90, wind("Strong winds", DiceExpr::new(1, 10, 20))),
                    (95, wind("Severe winds", DiceExpr::new(1, 20, 30))),
                    (100, wind("Windstorm", DiceExpr::new(1, 20, 50))),
                ],
            ),
            cloud_cover: PercentileTable::new(
                "cloud cover",
                vec![(50, "None"), (70, "Light clouds"), (85, "Medium clouds"), (100, "Overcast")],
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

const fn seasonal(winter: i32, spring: i32, summer: i32, fall: i32) -> SeasonalValues {
    SeasonalValues {
        winter,
        spring,
        summer,
        fall,
    }
}

/// Variation table whose deltas run symmetrically from `-Nd10` to `+Nd10`
/// across the rows, centred on `0d10`.
fn variation_table(
    name: &'static str,
    bounds: &[u32],
    durations: &[DiceExpr],
) -> PercentileTable<TemperatureVariation> {
    let half = i32::try_from(bounds.len() / 2).unwrap_or(0);
    let rows = bounds
        .iter()
        .zip(durations)
        .zip(-half..=half)
        .map(|((bound, duration), count)| {
            (
                *bound,
                TemperatureVariation {
                    delta: DiceExpr::new(count, 10, 0),
                    duration_days: *duration,
                },
            )
        })
        .collect();
    PercentileTable::new(name, rows)
}

fn warm_variation_table(name: &'static str) -> PercentileTable<TemperatureVariation> {
    variation_table(
        name,
        &[10, 25, 55, 85, 100],
        &[
            DiceExpr::new(1, 2, 0),
            DiceExpr::new(1, 2, 0),
            DiceExpr::new(1, 4, 0),
            DiceExpr::new(1, 4, 0),
            DiceExpr::new(1, 2, 0),
        ],
    )
}

fn precipitation_table(
    name: &'static str,
    rows: &[(u32, &str, DiceExpr)],
) -> PercentileTable<PrecipitationRow> {
    PercentileTable::new(
        name,
        rows.iter()
            .map(|(bound, label, duration)| {
                (
                    *bound,
                    PrecipitationRow {
                        label: (*label).to_owned(),
                        duration: *duration,
                    },
                )
            })
            .collect(),
    )
}

fn wind(strength: &str, speed: DiceExpr) -> WindRow {
    WindRow {
        strength: strength.to_owned(),
        speed,
    }
}
