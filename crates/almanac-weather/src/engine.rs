//! Hour-by-hour weather generation.
//!
//! [`WeatherEngine::advance`] moves the generator forward one hour. Each
//! call runs these steps in order:
//!
//! 1. **Clock** -- bump the hour-of-day cursor, wrapping 23 to 0.
//! 2. **Daily reset** (hour 0 only) -- roll the day's precipitation into the
//!    queue and tick the general temperature timer, re-rolling the general
//!    temperature when it runs out.
//! 3. **Temperature** -- ramp during 06-08 and 18-20, snap to the daytime
//!    target at 09 and the nighttime target at 21.
//! 4. **Precipitation** -- count down the active precipitation and start the
//!    queued one when its hour comes.
//! 5. **Wind and clouds** (hour 0 only) -- roll direction, speed class, and
//!    cloud cover class for the day.
//! 6. **Emit** -- apply the precipitation and thunderstorm floors to the
//!    rolled classes and write labels and wind speed into the weather.
//!
//! The rolled classes stay in the state untouched; floors only affect what
//! is emitted for the current hour.

use std::sync::Arc;

use almanac_types::{Climate, ElevationBand, GeneratorState, QueuedPrecipitation, Season, Weather};
use tracing::{debug, warn};

use crate::climate::ClimateTables;
use crate::dice::{DiceExpr, DiceRoller};
use crate::error::TableLookupMiss;
use crate::table::PERCENTILE_DIE;

/// Hours run after a fresh state before the first usable hour.
pub const WARM_UP_HOURS: u32 = 25;

/// Precipitation is frozen below this temperature (Fahrenheit).
pub const FREEZING_POINT_F: i32 = 32;

/// Daily swing of the daytime target around the general temperature.
const DAILY_VARIATION: DiceExpr = DiceExpr::new(2, 6, -7);

/// How far the night falls below the day.
const NIGHT_DROP: DiceExpr = DiceExpr::new(2, 6, 3);

/// Start hour of the day's precipitation, `0..=23`.
const START_HOUR: DiceExpr = DiceExpr::new(1, 24, -1);

/// Wind direction in degrees, `0..=359`.
const WIND_DIRECTION: DiceExpr = DiceExpr::new(1, 360, -1);

const MORNING_RAMP: core::ops::Range<i32> = 6..9;
const EVENING_RAMP: core::ops::Range<i32> = 18..21;
const DAY_SNAP_HOUR: i32 = 9;
const NIGHT_SNAP_HOUR: i32 = 21;

/// Clouds forced while precipitation is falling.
const PRECIPITATION_CLOUD_FLOOR: i32 = 3;

/// Hours of cloud build-up before queued precipitation starts.
const LEAD_IN_HOURS: i32 = 3;

/// Stateful hourly weather generator.
///
/// The engine owns its dice and a shared handle to the climate tables. All
/// state that influences the next hour lives in [`GeneratorState`], so an
/// engine can resume from any snapshot via [`WeatherEngine::set_state`].
#[derive(Debug, Clone)]
pub struct WeatherEngine<D> {
    tables: Arc<ClimateTables>,
    dice: D,
    state: GeneratorState,
}

impl<D: DiceRoller> WeatherEngine<D> {
    /// Create an engine with the standard climate tables.
    pub fn new(dice: D) -> Self {
        Self::with_tables(Arc::new(ClimateTables::standard()), dice)
    }

    /// Create an engine with custom climate tables.
    pub fn with_tables(tables: Arc<ClimateTables>, dice: D) -> Self {
        Self {
            tables,
            dice,
            state: GeneratorState::default(),
        }
    }

    /// Reset to a fresh state and warm up until `hour_of_day` (taken mod 24)
    /// is the current hour.
    ///
    /// The warm-up always passes a full midnight first, so the daily reset
    /// has rolled a temperature and a precipitation queue before the first
    /// returned hour.
    pub fn initialize(
        &mut self,
        season: Season,
        climate: Climate,
        elevation: i32,
        hour_of_day: u32,
    ) -> Weather {
        self.state = GeneratorState::fresh(season, climate, elevation);
        let steps = WARM_UP_HOURS.saturating_add(hour_of_day % 24);
        for _ in 0..steps {
            self.advance();
        }
        debug!(
            %season,
            %climate,
            elevation,
            hour = self.state.hour,
            temperature = self.state.weather.temperature,
            "Weather engine initialized"
        );
        self.weather()
    }

    /// Advance one hour and return the new weather.
    pub fn advance(&mut self) -> Weather {
        let Self {
            tables,
            dice,
            state,
        } = self;
        let tables: &ClimateTables = tables;

        state.hour = state.hour.saturating_add(1).rem_euclid(24);
        let midnight = state.hour == 0;

        if midnight {
            daily_reset(tables, dice, state);
        }
        update_temperature(dice, state);
        update_precipitation(state);
        if midnight {
            roll_wind_and_clouds(tables, dice, state);
        }
        emit(tables, dice, state);

        state.weather.clone()
    }

    /// The full generator state.
    pub const fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Replace the generator state, e.g. to resume from a cached hour.
    pub fn set_state(&mut self, state: GeneratorState) {
        self.state = state;
    }

    /// The weather produced by the most recent advance.
    pub fn weather(&self) -> Weather {
        self.state.weather.clone()
    }

    /// Change the season used from the next advance on.
    pub const fn set_season(&mut self, season: Season) {
        self.state.season = season;
    }

    /// Change the climate used from the next advance on.
    pub const fn set_climate(&mut self, climate: Climate) {
        self.state.climate = climate;
    }

    /// Change the elevation used from the next advance on.
    pub const fn set_elevation(&mut self, elevation: i32) {
        self.state.elevation = elevation;
    }

    /// The climate tables in use.
    pub fn tables(&self) -> &ClimateTables {
        &self.tables
    }

    /// Mutable access to the dice, e.g. to re-seed between runs.
    pub const fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn log_miss(miss: &TableLookupMiss) {
    warn!(table = miss.table, draw = miss.draw, "Table lookup missed, using fallback");
}

fn daily_reset<D: DiceRoller>(tables: &ClimateTables, dice: &mut D, state: &mut GeneratorState) {
    let band = ElevationBand::from_elevation(state.elevation);
    let frequency = tables
        .precipitation_frequency(state.climate, state.season)
        .saturating_add(tables.elevation_adjustment(band).frequency_delta);
    let chance = tables.precipitation_chance(frequency);

    state.queued_precipitation = if dice.draw(PERCENTILE_DIE) <= chance {
        let frozen = state.weather.temperature < FREEZING_POINT_F;
        let table = tables.precipitation_intensity_table(state.climate, band, frozen);
        let (kind, duration) = match table.roll(dice) {
            Ok((_, row)) => (row.label.clone(), row.duration.roll(dice)),
            Err(miss) => {
                log_miss(&miss);
                (String::new(), 1)
            }
        };
        QueuedPrecipitation {
            kind,
            start_hour: START_HOUR.roll(dice),
            duration,
        }
    } else {
        QueuedPrecipitation::none()
    };

    state.temperature_refresh_timer = state.temperature_refresh_timer.saturating_sub(1);
    if state.temperature_refresh_timer <= 0 {
        refresh_temperature(tables, dice, state);
    }
}

fn refresh_temperature<D: DiceRoller>(
    tables: &ClimateTables,
    dice: &mut D,
    state: &mut GeneratorState,
) {
    let band = ElevationBand::from_elevation(state.elevation);
    let baseline = tables
        .temperature_baseline(state.climate, state.season)
        .saturating_add(tables.elevation_adjustment(band).temperature_delta);

    let (delta, days) = match tables.temperature_variation_table(state.climate).roll(dice) {
        Ok((_, variation)) => (variation.delta.roll(dice), variation.duration_days.roll(dice)),
        Err(miss) => {
            log_miss(&miss);
            (0, 1)
        }
    };

    state.temperature_general = baseline.saturating_add(delta);
    state.temperature_refresh_timer = days;
    state.temperature_daytime = state
        .temperature_general
        .saturating_add(DAILY_VARIATION.roll(dice));
    state.temperature_change_step =
        state.temperature_daytime.saturating_sub(state.temperature_nighttime) / 4;
}

fn update_temperature<D: DiceRoller>(dice: &mut D, state: &mut GeneratorState) {
    let hour = state.hour;
    if MORNING_RAMP.contains(&hour) || EVENING_RAMP.contains(&hour) {
        state.weather.temperature = state
            .weather
            .temperature
            .saturating_add(state.temperature_change_step);
    }

    if hour == DAY_SNAP_HOUR {
        state.weather.temperature = state.temperature_daytime;
        state.temperature_nighttime = state
            .temperature_daytime
            .saturating_sub(NIGHT_DROP.roll(dice));
        state.temperature_change_step =
            state.temperature_nighttime.saturating_sub(state.temperature_daytime) / 4;
    } else if hour == NIGHT_SNAP_HOUR {
        state.weather.temperature = state.temperature_nighttime;
        state.temperature_daytime = state
            .temperature_general
            .saturating_add(DAILY_VARIATION.roll(dice));
        state.temperature_change_step =
            state.temperature_daytime.saturating_sub(state.temperature_nighttime) / 4;
    }
}

fn update_precipitation(state: &mut GeneratorState) {
    state.current_precipitation_duration = state.current_precipitation_duration.saturating_sub(1);
    if state.current_precipitation_duration == 0 {
        state.weather.precipitation_state.clear();
    }

    let queued = &state.queued_precipitation;
    if state.hour == queued.start_hour && queued.duration > 0 {
        state.weather.precipitation_state.clone_from(&queued.kind);
        state.current_precipitation_duration = queued.duration;
    }

    state.weather.precipitation_duration = state.current_precipitation_duration;
}

fn roll_wind_and_clouds<D: DiceRoller>(
    tables: &ClimateTables,
    dice: &mut D,
    state: &mut GeneratorState,
) {
    state.weather.wind_direction = WIND_DIRECTION.roll(dice).rem_euclid(360);

    state.wind_speed_class = match tables.wind_speed_table().roll(dice) {
        Ok((class, _)) => class,
        Err(miss) => {
            log_miss(&miss);
            0
        }
    };

    state.cloud_cover_type = match tables.cloud_cover_table().roll(dice) {
        Ok((class, _)) => class,
        Err(miss) => {
            log_miss(&miss);
            0
        }
    };
}

/// Minimum cloud class forced by active, recently ended, or imminent
/// precipitation.
fn cloud_floor(state: &GeneratorState) -> i32 {
    let countdown = state.current_precipitation_duration;
    let mut floor = if countdown > 0 {
        PRECIPITATION_CLOUD_FLOOR
    } else if countdown > -PRECIPITATION_CLOUD_FLOOR {
        PRECIPITATION_CLOUD_FLOOR.saturating_sub(1).saturating_add(countdown)
    } else {
        0
    };

    let until_start = state.queued_precipitation.start_hour.saturating_sub(state.hour);
    if until_start > 0 && until_start <= LEAD_IN_HOURS {
        floor = floor.max(LEAD_IN_HOURS.saturating_sub(until_start));
    }
    floor
}

fn emit<D: DiceRoller>(tables: &ClimateTables, dice: &mut D, state: &mut GeneratorState) {
    let cloud_floor = cloud_floor(state);
    let wind_floor = if state.queued_precipitation.is_thunderstorm() {
        cloud_floor.saturating_sub(1)
    } else {
        0
    };

    let cloud_class = state
        .cloud_cover_type
        .max(usize::try_from(cloud_floor).unwrap_or(0));
    state.weather.cloud_cover = tables.cloud_cover_label(cloud_class).to_owned();

    let wind_table = tables.wind_speed_table();
    let wind_class = state
        .wind_speed_class
        .max(usize::try_from(wind_floor).unwrap_or(0))
        .min(wind_table.len().saturating_sub(1));
    match wind_table.row(wind_class) {
        Some(row) => {
            state.weather.wind_strength.clone_from(&row.strength);
            state.weather.wind_speed = row.speed.roll(dice);
        }
        None => {
            warn!(class = wind_class, "Wind table is empty");
            state.weather.wind_strength.clear();
            state.weather.wind_speed = 0;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::climate::{PrecipitationRow, TemperatureVariation, WindRow};
    use crate::dice::{RngDice, ScriptedDice};
    use crate::table::PercentileTable;

    fn engine(draws: Vec<u32>) -> WeatherEngine<ScriptedDice> {
        WeatherEngine::new(ScriptedDice::new(draws))
    }

    /// Temperate summer lowland state one hour before the daily reset.
    /// Precipitation chance is 60% and the intensity table is "medium".
    fn before_midnight(temperature: i32, refresh_timer: i32) -> GeneratorState {
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.weather.temperature = temperature;
        state.temperature_general = 70;
        state.temperature_nighttime = 66;
        state.temperature_refresh_timer = refresh_timer;
        state
    }

    #[test]
    fn initialize_lands_on_the_requested_hour() {
        let mut e = WeatherEngine::new(RngDice::seeded(1));
        e.initialize(Season::Summer, Climate::Temperate, 1500, 15);
        assert_eq!(e.state().hour, 15);
        e.initialize(Season::Summer, Climate::Temperate, 1500, 0);
        assert_eq!(e.state().hour, 0);
    }

    #[test]
    fn temperate_summer_afternoon_is_plausible() {
        for seed in 0..50 {
            let mut afternoon = WeatherEngine::new(RngDice::seeded(seed));
            let w = afternoon.initialize(Season::Summer, Climate::Temperate, 1500, 15);
            assert!(
                (45..=115).contains(&w.temperature),
                "seed {seed}: {}",
                w.temperature
            );

            // Same rolls, stopped at the midnight that opened this day.
            let mut midnight = WeatherEngine::new(RngDice::seeded(seed));
            let carried = midnight
                .initialize(Season::Summer, Climate::Temperate, 1500, 0)
                .precipitation_duration;

            let queued = &afternoon.state().queued_precipitation;
            let started_today = queued.duration > 0 && (0..=15).contains(&queued.start_hour);
            let expected = if started_today {
                queued.duration.saturating_sub(15_i32.saturating_sub(queued.start_hour))
            } else {
                carried.saturating_sub(15)
            };
            assert_eq!(w.precipitation_duration, expected, "seed {seed}");
            if w.precipitation_duration <= 0 {
                assert!(!w.is_precipitating(), "seed {seed}");
            }
        }
    }

    #[test]
    fn advance_wraps_the_hour_cursor() {
        let mut e = WeatherEngine::new(RngDice::seeded(3));
        e.initialize(Season::Winter, Climate::Cold, 200, 23);
        e.advance();
        assert_eq!(e.state().hour, 0);
        e.advance();
        assert_eq!(e.state().hour, 1);
    }

    #[test]
    fn day_snap_sets_night_target_and_step() {
        let mut e = engine(vec![1, 1, 1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 8;
        state.temperature_daytime = 70;
        state.temperature_general = 70;
        state.temperature_refresh_timer = 5;
        state.queued_precipitation = QueuedPrecipitation::none();
        e.set_state(state);

        let w = e.advance();
        assert_eq!(e.state().hour, 9);
        assert_eq!(w.temperature, 70);
        assert_eq!(e.state().temperature_nighttime, 65);
        assert_eq!(e.state().temperature_change_step, -1);
        assert_eq!(w.wind_speed, 2);
        assert_eq!(w.wind_strength, "Light winds");
    }

    #[test]
    fn daily_reset_queues_precipitation_when_draw_is_within_chance() {
        // 60 schedules, 35 picks "Rain" (1d4), 3 is the duration, 5 is the
        // start hour 4, then direction, wind, clouds, and wind speed.
        let mut e = engine(vec![60, 35, 3, 5, 1, 1, 1, 1]);
        e.set_state(before_midnight(70, 5));

        e.advance();
        assert_eq!(e.state().hour, 0);
        assert_eq!(e.state().queued_precipitation, QueuedPrecipitation {
            kind: "Rain".to_owned(),
            start_hour: 4,
            duration: 3,
        });
        assert_eq!(e.state().temperature_refresh_timer, 4);
        assert_eq!(e.state().temperature_general, 70);
        assert_eq!(e.dice_mut().position(), 8);
    }

    #[test]
    fn daily_reset_clears_the_queue_when_draw_exceeds_chance() {
        let mut e = engine(vec![61, 1, 1, 1, 1]);
        let mut state = before_midnight(70, 5);
        state.queued_precipitation = QueuedPrecipitation {
            kind: "Rain".to_owned(),
            start_hour: 4,
            duration: 3,
        };
        e.set_state(state);

        e.advance();
        assert_eq!(e.state().queued_precipitation, QueuedPrecipitation::none());
        assert_eq!(e.state().queued_precipitation.start_hour, almanac_types::NO_QUEUED_START);
        assert_eq!(e.dice_mut().position(), 5);
    }

    #[test]
    fn daily_reset_uses_the_frozen_table_below_freezing() {
        // 50 lands on row 4 in both medium tables; the start hour roll of 1
        // starts the precipitation at midnight.
        let script = vec![60, 50, 2, 1, 1, 1, 1, 1];

        let mut cold = engine(script.clone());
        cold.set_state(before_midnight(FREEZING_POINT_F.saturating_sub(1), 5));
        let w = cold.advance();
        assert_eq!(cold.state().queued_precipitation.kind, "Medium snow");
        assert_eq!(cold.state().queued_precipitation.start_hour, 0);
        assert_eq!(w.precipitation_state, "Medium snow");
        assert_eq!(w.precipitation_duration, 2);

        let mut mild = engine(script);
        mild.set_state(before_midnight(FREEZING_POINT_F, 5));
        let w = mild.advance();
        assert_eq!(w.precipitation_state, "Rain");
        assert_eq!(w.precipitation_duration, 2);
    }

    #[test]
    fn expired_refresh_timer_rerolls_general_and_daytime() {
        // 61 skips precipitation. 50 picks the 0d10 variation row with a
        // 1d6+1 day duration (4 -> 5 days), then 6 + 6 - 7 = +5 for the day.
        let mut e = engine(vec![61, 50, 4, 6, 6, 1, 1, 1, 1]);
        e.set_state(before_midnight(70, 1));

        e.advance();
        let state = e.state();
        assert_eq!(state.temperature_general, 80);
        assert_eq!(state.temperature_refresh_timer, 5);
        assert_eq!(state.temperature_daytime, 85);
        // (85 - 66) / 4 truncates to 4.
        assert_eq!(state.temperature_change_step, 4);
        assert_eq!(e.dice_mut().position(), 9);
    }

    #[test]
    fn precipitation_table_miss_queues_an_unlabelled_hour() {
        let short = PercentileTable::new(
            "short medium precipitation",
            vec![(10, PrecipitationRow {
                label: "Rain".to_owned(),
                duration: DiceExpr::new(1, 4, 0),
            })],
        );
        let tables = ClimateTables::standard().with_precipitation_table(1, false, short);
        let mut e = WeatherEngine::with_tables(
            Arc::new(tables),
            ScriptedDice::new(vec![60, 50, 5, 1, 1, 1, 1]),
        );
        e.set_state(before_midnight(70, 5));

        e.advance();
        assert_eq!(e.state().queued_precipitation, QueuedPrecipitation {
            kind: String::new(),
            start_hour: 4,
            duration: 1,
        });
    }

    #[test]
    fn variation_table_miss_keeps_the_baseline_for_a_day() {
        let short = PercentileTable::new(
            "short temperate variation",
            vec![(10, TemperatureVariation {
                delta: DiceExpr::new(1, 10, 0),
                duration_days: DiceExpr::new(1, 4, 0),
            })],
        );
        let tables = ClimateTables::standard().with_temperature_variation_table(Climate::Temperate, short);
        let mut e = WeatherEngine::with_tables(
            Arc::new(tables),
            ScriptedDice::new(vec![61, 50, 6, 6, 1, 1, 1, 1]),
        );
        e.set_state(before_midnight(70, 1));

        e.advance();
        let state = e.state();
        assert_eq!(state.temperature_general, 80);
        assert_eq!(state.temperature_refresh_timer, 1);
        assert_eq!(state.temperature_daytime, 85);
        assert_eq!(e.dice_mut().position(), 8);
    }

    #[test]
    fn night_snap_sets_day_target_and_step() {
        let mut e = engine(vec![6, 5, 1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 20;
        state.weather.temperature = 65;
        state.temperature_general = 70;
        state.temperature_nighttime = 61;
        state.temperature_change_step = 2;
        e.set_state(state);

        let w = e.advance();
        assert_eq!(e.state().hour, 21);
        assert_eq!(w.temperature, 61);
        assert_eq!(e.state().temperature_daytime, 74);
        // (74 - 61) / 4 truncates to 3.
        assert_eq!(e.state().temperature_change_step, 3);
    }

    #[test]
    fn night_snap_step_truncates_toward_zero() {
        let mut e = engine(vec![1, 1, 1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 20;
        state.temperature_general = 70;
        state.temperature_nighttime = 68;
        e.set_state(state);

        e.advance();
        assert_eq!(e.state().temperature_daytime, 65);
        // -3 / 4 is 0, not -1.
        assert_eq!(e.state().temperature_change_step, 0);
    }

    #[test]
    fn evening_ramp_walks_down_to_the_night_snap() {
        let mut e = engine(vec![1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 17;
        state.weather.temperature = 80;
        state.temperature_change_step = -4;
        state.temperature_general = 70;
        state.temperature_nighttime = 64;
        e.set_state(state);

        let temps: Vec<i32> = (0..4).map(|_| e.advance().temperature).collect();
        // hours 18, 19, 20, 21(snap to nighttime)
        assert_eq!(temps, vec![76, 72, 68, 64]);
    }

    #[test]
    fn ramps_only_move_in_ramp_hours() {
        let mut e = engine(vec![1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 4;
        state.weather.temperature = 60;
        state.temperature_change_step = 3;
        e.set_state(state);

        let temps: Vec<i32> = (0..5).map(|_| e.advance().temperature).collect();
        // hours 5, 6, 7, 8, 9(snap to daytime 0)
        assert_eq!(temps, vec![60, 63, 66, 69, 0]);
    }

    #[test]
    fn queued_precipitation_starts_and_stops() {
        let mut e = engine(vec![1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 2;
        state.queued_precipitation = QueuedPrecipitation {
            kind: "Rain".to_owned(),
            start_hour: 4,
            duration: 2,
        };
        e.set_state(state);

        let w3 = e.advance();
        assert!(!w3.is_precipitating());
        assert_eq!(w3.cloud_cover, "Medium clouds");

        let w4 = e.advance();
        assert_eq!(w4.precipitation_state, "Rain");
        assert_eq!(w4.precipitation_duration, 2);
        assert_eq!(w4.cloud_cover, "Overcast");

        let w5 = e.advance();
        assert_eq!(w5.precipitation_duration, 1);
        assert!(w5.is_precipitating());

        let w6 = e.advance();
        assert_eq!(w6.precipitation_duration, 0);
        assert!(!w6.is_precipitating());
        assert_eq!(w6.cloud_cover, "Medium clouds");

        let w7 = e.advance();
        assert_eq!(w7.cloud_cover, "Light clouds");
        let w8 = e.advance();
        assert_eq!(w8.cloud_cover, "None");
    }

    #[test]
    fn thunderstorm_raises_the_wind_floor() {
        let mut e = engine(vec![1]);
        let mut state = GeneratorState::fresh(Season::Summer, Climate::Temperate, 1500);
        state.hour = 10;
        state.current_precipitation_duration = 3;
        state.queued_precipitation = QueuedPrecipitation {
            kind: "Thunderstorm".to_owned(),
            start_hour: 8,
            duration: 3,
        };
        e.set_state(state);

        let w = e.advance();
        assert_eq!(w.cloud_cover, "Overcast");
        assert_eq!(w.wind_strength, "Strong winds");
        // Rolled classes are not overwritten by the floors.
        assert_eq!(e.state().wind_speed_class, 0);
        assert_eq!(e.state().cloud_cover_type, 0);
    }

    #[test]
    fn duration_zero_always_means_no_label() {
        let mut e = WeatherEngine::new(RngDice::seeded(11));
        e.initialize(Season::Fall, Climate::Tropical, 100, 0);
        for _ in 0..(24 * 60) {
            let w = e.advance();
            if w.precipitation_duration <= 0 {
                assert!(!w.is_precipitating());
            }
            assert!((0..360).contains(&w.wind_direction));
            assert!(e.state().cloud_cover_type <= 3);
        }
    }

    #[test]
    fn label_clears_whenever_duration_runs_out() {
        for seed in 0..200 {
            let mut e = WeatherEngine::new(RngDice::seeded(seed));
            e.initialize(Season::Spring, Climate::Tropical, 100, 0);
            for _ in 0..(24 * 30) {
                let w = e.advance();
                if w.precipitation_duration <= 0 {
                    assert!(
                        w.precipitation_state.is_empty(),
                        "seed {seed}: {} with duration {}",
                        w.precipitation_state,
                        w.precipitation_duration
                    );
                }
            }
        }
    }

    #[test]
    fn same_seed_same_weather() {
        let mut a = WeatherEngine::new(RngDice::seeded(42));
        let mut b = WeatherEngine::new(RngDice::seeded(42));
        assert_eq!(
            a.initialize(Season::Spring, Climate::Desert, 3000, 6),
            b.initialize(Season::Spring, Climate::Desert, 3000, 6)
        );
        for _ in 0..200 {
            assert_eq!(a.advance(), b.advance());
        }
    }

    #[test]
    fn resuming_from_a_snapshot_matches_a_straight_run() {
        let mut straight = engine(vec![37, 81, 5, 64, 12, 99, 50]);
        straight.initialize(Season::Winter, Climate::Cold, 600, 5);
        let snapshot = straight.state().clone();
        let expected: Vec<Weather> = (0..48).map(|_| straight.advance()).collect();

        let mut resumed = engine(vec![37, 81, 5, 64, 12, 99, 50]);
        resumed.initialize(Season::Winter, Climate::Cold, 600, 5);
        resumed.set_state(snapshot);
        let actual: Vec<Weather> = (0..48).map(|_| resumed.advance()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn short_table_falls_back_instead_of_panicking() {
        let short_wind = PercentileTable::new(
            "short wind",
            vec![(50, WindRow {
                strength: "Light winds".to_owned(),
                speed: DiceExpr::new(1, 11, 1),
            })],
        );
        let tables = ClimateTables::standard().with_wind_speed_table(short_wind);
        let mut e = WeatherEngine::with_tables(Arc::new(tables), ScriptedDice::constant(100));
        let w = e.initialize(Season::Summer, Climate::Temperate, 1500, 0);
        assert_eq!(e.state().wind_speed_class, 0);
        assert_eq!(w.wind_strength, "Light winds");
        assert_eq!(w.wind_speed, 12);
    }
}
