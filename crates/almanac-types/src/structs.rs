//! Core value types for the Almanac simulation.
//!
//! Persisted types carry an explicit, stable field list. Field names match
//! the save-file record shapes, so renaming a Rust field is a schema change.

use core::fmt;
use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::enums::{Climate, Season, SymbolSet};
use crate::ids::EventId;

/// Label of the precipitation type that raises the wind floor.
pub const THUNDERSTORM: &str = "Thunderstorm";

/// Queue start hour that can never match an hour-of-day cursor.
pub const NO_QUEUED_START: i32 = -10;

/// Wind speed (mph) above which the wind warning shows.
const HIGH_WIND_MPH: i32 = 20;

/// Wind speed (mph) above which the general warning shows.
const SEVERE_WIND_MPH: i32 = 50;

/// Temperatures (Fahrenheit) outside this range get a temperature warning.
const COLD_WARNING_F: i32 = 32;
const HOT_WARNING_F: i32 = 90;

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// The weather at one specific hour.
///
/// Temperatures are Fahrenheit internally because the climate tables are
/// written in Fahrenheit; use [`Weather::temperature_celsius`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    /// Temperature in degrees Fahrenheit.
    pub temperature: i32,
    /// Active precipitation label, empty when there is none.
    pub precipitation_state: String,
    /// Hours of precipitation remaining. Zero or negative once it stopped;
    /// negative values count the hours since it stopped.
    pub precipitation_duration: i32,
    /// Wind direction in degrees, `[0, 360)`.
    pub wind_direction: i32,
    /// Wind strength classification label.
    pub wind_strength: String,
    /// Wind speed in miles per hour.
    pub wind_speed: i32,
    /// Cloud cover label.
    pub cloud_cover: String,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            temperature: 0,
            precipitation_state: String::new(),
            precipitation_duration: 0,
            wind_direction: 0,
            wind_strength: String::new(),
            wind_speed: 0,
            cloud_cover: "None".to_owned(),
        }
    }
}

impl Weather {
    /// Temperature in degrees Celsius.
    pub fn temperature_celsius(&self) -> f64 {
        (f64::from(self.temperature) - 32.0) / 1.8
    }

    /// Wind speed in metres per second.
    pub fn wind_speed_ms(&self) -> f64 {
        f64::from(self.wind_speed) * 0.447_04
    }

    /// Whether any precipitation is falling this hour.
    pub fn is_precipitating(&self) -> bool {
        !self.precipitation_state.is_empty()
    }

    /// Wind direction normalized into `[0, 360)`.
    pub const fn normalized_direction(&self) -> i32 {
        self.wind_direction.rem_euclid(360)
    }

    /// Eight-point compass label for the wind direction.
    pub const fn compass(&self) -> &'static str {
        let d = self.normalized_direction();
        let north = d >= 293 || d < 67;
        let south = d >= 113 && d < 247;
        let east = d > 23 && d < 157;
        let west = d > 203 && d < 337;
        match (north, south, east, west) {
            (true, _, true, _) => "North-East",
            (true, _, _, true) => "North-West",
            (true, _, _, _) => "North",
            (_, true, true, _) => "South-East",
            (_, true, _, true) => "South-West",
            (_, true, _, _) => "South",
            (_, _, true, _) => "East",
            _ => "West",
        }
    }

    /// Compass label abbreviated to its initials, e.g. `"NE"`.
    pub fn wind_direction_short(&self) -> &'static str {
        match self.compass() {
            "North" => "N",
            "North-East" => "NE",
            "East" => "E",
            "South-East" => "SE",
            "South" => "S",
            "South-West" => "SW",
            "West" => "W",
            _ => "NW",
        }
    }

    /// Arrow pointing the way the compass label reads.
    pub fn wind_direction_arrow(&self) -> &'static str {
        match self.compass() {
            "North" => "↑",
            "North-East" => "↗",
            "East" => "→",
            "South-East" => "↘",
            "South" => "↓",
            "South-West" => "↙",
            "West" => "←",
            _ => "↖",
        }
    }

    /// Four fixed columns of warning marks, blank where nothing applies:
    ///
    /// 1. general (`!`): wind above 50 mph or a thunderstorm
    /// 2. wind (`W`): wind above 20 mph
    /// 3. temperature (`T`): below 32 °F or above 90 °F
    /// 4. precipitation: `F` fog, `S` thunderstorm, `R` anything else
    pub fn warning_symbols(&self, symbols: SymbolSet) -> String {
        let pick = |ascii: &'static str, unicode: &'static str| match symbols {
            SymbolSet::Ascii => ascii,
            SymbolSet::Unicode => unicode,
        };
        let precipitation = self.precipitation_state.to_lowercase();

        let general = if self.wind_speed > SEVERE_WIND_MPH || self.precipitation_state == THUNDERSTORM
        {
            pick("!", "⚠")
        } else {
            " "
        };
        let wind = if self.wind_speed > HIGH_WIND_MPH {
            pick("W", "➢")
        } else {
            " "
        };
        let temperature = if self.temperature < COLD_WARNING_F {
            pick("T", "❄")
        } else if self.temperature > HOT_WARNING_F {
            pick("T", "🌡")
        } else {
            " "
        };
        let falling = if precipitation.contains("fog") {
            pick("F", "🌫")
        } else if precipitation.contains("thunderstorm") {
            pick("S", "⛈")
        } else if self.is_precipitating() {
            pick("R", "🌧")
        } else {
            " "
        };

        [general, wind, temperature, falling].concat()
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5.1} C", self.temperature_celsius())?;
        if self.is_precipitating() {
            write!(
                f,
                ", {} [{}]",
                self.precipitation_state, self.precipitation_duration
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Generator state
// ---------------------------------------------------------------------------

/// Precipitation rolled at the daily reset, waiting for its start hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedPrecipitation {
    /// Precipitation label, empty when nothing is queued.
    pub kind: String,
    /// Hour of day at which it starts. [`NO_QUEUED_START`] when nothing is queued.
    pub start_hour: i32,
    /// Duration in hours once started.
    pub duration: i32,
}

impl QueuedPrecipitation {
    /// An empty queue that can never trigger.
    pub fn none() -> Self {
        Self {
            kind: String::new(),
            start_hour: NO_QUEUED_START,
            duration: 0,
        }
    }

    /// Whether the queued precipitation is a thunderstorm.
    pub fn is_thunderstorm(&self) -> bool {
        self.kind == THUNDERSTORM
    }
}

impl Default for QueuedPrecipitation {
    fn default() -> Self {
        Self::none()
    }
}

/// The full working set the weather engine carries from one hour to the next.
///
/// A copy is stored with every generated hour so generation can resume from
/// any cached point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorState {
    /// Season used for table lookups.
    pub season: Season,
    /// Climate used for table lookups.
    pub climate: Climate,
    /// Elevation in feet.
    pub elevation: i32,
    /// Hour-of-day cursor, `0..=23`.
    pub hour: i32,
    /// The weather produced by the most recent advance.
    pub weather: Weather,

    /// Multi-day general temperature.
    pub temperature_general: i32,
    /// Target daytime temperature.
    pub temperature_daytime: i32,
    /// Target nighttime temperature.
    pub temperature_nighttime: i32,
    /// Per-hour interpolation step during the morning and evening ramps.
    pub temperature_change_step: i32,
    /// Days until the general temperature is re-rolled.
    pub temperature_refresh_timer: i32,

    /// Countdown of the active precipitation.
    pub current_precipitation_duration: i32,
    /// Precipitation waiting for its start hour.
    pub queued_precipitation: QueuedPrecipitation,

    /// Rolled wind speed class (row of the wind table).
    pub wind_speed_class: usize,
    /// Rolled cloud cover class, `0..=3`.
    pub cloud_cover_type: usize,
}

impl GeneratorState {
    /// A zeroed state at hour 23, ready for warm-up.
    pub fn fresh(season: Season, climate: Climate, elevation: i32) -> Self {
        Self {
            season,
            climate,
            elevation,
            hour: 23,
            weather: Weather::default(),
            temperature_general: 0,
            temperature_daytime: 0,
            temperature_nighttime: 0,
            temperature_change_step: 0,
            temperature_refresh_timer: 0,
            current_precipitation_duration: 0,
            queued_precipitation: QueuedPrecipitation::none(),
            wind_speed_class: 0,
            cloud_cover_type: 0,
        }
    }
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self::fresh(Season::default(), Climate::default(), 0)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A campaign event spanning one or more hours of the timeline.
///
/// Equality is by identity: two events with the same id are the same event
/// even if their text or timing differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique, stable identity.
    pub id: EventId,
    /// Where the event happens.
    pub location: String,
    /// What happens.
    pub description: String,
    /// First epoch hour of the event.
    pub start_time_epoch: i64,
    /// Length in hours, at least 1.
    pub duration: u32,
    /// Marker used by editing front ends; never persisted.
    #[serde(skip)]
    pub pending_delete: bool,
}

impl Event {
    /// Create an event with a fresh id. Durations below one hour become one hour.
    pub fn new(
        location: impl Into<String>,
        description: impl Into<String>,
        start_time_epoch: i64,
        duration: u32,
    ) -> Self {
        Self {
            id: EventId::new(),
            location: location.into(),
            description: description.into(),
            start_time_epoch,
            duration: duration.max(1),
            pending_delete: false,
        }
    }

    /// First epoch hour after the event.
    pub fn end_time_epoch(&self) -> i64 {
        self.start_time_epoch
            .saturating_add(i64::from(self.duration.max(1)))
    }

    /// The epoch hours the event covers, `[start, start + duration)`.
    pub fn hours(&self) -> Range<i64> {
        self.start_time_epoch..self.end_time_epoch()
    }

    /// Whether the event covers the given epoch hour.
    pub fn covers(&self, hour: i64) -> bool {
        self.hours().contains(&hour)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

// ---------------------------------------------------------------------------
// Hour
// ---------------------------------------------------------------------------

/// Everything known about a single cached hour of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hour {
    /// Epoch hour key.
    pub time_from_epoch: i64,
    /// Weather during this hour.
    pub weather: Weather,
    /// Generator state that produced [`Hour::weather`].
    pub generator_state: GeneratorState,
    /// Events overlapping this hour.
    pub events: Vec<Event>,
}

impl Hour {
    /// Create an hour with no events.
    pub const fn new(time_from_epoch: i64, weather: Weather, generator_state: GeneratorState) -> Self {
        Self {
            time_from_epoch,
            weather,
            generator_state,
            events: Vec::new(),
        }
    }

    /// Whether an event with the given id is attached to this hour.
    pub fn has_event(&self, id: EventId) -> bool {
        self.events.iter().any(|e| e.id == id)
    }
}

// ---------------------------------------------------------------------------
// Calendar dates
// ---------------------------------------------------------------------------

/// A named day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weekday {
    /// Zero-based position in the week.
    pub index: usize,
    /// Full name.
    pub name: String,
    /// Short form.
    pub abbreviation: String,
}

/// An epoch hour expressed in one calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    /// Name of the calendar this date belongs to.
    pub calendar: String,
    /// Zero-based year within the era. Negative before reckoning.
    pub year: i64,
    /// Era index; 0 is "before reckoning".
    pub era: usize,
    /// Number of era boundaries the calendar defines.
    pub num_eras: usize,
    /// One-based month number.
    pub month: u32,
    /// Month name.
    pub month_name: String,
    /// One-based day of the month.
    pub day_of_month: u32,
    /// Weekday, when the calendar has weeks.
    pub weekday: Option<Weekday>,
    /// Hour of day, `0..=23`.
    pub hour: u32,
}

impl DateInfo {
    /// Year as shown to people. Years in an era count from 1; years before
    /// reckoning count backwards from 1.
    pub const fn display_year(&self) -> i64 {
        if self.era > 0 {
            self.year.saturating_add(1)
        } else {
            self.year.saturating_abs()
        }
    }

    /// Era label: `BR` before reckoning, empty for single-era calendars,
    /// `{era}E` otherwise.
    pub fn era_label(&self) -> String {
        if self.era == 0 {
            "BR".to_owned()
        } else if self.num_eras == 1 {
            String::new()
        } else {
            format!("{}E", self.era)
        }
    }

    /// Time of day as `HH:00`.
    pub fn time_string(&self) -> String {
        format!("{:0>2}:00", self.hour)
    }

    /// Compact date, `day.month.{era}year`.
    pub fn short_date(&self, delimiter: &str) -> String {
        format!(
            "{day}{delimiter}{month}{delimiter}{era}{year}",
            day = self.day_of_month,
            month = self.month,
            era = self.era_label(),
            year = self.display_year(),
        )
    }

    /// Long date such as `Gondag, 1 of Sharis, 1`.
    pub fn long_date(&self, short_weekday: bool) -> String {
        let weekday = self.weekday.as_ref().map_or_else(String::new, |w| {
            if short_weekday {
                format!("{}, ", w.abbreviation)
            } else {
                format!("{}, ", w.name)
            }
        });
        let era = self.era_label();
        let year = if era.is_empty() {
            self.display_year().to_string()
        } else {
            format!("{era} {}", self.display_year())
        };
        format!(
            "{weekday}{day} of {month}, {year}",
            day = self.day_of_month,
            month = self.month_name,
        )
    }

    /// Time and long date together.
    pub fn datetime_string(&self) -> String {
        format!("{} {}", self.time_string(), self.long_date(false))
    }
}

impl fmt::Display for DateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.datetime_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_date(era: usize, num_eras: usize, year: i64) -> DateInfo {
        DateInfo {
            calendar: "human".to_owned(),
            year,
            era,
            num_eras,
            month: 3,
            month_name: "Sunus".to_owned(),
            day_of_month: 14,
            weekday: Some(Weekday {
                index: 2,
                name: "Waudag".to_owned(),
                abbreviation: "Wau.".to_owned(),
            }),
            hour: 7,
        }
    }

    #[test]
    fn event_equality_is_by_identity() {
        let a = Event::new("Denford", "Market day", 100, 4);
        let mut moved = a.clone();
        moved.start_time_epoch = 500;
        moved.description = "Market day (moved)".to_owned();
        assert_eq!(a, moved);
        assert_ne!(a, Event::new("Denford", "Market day", 100, 4));
    }

    #[test]
    fn event_duration_is_at_least_one_hour() {
        let e = Event::new("Nowhere", "Blink", 10, 0);
        assert_eq!(e.duration, 1);
        assert_eq!(e.hours(), 10..11);
        assert!(e.covers(10));
        assert!(!e.covers(11));
    }

    #[test]
    fn event_serializes_without_pending_delete() {
        let mut e = Event::new("Denford", "Test event", 42, 2);
        e.pending_delete = true;
        let value = serde_json::to_value(&e).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys.len(),
            5,
            "unexpected persisted fields: {keys:?}"
        );
        assert!(value.get("pending_delete").is_none());
        let restored: Event = serde_json::from_value(value).unwrap();
        assert!(!restored.pending_delete);
        assert_eq!(restored.start_time_epoch, 42);
    }

    #[test]
    fn compass_covers_all_eight_points() {
        let cases = [
            (0, "North"),
            (45, "North-East"),
            (90, "East"),
            (135, "South-East"),
            (180, "South"),
            (225, "South-West"),
            (270, "West"),
            (315, "North-West"),
            (-45, "North-West"),
            (720, "North"),
        ];
        for (direction, expected) in cases {
            let w = Weather {
                wind_direction: direction,
                ..Weather::default()
            };
            assert_eq!(w.compass(), expected, "direction {direction}");
        }
    }

    #[test]
    fn direction_short_and_arrow_follow_the_compass() {
        let cases = [
            (0, "N", "↑"),
            (45, "NE", "↗"),
            (90, "E", "→"),
            (135, "SE", "↘"),
            (180, "S", "↓"),
            (225, "SW", "↙"),
            (270, "W", "←"),
            (315, "NW", "↖"),
        ];
        for (direction, short, arrow) in cases {
            let w = Weather {
                wind_direction: direction,
                ..Weather::default()
            };
            assert_eq!(w.wind_direction_short(), short, "direction {direction}");
            assert_eq!(w.wind_direction_arrow(), arrow, "direction {direction}");
        }
    }

    #[test]
    fn calm_mild_weather_has_blank_warnings() {
        let w = Weather {
            temperature: 65,
            wind_speed: 20,
            ..Weather::default()
        };
        assert_eq!(w.warning_symbols(SymbolSet::Ascii), "    ");
        assert_eq!(w.warning_symbols(SymbolSet::Unicode), "    ");
    }

    #[test]
    fn warnings_fill_their_own_columns() {
        let storm = Weather {
            temperature: 95,
            wind_speed: 35,
            precipitation_state: THUNDERSTORM.to_owned(),
            precipitation_duration: 2,
            ..Weather::default()
        };
        assert_eq!(storm.warning_symbols(SymbolSet::Ascii), "!WTS");
        assert_eq!(storm.warning_symbols(SymbolSet::Unicode), "⚠➢🌡⛈");

        let foggy_frost = Weather {
            temperature: 31,
            precipitation_state: "Heavy fog".to_owned(),
            precipitation_duration: 4,
            ..Weather::default()
        };
        assert_eq!(foggy_frost.warning_symbols(SymbolSet::Ascii), "  TF");
        assert_eq!(foggy_frost.warning_symbols(SymbolSet::Unicode), "  ❄🌫");

        let gale = Weather {
            temperature: 50,
            wind_speed: 51,
            precipitation_state: "Light rain".to_owned(),
            precipitation_duration: 1,
            ..Weather::default()
        };
        assert_eq!(gale.warning_symbols(SymbolSet::Ascii), "!W R");
    }

    #[test]
    fn weather_display_mentions_precipitation() {
        let mut w = Weather {
            temperature: 212,
            ..Weather::default()
        };
        assert_eq!(w.to_string(), "100.0 C");
        w.precipitation_state = "Rain".to_owned();
        w.precipitation_duration = 3;
        assert_eq!(w.to_string(), "100.0 C, Rain [3]");
    }

    #[test]
    fn display_year_and_era_labels() {
        let single = sample_date(1, 1, 1393);
        assert_eq!(single.display_year(), 1394);
        assert_eq!(single.era_label(), "");
        assert_eq!(single.short_date("."), "14.3.1394");
        assert_eq!(single.long_date(false), "Waudag, 14 of Sunus, 1394");
        assert_eq!(single.datetime_string(), "07:00 Waudag, 14 of Sunus, 1394");

        let second_era = sample_date(2, 2, 0);
        assert_eq!(second_era.short_date("."), "14.3.2E1");
        assert_eq!(second_era.long_date(true), "Wau., 14 of Sunus, 2E 1");

        let before = sample_date(0, 1, -12);
        assert_eq!(before.display_year(), 12);
        assert_eq!(before.short_date("/"), "14/3/BR12");
    }

    #[test]
    fn fresh_state_starts_at_hour_23_with_empty_queue() {
        let state = GeneratorState::fresh(Season::Winter, Climate::Cold, 200);
        assert_eq!(state.hour, 23);
        assert_eq!(state.queued_precipitation, QueuedPrecipitation::none());
        assert!(!state.queued_precipitation.is_thunderstorm());
    }
}
