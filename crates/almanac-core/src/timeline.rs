//! The lazy weather timeline.
//!
//! The timeline caches generated hours keyed by epoch hour and only
//! generates what is asked for. A cache miss fills a window of `margin`
//! hours on either side of the requested hour:
//!
//! - **Resume** -- when a cached hour lies at most `margin` hours before
//!   the request, generation continues from that hour's stored generator
//!   state, so the weather flows on without a seam.
//! - **Cold start** -- otherwise the engine is initialized at
//!   `hour - margin` and the whole window is generated fresh.
//!
//! Both paths stop at the first hour that is already cached; `get` never
//! overwrites history. Only [`Timeline::regenerate`] rewrites cached weather,
//! and it never touches events.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use almanac_types::{Climate, Event, EventId, Hour, Weather};
use almanac_weather::{DiceRoller, WeatherEngine};
use tracing::{debug, info};

use crate::persist::{CalendarSave, PersistError, SAVE_FORMAT_VERSION};
use crate::reckoning::{HOURS_PER_DAY, ReckoningEngine, ReckoningError};

/// Hours generated on either side of a requested hour unless configured.
pub const DEFAULT_MARGIN_HOURS: i64 = 72;

/// Errors that can occur while materializing the timeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// Season lookup failed.
    #[error(transparent)]
    Reckoning(#[from] ReckoningError),

    /// A window fill finished without producing the requested hour.
    #[error("hour {hour} is missing after a window fill")]
    MissingHour {
        /// The requested epoch hour.
        hour: i64,
    },
}

/// Sparse, lazily generated weather history with attached events.
#[derive(Debug)]
pub struct Timeline<D> {
    history: BTreeMap<i64, Hour>,
    reckoning: Arc<ReckoningEngine>,
    engine: WeatherEngine<D>,
    climate: Climate,
    elevation: i32,
    margin: i64,
}

impl<D: DiceRoller> Timeline<D> {
    /// Create an empty timeline with the default margin.
    pub fn new(reckoning: Arc<ReckoningEngine>, dice: D, climate: Climate, elevation: i32) -> Self {
        Self::with_engine(reckoning, WeatherEngine::new(dice), climate, elevation)
    }

    /// Create an empty timeline around an existing engine.
    pub const fn with_engine(
        reckoning: Arc<ReckoningEngine>,
        engine: WeatherEngine<D>,
        climate: Climate,
        elevation: i32,
    ) -> Self {
        Self {
            history: BTreeMap::new(),
            reckoning,
            engine,
            climate,
            elevation,
            margin: DEFAULT_MARGIN_HOURS,
        }
    }

    /// Set the window margin. Negative margins are treated as 0.
    #[must_use]
    pub fn with_margin(mut self, margin: i64) -> Self {
        self.margin = margin.max(0);
        self
    }

    /// Rebuild a timeline from a save.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::UnsupportedVersion`] if the save has a
    /// different format version, or [`PersistError::MismatchedHour`] if a
    /// history entry is filed under the wrong epoch hour.
    pub fn from_save(
        save: CalendarSave,
        reckoning: Arc<ReckoningEngine>,
        dice: D,
        margin: i64,
    ) -> Result<Self, PersistError> {
        save.check()?;
        let mut timeline = Self::new(reckoning, dice, save.climate, save.elevation).with_margin(margin);
        timeline.history = save.history;
        info!(
            hours = timeline.history.len(),
            climate = %timeline.climate,
            elevation = timeline.elevation,
            "Timeline restored from save"
        );
        Ok(timeline)
    }

    /// Snapshot the cache for saving.
    pub fn to_save(&self) -> CalendarSave {
        CalendarSave {
            format_version: SAVE_FORMAT_VERSION,
            history: self.history.clone(),
            climate: self.climate,
            elevation: self.elevation,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Climate used for newly generated hours.
    pub const fn climate(&self) -> Climate {
        self.climate
    }

    /// Elevation used for newly generated hours.
    pub const fn elevation(&self) -> i32 {
        self.elevation
    }

    /// Window margin in hours.
    pub const fn margin(&self) -> i64 {
        self.margin
    }

    /// The calendar engine used for seasons.
    pub fn reckoning(&self) -> &ReckoningEngine {
        &self.reckoning
    }

    /// Number of cached hours.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Every cached hour in ascending order.
    pub fn hours(&self) -> impl Iterator<Item = &Hour> {
        self.history.values()
    }

    /// A cached hour, without generating anything.
    pub fn peek(&self, hour: i64) -> Option<&Hour> {
        self.history.get(&hour)
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// The hour at `hour`, generating a window around it on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Reckoning`] if the season calendar cannot
    /// place an hour.
    pub fn get(&mut self, hour: i64) -> Result<&Hour, TimelineError> {
        if !self.history.contains_key(&hour) {
            self.fill_window(hour)?;
        }
        self.history
            .get(&hour)
            .ok_or(TimelineError::MissingHour { hour })
    }

    fn fill_window(&mut self, hour: i64) -> Result<(), TimelineError> {
        let end = hour.saturating_add(self.margin);
        let anchor = self
            .history
            .range(..hour)
            .next_back()
            .filter(|(cached, _)| hour.saturating_sub(**cached) <= self.margin)
            .map(|(cached, entry)| (*cached, entry.generator_state.clone()));

        let first = if let Some((anchor_hour, state)) = anchor {
            debug!(hour, anchor = anchor_hour, end, "Resuming window fill from cached hour");
            self.engine.set_state(state);
            anchor_hour.saturating_add(1)
        } else {
            let start = hour.saturating_sub(self.margin);
            debug!(hour, start, end, "Cold-starting window fill");
            let season = self.reckoning.season(start)?;
            let weather = self
                .engine
                .initialize(season, self.climate, self.elevation, hour_of_day(start));
            self.store(start, weather);
            start.saturating_add(1)
        };

        let mut generated: u32 = 0;
        for next in first..=end {
            if self.history.contains_key(&next) {
                break;
            }
            let weather = self.advance_into(next)?;
            self.store(next, weather);
            generated = generated.saturating_add(1);
        }
        debug!(hour, generated, cached = self.history.len(), "Window fill complete");
        Ok(())
    }

    /// Patch the generator with this hour's season and the timeline's
    /// parameters, then advance it one hour.
    fn advance_into(&mut self, hour: i64) -> Result<Weather, TimelineError> {
        self.engine.set_season(self.reckoning.season(hour)?);
        self.engine.set_climate(self.climate);
        self.engine.set_elevation(self.elevation);
        Ok(self.engine.advance())
    }

    fn store(&mut self, hour: i64, weather: Weather) {
        let state = self.engine.state().clone();
        self.history.insert(hour, Hour::new(hour, weather, state));
    }

    /// Re-generate the weather of every cached hour at or after `from_hour`,
    /// keeping events. Returns the number of hours rewritten.
    ///
    /// The engine is re-initialized at the first hour and again after every
    /// gap in the cache, so it never advances across hours that are not
    /// cached.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Reckoning`] if the season calendar cannot
    /// place an hour.
    pub fn regenerate(&mut self, from_hour: i64) -> Result<usize, TimelineError> {
        let cached: Vec<i64> = self.history.range(from_hour..).map(|(hour, _)| *hour).collect();
        let mut previous: Option<i64> = None;
        let mut reinitialized: u32 = 0;

        for &hour in &cached {
            let contiguous = previous.and_then(|p| p.checked_add(1)) == Some(hour);
            let weather = if contiguous {
                self.advance_into(hour)?
            } else {
                reinitialized = reinitialized.saturating_add(1);
                let season = self.reckoning.season(hour)?;
                self.engine
                    .initialize(season, self.climate, self.elevation, hour_of_day(hour))
            };

            let state = self.engine.state().clone();
            if let Some(entry) = self.history.get_mut(&hour) {
                entry.weather = weather;
                entry.generator_state = state;
            }
            previous = Some(hour);
        }

        debug!(from_hour, regenerated = cached.len(), reinitialized, "Timeline regenerated");
        Ok(cached.len())
    }

    /// Switch climate and re-generate cached hours from `from_hour` on.
    ///
    /// # Errors
    ///
    /// Same as [`Timeline::regenerate`].
    pub fn change_climate(&mut self, from_hour: i64, climate: Climate) -> Result<usize, TimelineError> {
        info!(from_hour, old = %self.climate, new = %climate, "Climate changed");
        self.climate = climate;
        self.regenerate(from_hour)
    }

    /// Switch elevation and re-generate cached hours from `from_hour` on.
    ///
    /// # Errors
    ///
    /// Same as [`Timeline::regenerate`].
    pub fn change_elevation(&mut self, from_hour: i64, elevation: i32) -> Result<usize, TimelineError> {
        info!(from_hour, old = self.elevation, new = elevation, "Elevation changed");
        self.elevation = elevation;
        self.regenerate(from_hour)
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Attach an event to every hour it covers, generating them if needed.
    /// Adding an event that is already attached to an hour leaves that hour
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Timeline::get`].
    pub fn add(&mut self, event: &Event) -> Result<(), TimelineError> {
        for hour in event.hours() {
            self.get(hour)?;
            if let Some(entry) = self.history.get_mut(&hour) {
                if !entry.has_event(event.id) {
                    entry.events.push(event.clone());
                }
            }
        }
        debug!(event = %event.id, start = event.start_time_epoch, duration = event.duration, "Event added");
        Ok(())
    }

    /// Detach an event (by identity) from every hour it covers.
    ///
    /// # Errors
    ///
    /// Same as [`Timeline::get`].
    pub fn remove(&mut self, event: &Event) -> Result<(), TimelineError> {
        for hour in event.hours() {
            self.get(hour)?;
            if let Some(entry) = self.history.get_mut(&hour) {
                entry.events.retain(|attached| attached.id != event.id);
            }
        }
        debug!(event = %event.id, "Event removed");
        Ok(())
    }

    /// Distinct events attached to cached hours in `[start, end)`, ordered by
    /// start hour.
    pub fn events_between(&self, start: i64, end: i64) -> Vec<Event> {
        if start >= end {
            return Vec::new();
        }
        let mut seen: BTreeSet<EventId> = BTreeSet::new();
        let mut events: Vec<Event> = self
            .history
            .range(start..end)
            .flat_map(|(_, hour)| hour.events.iter())
            .filter(|event| seen.insert(event.id))
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.start_time_epoch, event.id));
        events
    }
}

/// Hour of day of an epoch hour, as the engine's cursor expects it.
fn hour_of_day(hour: i64) -> u32 {
    u32::try_from(hour.rem_euclid(HOURS_PER_DAY)).unwrap_or(0)
}
