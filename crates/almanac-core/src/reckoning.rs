//! Calendar reckoning: epoch hours to and from calendar dates.
//!
//! An epoch hour is the only time unit stored anywhere. Every calendar reads
//! it differently: its own month lengths, optional weekdays, and a list of
//! era boundaries. Era 0 is "before reckoning" and runs backwards from the
//! first boundary; era `n` starts at boundary `n - 1`.
//!
//! # Design Principles
//!
//! - Floor division everywhere, so hours before a boundary land in the
//!   previous day and year rather than rounding toward the boundary.
//! - All arithmetic is checked; an overflowing date is an invalid date, not
//!   a wrapped one.
//! - Seasons are not computed separately. The season of an hour is the month
//!   name of that hour in the season calendar.

use std::collections::BTreeMap;

use almanac_types::{DateInfo, Season, Weekday};

use crate::config::{CalendarConfig, ReckoningConfig};

/// Hours in a day, in every calendar.
pub const HOURS_PER_DAY: i64 = 24;

/// Errors that can occur during calendar reckoning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReckoningError {
    /// No calendar with that name is configured.
    #[error("calendar {name:?} not found")]
    UnknownCalendar {
        /// The requested calendar name.
        name: String,
    },

    /// A date could not be parsed or does not exist in the calendar.
    #[error("invalid date: {reason}")]
    InvalidDate {
        /// What is wrong with the date.
        reason: String,
    },

    /// A calendar configuration is unusable.
    #[error("invalid calendar {name:?}: {reason}")]
    InvalidCalendar {
        /// The calendar name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A month of the season calendar is not named after a season.
    #[error("season calendar month {month:?} is not a season")]
    NotASeason {
        /// The offending month name.
        month: String,
    },
}

fn invalid_date(reason: impl Into<String>) -> ReckoningError {
    ReckoningError::InvalidDate {
        reason: reason.into(),
    }
}

/// Converts epoch hours to dates and back for a set of named calendars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReckoningEngine {
    calendars: BTreeMap<String, CalendarConfig>,
    season_calendar: String,
}

impl ReckoningEngine {
    /// Build an engine from configuration, validating every calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ReckoningError::InvalidCalendar`] if a calendar has no
    /// months, a zero-length month, an empty weekday list, or era boundaries
    /// that are missing or not strictly ascending, or if the season calendar
    /// is missing. Returns [`ReckoningError::NotASeason`] if a season calendar
    /// month is not a season name.
    pub fn from_config(config: &ReckoningConfig) -> Result<Self, ReckoningError> {
        Self::new(config.calendars.clone(), &config.season_calendar)
    }

    /// Build an engine from calendars and the name of the season calendar.
    ///
    /// # Errors
    ///
    /// Same as [`ReckoningEngine::from_config`].
    pub fn new(
        calendars: BTreeMap<String, CalendarConfig>,
        season_calendar: &str,
    ) -> Result<Self, ReckoningError> {
        for (name, calendar) in &calendars {
            validate_calendar(name, calendar)?;
        }

        let seasons = calendars
            .get(season_calendar)
            .ok_or_else(|| ReckoningError::InvalidCalendar {
                name: season_calendar.to_owned(),
                reason: "season calendar is not configured".to_owned(),
            })?;
        for month in &seasons.months {
            month
                .name
                .parse::<Season>()
                .map_err(|_err| ReckoningError::NotASeason {
                    month: month.name.clone(),
                })?;
        }

        Ok(Self {
            calendars,
            season_calendar: season_calendar.to_owned(),
        })
    }

    /// Names of every configured calendar, sorted.
    pub fn calendar_names(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }

    /// Name of the calendar that defines the seasons.
    pub fn season_calendar(&self) -> &str {
        &self.season_calendar
    }

    fn calendar(&self, name: &str) -> Result<&CalendarConfig, ReckoningError> {
        self.calendars
            .get(name)
            .ok_or_else(|| ReckoningError::UnknownCalendar {
                name: name.to_owned(),
            })
    }

    // -----------------------------------------------------------------------
    // Conversions
    // -----------------------------------------------------------------------

    /// Express an epoch hour as a date in `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`ReckoningError::UnknownCalendar`] if the calendar does not
    /// exist.
    pub fn epoch_to_date(&self, hour: i64, calendar: &str) -> Result<DateInfo, ReckoningError> {
        let cal = self.calendar(calendar)?;
        let boundaries = &cal.era_start_hours;

        let era = boundaries
            .iter()
            .position(|&boundary| boundary > hour)
            .unwrap_or(boundaries.len());
        let era_start = era_start(boundaries, era).ok_or_else(|| ReckoningError::InvalidCalendar {
            name: calendar.to_owned(),
            reason: "no era boundaries".to_owned(),
        })?;

        let since_era_start = hour.saturating_sub(era_start);
        let days = since_era_start.div_euclid(HOURS_PER_DAY);
        let hour_of_day = since_era_start.rem_euclid(HOURS_PER_DAY);

        let year_length = year_length(cal);
        let year = days.checked_div_euclid(year_length).unwrap_or(0);
        let day_of_year = days.checked_rem_euclid(year_length).unwrap_or(0);
        let (month, month_name, day_of_month) = month_and_day(cal, day_of_year);

        let weekday = cal.weekdays.as_ref().and_then(|weekdays| {
            let count = i64::try_from(weekdays.len()).ok()?;
            let index = usize::try_from(days.checked_rem_euclid(count)?).ok()?;
            weekdays.get(index).map(|w| Weekday {
                index,
                name: w.name.clone(),
                abbreviation: w.abbreviation.clone(),
            })
        });

        Ok(DateInfo {
            calendar: calendar.to_owned(),
            year,
            era,
            num_eras: boundaries.len(),
            month,
            month_name,
            day_of_month,
            weekday,
            hour: u32::try_from(hour_of_day).unwrap_or(0),
        })
    }

    /// Epoch hour of midnight on a date.
    ///
    /// `year` is the displayed year: counted from 1 within an era, and
    /// counted backwards from 1 in era 0.
    ///
    /// # Errors
    ///
    /// Returns [`ReckoningError::InvalidDate`] if the month, day, era, or
    /// year does not exist in the calendar, including a year past the end of
    /// a bounded era. Returns [`ReckoningError::UnknownCalendar`] if the
    /// calendar does not exist.
    pub fn date_to_epoch(
        &self,
        day: u32,
        month: u32,
        era: usize,
        year: i64,
        calendar: &str,
    ) -> Result<i64, ReckoningError> {
        let cal = self.calendar(calendar)?;
        let boundaries = &cal.era_start_hours;

        let month_index = usize::try_from(month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .ok_or_else(|| invalid_date(format!("month {month} does not exist")))?;
        let month_config = cal
            .months
            .get(month_index)
            .ok_or_else(|| invalid_date(format!("month {month} does not exist")))?;
        if day == 0 || day > month_config.days {
            return Err(invalid_date(format!(
                "day {day} does not exist in {}",
                month_config.name
            )));
        }
        if era > boundaries.len() {
            return Err(invalid_date(format!(
                "era {era} does not exist in {calendar}"
            )));
        }
        if year < 1 {
            return Err(invalid_date(format!("year {year} must be at least 1")));
        }

        let days_before_month: i64 = cal
            .months
            .iter()
            .take(month_index)
            .map(|m| i64::from(m.days))
            .sum();
        let day_of_year = days_before_month.saturating_add(i64::from(day)).saturating_sub(1);
        let year_hours = year_length(cal).saturating_mul(HOURS_PER_DAY);

        let start = era_start(boundaries, era)
            .ok_or_else(|| invalid_date(format!("era {era} has no start")))?;
        let years_offset = if era == 0 {
            year.checked_neg()
        } else {
            year.checked_sub(1)
        }
        .and_then(|y| y.checked_mul(year_hours));
        let hour = years_offset
            .and_then(|offset| start.checked_add(offset))
            .and_then(|h| h.checked_add(day_of_year.checked_mul(HOURS_PER_DAY)?))
            .ok_or_else(|| invalid_date(format!("year {year} is out of range")))?;

        if let Some(&era_end) = boundaries.get(era) {
            if hour >= era_end {
                return Err(invalid_date(format!(
                    "era {era} of {calendar} has only {} years",
                    self.years_in_era(era, calendar)?
                )));
            }
        }

        Ok(hour)
    }

    /// Epoch hour of a full date, including its hour of day.
    ///
    /// # Errors
    ///
    /// Same as [`ReckoningEngine::date_to_epoch`].
    pub fn date_info_to_epoch(&self, date: &DateInfo) -> Result<i64, ReckoningError> {
        let midnight = self.date_to_epoch(
            date.day_of_month,
            date.month,
            date.era,
            date.display_year(),
            &date.calendar,
        )?;
        midnight
            .checked_add(i64::from(date.hour))
            .ok_or_else(|| invalid_date("hour is out of range"))
    }

    /// Parse a short date (`day.month.year`) into the epoch hour of its
    /// midnight.
    ///
    /// The year may carry an era prefix: `BR12` is the twelfth year before
    /// reckoning, `2E1394` is year 1394 of era 2, and a bare `1394` is era 1.
    ///
    /// # Errors
    ///
    /// Returns [`ReckoningError::InvalidDate`] if the text cannot be parsed
    /// or names a date that does not exist.
    pub fn parse_date(
        &self,
        text: &str,
        calendar: &str,
        delimiter: &str,
    ) -> Result<i64, ReckoningError> {
        let unparseable = || invalid_date(format!("cannot parse {text:?}"));
        if delimiter.is_empty() {
            return Err(unparseable());
        }

        let mut parts = text.trim().split(delimiter).map(str::trim);
        let (Some(day), Some(month), Some(year_part), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unparseable());
        };

        let day = day.parse::<u32>().map_err(|_err| unparseable())?;
        let month = month.parse::<u32>().map_err(|_err| unparseable())?;

        let year_part = year_part.to_uppercase();
        let (era, year) = if let Some(years_before) = year_part.strip_prefix("BR") {
            (0, years_before)
        } else if let Some((era, year)) = year_part.split_once('E') {
            (era.parse::<usize>().map_err(|_err| unparseable())?, year)
        } else {
            (1, year_part.as_str())
        };
        let year = year.parse::<i64>().map_err(|_err| unparseable())?;

        self.date_to_epoch(day, month, era, year, calendar)
    }

    /// Season at an epoch hour: the month name in the season calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ReckoningError::NotASeason`] if the month name is not a
    /// season, which validation at construction rules out.
    pub fn season(&self, hour: i64) -> Result<Season, ReckoningError> {
        let date = self.epoch_to_date(hour, &self.season_calendar)?;
        date.month_name
            .parse::<Season>()
            .map_err(|_err| ReckoningError::NotASeason {
                month: date.month_name,
            })
    }

    // -----------------------------------------------------------------------
    // Calendar shape
    // -----------------------------------------------------------------------

    /// Length of a month (1-based) in days.
    ///
    /// # Errors
    ///
    /// Returns [`ReckoningError::InvalidDate`] if the month does not exist.
    pub fn days_in_month(&self, month: u32, calendar: &str) -> Result<u32, ReckoningError> {
        let cal = self.calendar(calendar)?;
        usize::try_from(month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|index| cal.months.get(index))
            .map(|m| m.days)
            .ok_or_else(|| invalid_date(format!("month {month} does not exist")))
    }

    /// Number of months in a year.
    pub fn months_in_year(&self, calendar: &str) -> Result<usize, ReckoningError> {
        Ok(self.calendar(calendar)?.months.len())
    }

    /// Number of days in a year.
    pub fn days_in_year(&self, calendar: &str) -> Result<i64, ReckoningError> {
        Ok(year_length(self.calendar(calendar)?))
    }

    /// Number of hours in a year.
    pub fn hours_in_year(&self, calendar: &str) -> Result<i64, ReckoningError> {
        Ok(self.days_in_year(calendar)?.saturating_mul(HOURS_PER_DAY))
    }

    /// Whole years in a bounded era. Era 0 and the last era are unbounded
    /// and report 0.
    pub fn years_in_era(&self, era: usize, calendar: &str) -> Result<i64, ReckoningError> {
        let cal = self.calendar(calendar)?;
        let boundaries = &cal.era_start_hours;
        if era == 0 || era >= boundaries.len() {
            return Ok(0);
        }
        let (Some(start), Some(&end)) = (era_start(boundaries, era), boundaries.get(era)) else {
            return Ok(0);
        };
        let days = end.saturating_sub(start).div_euclid(HOURS_PER_DAY);
        Ok(days.checked_div_euclid(year_length(cal)).unwrap_or(0))
    }

    /// Number of era boundaries.
    pub fn num_of_eras(&self, calendar: &str) -> Result<usize, ReckoningError> {
        Ok(self.calendar(calendar)?.era_start_hours.len())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_calendar(name: &str, calendar: &CalendarConfig) -> Result<(), ReckoningError> {
    let invalid = |reason: &str| ReckoningError::InvalidCalendar {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    if calendar.months.is_empty() {
        return Err(invalid("calendar has no months"));
    }
    if calendar.months.iter().any(|m| m.days == 0) {
        return Err(invalid("every month needs at least one day"));
    }
    if calendar.weekdays.as_ref().is_some_and(Vec::is_empty) {
        return Err(invalid("weekday list is empty; omit it for calendars without weeks"));
    }
    if calendar.era_start_hours.is_empty() {
        return Err(invalid("at least one era boundary is required"));
    }
    if calendar.era_start_hours.windows(2).any(|pair| match pair {
        [earlier, later] => earlier >= later,
        _ => false,
    }) {
        return Err(invalid("era boundaries must be strictly ascending"));
    }
    Ok(())
}

/// Start hour of an era. Era 0 is measured back from the first boundary.
fn era_start(boundaries: &[i64], era: usize) -> Option<i64> {
    let index = era.saturating_sub(1);
    boundaries.get(index).copied()
}

fn year_length(calendar: &CalendarConfig) -> i64 {
    calendar.months.iter().map(|m| i64::from(m.days)).sum()
}

/// 1-based month, its name, and 1-based day for a day of the year.
fn month_and_day(calendar: &CalendarConfig, day_of_year: i64) -> (u32, String, u32) {
    let mut remaining = day_of_year;
    for (index, month) in calendar.months.iter().enumerate() {
        let length = i64::from(month.days);
        if remaining < length {
            return (
                u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX),
                month.name.clone(),
                u32::try_from(remaining.saturating_add(1)).unwrap_or(1),
            );
        }
        remaining = remaining.saturating_sub(length);
    }
    // Only reachable with a day of year past the year length.
    let last = calendar.months.last();
    (
        u32::try_from(calendar.months.len()).unwrap_or(u32::MAX),
        last.map(|m| m.name.clone()).unwrap_or_default(),
        last.map_or(1, |m| m.days),
    )
}
