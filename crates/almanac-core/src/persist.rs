//! Save files.
//!
//! A save is plain JSON with an explicit, versioned field list. The
//! calendar payload holds the cached timeline; the campaign wrapper adds the
//! save name, the current epoch hour, and which calendar the campaign reads
//! dates in.

use std::collections::BTreeMap;
use std::path::Path;

use almanac_types::{Climate, Hour};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Version written into every save and required on load.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Errors that can occur when reading or writing save files.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Failed to read or write the save file.
    #[error("save file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The save file is not valid JSON or does not match the record shapes.
    #[error("save file JSON is malformed: {source}")]
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The save was written by an incompatible version.
    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// A history entry is filed under a different hour than it records.
    #[error("history key {key} holds hour {time_from_epoch}")]
    MismatchedHour {
        /// Key the hour is stored under.
        key: i64,
        /// Epoch hour recorded inside the entry.
        time_from_epoch: i64,
    },
}

impl From<serde_json::Error> for PersistError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

/// The cached timeline and the parameters it was generated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSave {
    /// Always [`SAVE_FORMAT_VERSION`] when written by this build.
    pub format_version: u32,
    /// Every cached hour by epoch hour.
    pub history: BTreeMap<i64, Hour>,
    /// Climate of the timeline.
    pub climate: Climate,
    /// Elevation of the timeline in feet.
    pub elevation: i32,
}

impl CalendarSave {
    /// Fail unless the save has the current format version.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::UnsupportedVersion`] on a mismatch.
    pub const fn check_version(&self) -> Result<(), PersistError> {
        if self.format_version == SAVE_FORMAT_VERSION {
            Ok(())
        } else {
            Err(PersistError::UnsupportedVersion {
                found: self.format_version,
                expected: SAVE_FORMAT_VERSION,
            })
        }
    }

    /// Fail unless the version matches and every history entry is filed
    /// under its own epoch hour.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::UnsupportedVersion`] or
    /// [`PersistError::MismatchedHour`].
    pub fn check(&self) -> Result<(), PersistError> {
        self.check_version()?;
        match self
            .history
            .iter()
            .find(|(key, hour)| **key != hour.time_from_epoch)
        {
            Some((key, hour)) => Err(PersistError::MismatchedHour {
                key: *key,
                time_from_epoch: hour.time_from_epoch,
            }),
            None => Ok(()),
        }
    }
}

/// A whole campaign: where the party is in time and the timeline around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSave {
    /// Name the save was stored under.
    pub save_name: String,
    /// The campaign's current epoch hour.
    pub current_time: i64,
    /// Calendar the campaign reads dates in.
    pub calendar_used: String,
    /// The cached timeline.
    pub calendar: CalendarSave,
}

impl CampaignSave {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON and check the calendar payload.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] if the JSON is malformed, or the
    /// error of [`CalendarSave::check`].
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let save: Self = serde_json::from_str(json)?;
        save.calendar.check()?;
        Ok(save)
    }

    /// Write to a file, replacing it if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] or [`PersistError::Json`].
    pub fn write_to(&self, path: &Path) -> Result<(), PersistError> {
        std::fs::write(path, self.to_json()?)?;
        info!(
            path = %path.display(),
            save_name = self.save_name,
            hours = self.calendar.history.len(),
            "Campaign saved"
        );
        Ok(())
    }

    /// Read from a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`], or any error of [`Self::from_json`].
    pub fn read_from(path: &Path) -> Result<Self, PersistError> {
        let save = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            save_name = save.save_name,
            hours = save.calendar.history.len(),
            "Campaign loaded"
        );
        Ok(save)
    }
}
