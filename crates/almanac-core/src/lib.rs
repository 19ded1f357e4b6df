//! Calendar reckoning and the lazy weather timeline for the Almanac.
//!
//! # Modules
//!
//! - [`reckoning`] -- Epoch hours to and from dates in named calendars,
//!   and the season of an hour.
//! - [`timeline`] -- The sparse, lazily generated cache of hours and the
//!   events attached to them.
//! - [`config`] -- Configuration loading from `almanac-config.yaml` into
//!   strongly-typed structs.
//! - [`persist`] -- Versioned JSON save files.

pub mod config;
pub mod persist;
pub mod reckoning;
pub mod timeline;

pub use config::{AlmanacConfig, ConfigError};
pub use persist::{CalendarSave, CampaignSave, PersistError, SAVE_FORMAT_VERSION};
pub use reckoning::{ReckoningEngine, ReckoningError};
pub use timeline::{DEFAULT_MARGIN_HOURS, Timeline, TimelineError};
