//! Shared type definitions for the Almanac simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the weather engine, the calendar reckoning, and the timeline.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Seasons, climates, elevation bands, and symbol sets
//! - [`structs`] -- Weather snapshots, generator state, events, hours, dates

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Climate, ElevationBand, HIGHLAND_THRESHOLD_FT, LOWLAND_THRESHOLD_FT, ParseEnumError, Season,
    SymbolSet,
};
pub use ids::EventId;
pub use structs::{
    DateInfo, Event, GeneratorState, Hour, NO_QUEUED_START, QueuedPrecipitation, THUNDERSTORM,
    Weather, Weekday,
};
