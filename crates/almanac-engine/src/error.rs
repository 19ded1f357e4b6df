//! Error types for the Almanac binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the forecast
//! run so `main` can propagate with `?`.

/// Top-level error for the Almanac binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: almanac_core::ConfigError,
    },

    /// Calendar setup or date parsing failed.
    #[error("reckoning error: {source}")]
    Reckoning {
        /// The underlying reckoning error.
        #[from]
        source: almanac_core::ReckoningError,
    },

    /// Timeline generation failed.
    #[error("timeline error: {source}")]
    Timeline {
        /// The underlying timeline error.
        #[from]
        source: almanac_core::TimelineError,
    },

    /// Writing the campaign save failed.
    #[error("save error: {source}")]
    Persist {
        /// The underlying persistence error.
        #[from]
        source: almanac_core::PersistError,
    },
}
