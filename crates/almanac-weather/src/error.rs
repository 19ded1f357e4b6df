//! Error types for the `almanac-weather` crate.
//!
//! [`ClimateError`] covers configuration-time failures. [`TableLookupMiss`]
//! is raised while rolling on a malformed percentile table; the engine never
//! propagates it and substitutes a fallback instead.

use almanac_types::ParseEnumError;

/// Errors that can occur when building climate data or dice expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClimateError {
    /// A dice expression did not match `NdM[+K|-K]`.
    #[error("malformed dice expression: {expr:?}")]
    MalformedDice {
        /// The offending text.
        expr: String,
    },

    /// A climate or season name was not recognized.
    #[error(transparent)]
    Parse(#[from] ParseEnumError),
}

/// No row of a percentile table covers the draw.
///
/// Only a table whose last cumulative bound is below the die size can
/// produce this, so it points at bad static data rather than bad luck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no row of the {table} table covers draw {draw}")]
pub struct TableLookupMiss {
    /// Name of the table that was rolled on.
    pub table: &'static str,
    /// The percentile draw that fell through.
    pub draw: u32,
}
