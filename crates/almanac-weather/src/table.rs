//! Cumulative percentile tables.
//!
//! Each row carries an inclusive upper bound on a d100 draw; the first row
//! whose bound is at least the draw is selected. Bounds must be ascending
//! and the last bound should be 100.

use crate::dice::DiceRoller;
use crate::error::TableLookupMiss;

/// Size of the die rolled against a percentile table.
pub const PERCENTILE_DIE: u32 = 100;

/// A named table of rows selected by a d100 draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentileTable<T> {
    name: &'static str,
    rows: Vec<(u32, T)>,
}

impl<T> PercentileTable<T> {
    /// Build a table from `(cumulative bound, payload)` rows.
    pub const fn new(name: &'static str, rows: Vec<(u32, T)>) -> Self {
        Self { name, rows }
    }

    /// Table name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Payload of the row at `index`.
    pub fn row(&self, index: usize) -> Option<&T> {
        self.rows.get(index).map(|(_, payload)| payload)
    }

    /// Iterate over `(bound, payload)` rows in order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &T)> {
        self.rows.iter().map(|(bound, payload)| (*bound, payload))
    }

    /// Select the first row whose bound is at least `draw`.
    ///
    /// # Errors
    ///
    /// Returns [`TableLookupMiss`] when every bound is below the draw.
    pub fn select(&self, draw: u32) -> Result<(usize, &T), TableLookupMiss> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, (bound, _))| *bound >= draw)
            .map(|(index, (_, payload))| (index, payload))
            .ok_or(TableLookupMiss {
                table: self.name,
                draw,
            })
    }

    /// Draw a d100 and select the matching row.
    ///
    /// # Errors
    ///
    /// Returns [`TableLookupMiss`] when the draw falls past the last bound.
    pub fn roll<D: DiceRoller + ?Sized>(&self, dice: &mut D) -> Result<(usize, &T), TableLookupMiss> {
        self.select(dice.draw(PERCENTILE_DIE))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn wind_like() -> PercentileTable<&'static str> {
        PercentileTable::new(
            "wind",
            vec![(50, "light"), (80, "moderate"), (90, "strong"), (95, "severe"), (100, "storm")],
        )
    }

    #[test]
    fn bounds_are_inclusive() {
        let table = wind_like();
        assert_eq!(table.select(1).unwrap(), (0, &"light"));
        assert_eq!(table.select(50).unwrap(), (0, &"light"));
        assert_eq!(table.select(51).unwrap(), (1, &"moderate"));
        assert_eq!(table.select(95).unwrap(), (3, &"severe"));
        assert_eq!(table.select(100).unwrap(), (4, &"storm"));
    }

    #[test]
    fn short_table_reports_a_miss() {
        let table = PercentileTable::new("short", vec![(40, 'a'), (90, 'b')]);
        assert_eq!(
            table.select(91),
            Err(TableLookupMiss {
                table: "short",
                draw: 91
            })
        );
        let empty: PercentileTable<u8> = PercentileTable::new("empty", Vec::new());
        assert!(empty.is_empty());
        assert!(empty.select(1).is_err());
    }

    #[test]
    fn roll_uses_a_d100() {
        let table = wind_like();
        let mut dice = ScriptedDice::constant(250);
        assert_eq!(table.roll(&mut dice).unwrap().0, 4);
        let mut dice = ScriptedDice::constant(81);
        assert_eq!(table.roll(&mut dice).unwrap().1, &"strong");
    }
}
