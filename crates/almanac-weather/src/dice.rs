//! Dice notation and the random-draw service.
//!
//! Every random decision in the weather engine goes through a [`DiceRoller`].
//! Production code uses [`RngDice`]; tests pin outcomes with [`ScriptedDice`].

use core::fmt;
use core::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ClimateError;

// ---------------------------------------------------------------------------
// Dice expressions
// ---------------------------------------------------------------------------

/// A dice expression in `NdM+K` form.
///
/// A negative count negates the summed draws before the modifier is applied,
/// so `-2d10` ranges over `[-20, -2]`. A zero count contributes nothing and
/// the expression evaluates to the modifier alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    count: i32,
    faces: u32,
    modifier: i32,
}

impl DiceExpr {
    /// Build an expression from its parts.
    pub const fn new(count: i32, faces: u32, modifier: i32) -> Self {
        Self {
            count,
            faces,
            modifier,
        }
    }

    /// Number of dice. Negative counts subtract.
    pub const fn count(&self) -> i32 {
        self.count
    }

    /// Sides per die.
    pub const fn faces(&self) -> u32 {
        self.faces
    }

    /// Constant added after summing.
    pub const fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Smallest value the expression can produce.
    pub fn min_value(&self) -> i64 {
        let faces = i64::from(self.faces.max(1));
        let count = i64::from(self.count);
        let dice = if count >= 0 {
            count
        } else {
            count.saturating_mul(faces)
        };
        dice.saturating_add(i64::from(self.modifier))
    }

    /// Largest value the expression can produce.
    pub fn max_value(&self) -> i64 {
        let faces = i64::from(self.faces.max(1));
        let count = i64::from(self.count);
        let dice = if count >= 0 {
            count.saturating_mul(faces)
        } else {
            count
        };
        dice.saturating_add(i64::from(self.modifier))
    }

    /// Roll the expression once.
    pub fn roll<D: DiceRoller + ?Sized>(&self, dice: &mut D) -> i32 {
        let sum: i64 = dice
            .roll(self.count.unsigned_abs(), self.faces)
            .into_iter()
            .map(i64::from)
            .sum();
        let signed = if self.count < 0 { sum.saturating_neg() } else { sum };
        let total = signed.saturating_add(i64::from(self.modifier));
        i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX })
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

impl FromStr for DiceExpr {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClimateError::MalformedDice { expr: s.to_owned() };
        let text = s.trim();

        let (count_part, rest) = text.split_once(['d', 'D']).ok_or_else(malformed)?;
        let count = match count_part {
            "" => 1,
            "-" => -1,
            n => n.parse::<i32>().map_err(|_err| malformed())?,
        };

        let (faces_part, modifier) = match rest.find(['+', '-']) {
            Some(at) => {
                let (faces, modifier) = rest.split_at(at);
                (faces, modifier.parse::<i32>().map_err(|_err| malformed())?)
            }
            None => (rest, 0),
        };
        let faces = faces_part.parse::<u32>().map_err(|_err| malformed())?;
        if faces == 0 {
            return Err(malformed());
        }

        Ok(Self::new(count, faces, modifier))
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = ClimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpr> for String {
    fn from(expr: DiceExpr) -> Self {
        expr.to_string()
    }
}

// ---------------------------------------------------------------------------
// Dice rollers
// ---------------------------------------------------------------------------

/// Source of uniform die draws.
///
/// Implementations only need [`DiceRoller::draw`]; [`DiceRoller::roll`]
/// collects independent draws for multi-die expressions.
pub trait DiceRoller {
    /// One uniform draw in `[1, faces]`. A zero-sided die yields 0.
    fn draw(&mut self, faces: u32) -> u32;

    /// `count` independent draws in `[1, faces]`.
    fn roll(&mut self, count: u32, faces: u32) -> Vec<u32> {
        (0..count).map(|_| self.draw(faces)).collect()
    }
}

impl<D: DiceRoller + ?Sized> DiceRoller for &mut D {
    fn draw(&mut self, faces: u32) -> u32 {
        (**self).draw(faces)
    }
}

/// Dice backed by a [`rand`] generator.
#[derive(Debug, Clone)]
pub struct RngDice<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<StdRng> {
    /// Deterministic dice for reproducible timelines.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Dice seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> DiceRoller for RngDice<R> {
    fn draw(&mut self, faces: u32) -> u32 {
        if faces == 0 {
            return 0;
        }
        self.rng.random_range(1..=faces)
    }
}

/// Dice that replay a fixed script of draws, cycling when exhausted.
///
/// Each scripted value is clamped into `[1, faces]` for the die being drawn,
/// so a script of `[100]` always rolls the maximum. An empty script always
/// draws 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    draws: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Replay `draws` in order.
    pub const fn new(draws: Vec<u32>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Every draw returns `value` (clamped to the die).
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub const fn position(&self) -> usize {
        self.cursor
    }
}

impl DiceRoller for ScriptedDice {
    fn draw(&mut self, faces: u32) -> u32 {
        if faces == 0 {
            return 0;
        }
        let value = self
            .draws
            .get(self.cursor.checked_rem(self.draws.len()).unwrap_or(0))
            .copied()
            .unwrap_or(1);
        self.cursor = self.cursor.saturating_add(1);
        value.clamp(1, faces)
    }
}
