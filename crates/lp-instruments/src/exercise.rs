//! Option exercise styles.
//!
//! The style selects the valuation policy: a European contract is valued on
//! its terminal payoffs only, an American one may be exercised at every
//! node of the lattice.

use std::fmt;

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Can only be exercised at expiry (level `N`).
    #[default]
    European,
    /// Can be exercised at any level `0..=N`.
    American,
}

impl ExerciseStyle {
    /// Whether exercise is allowed before the last period.
    pub fn allows_early_exercise(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "European"),
            ExerciseStyle::American => write!(f, "American"),
        }
    }
}
