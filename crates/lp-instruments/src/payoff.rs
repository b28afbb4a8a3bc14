//! Option payoffs and the payoff evaluator used on lattice levels.
//!
//! A payoff maps an underlying price to an intrinsic value. On the lattice
//! it is applied level-wise: once on the terminal level to seed backward
//! induction, and, for American contracts, at every earlier level to compare
//! continuation values against immediate exercise.

use lp_core::{Price, Real};
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// A call option (right to buy).
    #[default]
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// An option payoff.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Intrinsic value at underlying price `price`.
    fn value(&self, price: Price) -> Real;

    /// Payoffs for every node of a lattice level.
    fn terminal_values(&self, prices: &[Price]) -> Vec<Real> {
        prices.iter().map(|&s| self.value(s)).collect()
    }

    /// Replace each continuation value with `max(continuation, intrinsic)`.
    ///
    /// `continuation` and `prices` must describe the same lattice level.
    fn exercise_against(&self, continuation: &mut [Real], prices: &[Price]) {
        debug_assert_eq!(continuation.len(), prices.len());
        for (hold, &s) in continuation.iter_mut().zip(prices) {
            *hold = hold.max(self.value(s));
        }
    }
}

/// Standard "plain vanilla" payoff.
///
/// `payoff = max(φ(S − K), 0)` where `φ = +1` for Call, `−1` for Put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainVanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Price,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Price) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    /// A call struck at `strike`.
    pub fn call(strike: Price) -> Self {
        Self::new(OptionType::Call, strike)
    }
}

impl Payoff for PlainVanillaPayoff {
    fn value(&self, price: Price) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vanilla {} @ {}", self.option_type, self.strike)
    }
}
