//! # lp-instruments
//!
//! The option contract priced on the lattice, its payoff and exercise
//! style, and the `PricingEngine` interface engines implement.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use exercise::ExerciseStyle;
pub use instrument::{PricingEngine, PricingResults};
pub use option::{
    OptionContract, OptionContractBuilder, DEFAULT_SPOT, RISKLESS_RATE, UP_PROBABILITY,
};
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
