//! # lp-pricingengines
//!
//! Pricing on the binomial lattice and everything built on top of it.
//!
//! ## Components
//!
//! - [`BinomialLatticeEngine`]: prices an [`OptionContract`] by the closed-form
//!   terminal expectation (European) or backward induction with early exercise
//!   (American)
//! - [`Calibrator`]: recovers the step size `v` that reproduces a target price
//! - [`lattice_statistics`]: expected terminal price and expected path maximum
//!   under the lattice measure, and sweeps of both over step sizes
//!
//! [`OptionContract`]: lp_instruments::OptionContract

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod binomial_engine;
pub mod calibration;
pub mod lattice_statistics;

pub use binomial_engine::{price, BinomialLatticeEngine, PricingRegime};
pub use calibration::{calibrate, CalibrationConfig, CalibrationConfigBuilder, Calibrator, SolverMethod};
pub use lattice_statistics::{
    expected_path_maximum, expected_sweep, expected_terminal_price, ExpectedSweep, SweepPoint,
};
