//! # lattice-pricer
//!
//! Fair values of European and American calls on an N-period recombining
//! binomial lattice with zero interest, `p = 1/2`, `u = 1 + v` and
//! `d = 1 − v`; calibration of the step size `v` to an observed price; and
//! expected-value statistics of the underlying under the lattice measure.
//!
//! This crate is a **façade** that re-exports the `lp-*` workspace crates.
//!
//! ## Quick start
//!
//! ```rust
//! use lattice_pricer::{calibrate, expected_sweep, price, OptionContract};
//!
//! let call = OptionContract::european(1.1, 3, 0.5)?;
//! assert!((price(&call)? - 0.29375).abs() < 1e-12);
//!
//! let v = calibrate(1.0, 3, 0.34375)?;
//! assert!((v - 0.5).abs() < 1e-8);
//!
//! for point in expected_sweep(1.0, 4, [0.1, 0.5, 0.9])?.iter() {
//!     let (_, expected) = point?;
//!     assert!((expected - 1.0).abs() < 1e-12);
//! }
//! # Ok::<(), lattice_pricer::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use lp_core as core;

/// Log-domain binomial weights and 1-D root finders.
pub use lp_math as math;

/// The price lattice and the backward-induction kernel.
pub use lp_methods as methods;

/// Option contracts, payoffs and exercise styles.
pub use lp_instruments as instruments;

/// Lattice pricing engine, calibrator and lattice statistics.
pub use lp_pricingengines as pricingengines;

pub use lp_core::{Error, Result};
pub use lp_instruments::{ExerciseStyle, OptionContract, OptionType, PricingEngine};
pub use lp_pricingengines::{
    calibrate, expected_path_maximum, expected_sweep, expected_terminal_price, price,
    BinomialLatticeEngine, CalibrationConfig, Calibrator, ExpectedSweep, PricingRegime,
    SolverMethod, SweepPoint,
};
