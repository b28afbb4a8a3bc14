//! # lp-math
//!
//! Numerical helpers for the lattice pricer: 1-D root finders used by the
//! calibrator and binomial weights computed in the log domain.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Binomial coefficients and path weights.
pub mod distributions;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{ln_binomial_coefficient, ln_binomial_weights};
pub use solvers1d::SolverLimits;
