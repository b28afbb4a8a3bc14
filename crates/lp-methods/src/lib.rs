//! # lp-methods
//!
//! Lattice methods: the recombining binomial price lattice and the
//! one-step backward-induction kernel that prices contracts on it.
//!
//! # Modules
//!
//! * [`lattice`]: [`PriceLattice`] construction and backward induction

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: price lattice, backward induction.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{collapse_step, roll_back, PriceLattice};
