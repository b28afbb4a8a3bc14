//! Lattice methods for option pricing.
//!
//! # Overview
//!
//! * [`PriceLattice`]: recombining binomial lattice of underlying prices
//! * [`collapse_step`]: one risk-neutral expectation step, level `i + 1` → `i`
//! * [`roll_back`]: repeated collapse down to level 0, with an optional
//!   per-level hook for early exercise

pub mod price_lattice;

pub use price_lattice::PriceLattice;

use lp_core::{DiscountFactor, Probability, Real, Size};

// ─── Backward induction ───────────────────────────────────────────────────────

/// Collapse the values of one level into its parent level, in place.
///
/// `values[j] ← discount · (p_up · values[j + 1] + (1 − p_up) · values[j])`
/// for every parent node, after which the vector is one element shorter.
/// A single-element vector is left untouched.
pub fn collapse_step(values: &mut Vec<Real>, p_up: Probability, discount: DiscountFactor) {
    if values.len() < 2 {
        return;
    }
    let p_down = 1.0 - p_up;
    for j in 0..values.len() - 1 {
        values[j] = discount * (p_up * values[j + 1] + p_down * values[j]);
    }
    values.pop();
}

/// Roll terminal values back through `lattice` to its root.
///
/// `terminal` must hold one value per node of the lattice's last level.
/// After every collapse onto level `i < N`, `at_level(i, prices_i, values)`
/// is invoked, so an exercise policy can overwrite continuation values.
/// Returns the single value left at level 0.
///
/// # Panics
/// Panics if `terminal.len()` differs from the terminal level size.
pub fn roll_back<F>(
    lattice: &PriceLattice,
    terminal: Vec<Real>,
    p_up: Probability,
    discount: DiscountFactor,
    mut at_level: F,
) -> Real
where
    F: FnMut(Size, &[Real], &mut [Real]),
{
    let n = lattice.steps();
    assert_eq!(
        terminal.len(),
        lattice.size(n),
        "terminal values must match the last lattice level"
    );

    let mut values = terminal;
    for i in (0..n).rev() {
        collapse_step(&mut values, p_up, discount);
        at_level(i, lattice.level(i), &mut values);
    }

    values[0]
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn collapse_step_averages_neighbours() {
        let mut v = vec![0.0, 0.0, 0.025, 2.275];
        collapse_step(&mut v, 0.5, 1.0);
        assert_eq!(v.len(), 3);
        assert_abs_diff_eq!(v[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[1], 0.0125, epsilon = 1e-15);
        assert_abs_diff_eq!(v[2], 1.15, epsilon = 1e-15);
    }

    #[test]
    fn collapse_step_on_root_is_a_no_op() {
        let mut v = vec![0.3];
        collapse_step(&mut v, 0.5, 1.0);
        assert_eq!(v, vec![0.3]);
    }

    #[test]
    fn roll_back_visits_every_level_once() {
        let lattice = PriceLattice::build(1.0, 1.5, 0.5, 3).unwrap();
        let terminal: Vec<Real> = lattice.terminal().to_vec();
        let mut seen = Vec::new();
        let value = roll_back(&lattice, terminal, 0.5, 1.0, |i, prices, values| {
            assert_eq!(prices.len(), values.len());
            seen.push(i);
        });
        assert_eq!(seen, vec![2, 1, 0]);
        // Rolling back the underlying itself recovers the spot (no drift).
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn roll_back_zero_periods_returns_terminal() {
        let lattice = PriceLattice::build(1.0, 1.5, 0.5, 0).unwrap();
        let value = roll_back(&lattice, vec![0.7], 0.5, 1.0, |_, _, _| {
            panic!("no levels to visit")
        });
        assert_abs_diff_eq!(value, 0.7, epsilon = 1e-15);
    }
}
