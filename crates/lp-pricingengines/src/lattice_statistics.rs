//! Expectations of the underlying under the lattice measure.
//!
//! With `p = 1/2`, `u = 1 + v` and `d = 1 − v`, one period multiplies the
//! expected price by `p·u + p·d = 1`. The underlying is therefore driftless:
//! `E[S_n] = S0` for every `n` and every `v ∈ (0, 1)`. The functions here
//! compute such expectations exactly under the lattice measure, so the
//! property can be checked numerically across a sweep of step sizes.

use std::collections::BTreeMap;

use lp_core::{ensure, errors::Result, Price, Real, Size};
use lp_instruments::{OptionContract, UP_PROBABILITY};
use lp_math::ln_binomial_coefficient;
use lp_methods::PriceLattice;
use tracing::debug;

use crate::binomial_engine::price;

fn lattice(spot: Price, step: Real, period: Size) -> Result<PriceLattice> {
    ensure!(
        step > 0.0 && step < 1.0,
        "step size must lie in (0, 1), got {step}"
    );
    PriceLattice::build(spot, 1.0 + step, 1.0 - step, period)
}

/// Expected underlying price after `period` periods.
///
/// `Σ_k S0 · u^k · d^(n−k) · C(n, k) · p^n`. Each path has probability
/// `p^n` because `p = 1 − p`. Every term is exponentiated from its
/// logarithm, so node prices that would overflow `f64` still contribute
/// their finite weighted share.
///
/// # Errors
/// [`InvalidParameter`](lp_core::Error::InvalidParameter) unless
/// `spot > 0` and `0 < step < 1`.
///
/// # Examples
///
/// ```
/// use lp_pricingengines::expected_terminal_price;
///
/// let e = expected_terminal_price(1.0, 0.9, 4).unwrap();
/// assert!((e - 1.0).abs() < 1e-12);
/// ```
pub fn expected_terminal_price(spot: Price, step: Real, period: Size) -> Result<Price> {
    ensure!(
        spot.is_finite() && spot > 0.0,
        "initial price must be positive, got {spot}"
    );
    ensure!(
        step > 0.0 && step < 1.0,
        "step size must lie in (0, 1), got {step}"
    );
    let (ln_up, ln_down) = ((1.0 + step).ln(), (1.0 - step).ln());
    let ln_path = period as Real * UP_PROBABILITY.ln();
    Ok((0..=period)
        .map(|k| {
            let ln_s = spot.ln() + k as Real * ln_up + (period - k) as Real * ln_down;
            (ln_s + ln_binomial_coefficient(period, k) + ln_path).exp()
        })
        .sum())
}

/// Expected running maximum `E[max_{0≤i≤n} S_i]` after `period` periods.
///
/// Computed exactly by propagating probability forward over the states
/// `(ups so far, node holding the running maximum)`. The maximum of a path
/// is always one of the lattice nodes it visited, so the state space stays
/// polynomial in `period`.
pub fn expected_path_maximum(spot: Price, step: Real, period: Size) -> Result<Price> {
    let lattice = lattice(spot, step, period)?;

    // (ups, argmax level, argmax ups) -> probability
    let mut states: BTreeMap<(Size, Size, Size), Real> = BTreeMap::new();
    states.insert((0, 0, 0), 1.0);

    for i in 0..period {
        let mut next = BTreeMap::new();
        for (&(j, ml, mj), &prob) in &states {
            let running = lattice.underlying(ml, mj);
            for branch in 0..=1 {
                let nj = lattice.descendant(j, branch);
                let key = if lattice.underlying(i + 1, nj) > running {
                    (nj, i + 1, nj)
                } else {
                    (nj, ml, mj)
                };
                *next.entry(key).or_insert(0.0) += prob * UP_PROBABILITY;
            }
        }
        states = next;
    }

    debug!(spot, step, period, states = states.len(), "propagated path maxima");
    Ok(states
        .iter()
        .map(|(&(_, ml, mj), prob)| prob * lattice.underlying(ml, mj))
        .sum())
}

/// One evaluated step size of an [`ExpectedSweep`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepPoint {
    /// Step size `v`.
    pub step: Real,
    /// `E[S_N]`.
    pub expected_terminal: Price,
    /// `E[max_{i≤N} S_i]`.
    pub expected_maximum: Price,
    /// European call value at this step size.
    pub option_value: Price,
}

/// Expected-value statistics over a list of step sizes.
///
/// Nothing is computed until iterated. Every iteration starts from the
/// first step size again, and an invalid step size fails only its own
/// element.
#[derive(Debug, Clone)]
pub struct ExpectedSweep {
    template: OptionContract,
    steps: Vec<Real>,
}

impl ExpectedSweep {
    /// Strike of the swept contract.
    pub fn strike(&self) -> Price {
        self.template.strike()
    }

    /// Period count `N`.
    pub fn periods(&self) -> Size {
        self.template.periods()
    }

    /// The step sizes, in sweep order.
    pub fn steps(&self) -> &[Real] {
        &self.steps
    }

    /// `(v, E[S_N])` for each step size, in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = Result<(Real, Price)>> + '_ {
        let (spot, n) = (self.template.spot(), self.template.periods());
        self.steps
            .iter()
            .map(move |&v| expected_terminal_price(spot, v, n).map(|e| (v, e)))
    }

    /// Full [`SweepPoint`]s, in sweep order.
    pub fn points(&self) -> impl Iterator<Item = Result<SweepPoint>> + '_ {
        self.steps.iter().map(move |&v| self.point(v))
    }

    /// Evaluate every point eagerly, stopping at the first error.
    ///
    /// Under the `parallel` feature the points are evaluated on the rayon
    /// pool; the result keeps sweep order either way.
    pub fn collect_sweep(&self) -> Result<Vec<SweepPoint>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.steps.par_iter().map(|&v| self.point(v)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.points().collect()
        }
    }

    fn point(&self, step: Real) -> Result<SweepPoint> {
        let contract = self.template.with_step(step)?;
        let (spot, n) = (contract.spot(), contract.periods());
        Ok(SweepPoint {
            step,
            expected_terminal: expected_terminal_price(spot, step, n)?,
            expected_maximum: expected_path_maximum(spot, step, n)?,
            option_value: price(&contract)?,
        })
    }
}

/// Sweep `E[S_N]` over `steps` for a European call `(strike, periods)`
/// with `S0 = 1`.
///
/// # Errors
/// [`InvalidParameter`](lp_core::Error::InvalidParameter) for a
/// non-positive strike. Bad step sizes are reported per element.
pub fn expected_sweep(
    strike: Price,
    periods: Size,
    steps: impl IntoIterator<Item = Real>,
) -> Result<ExpectedSweep> {
    // Any valid step will do for the template; each element re-validates its own.
    let template = OptionContract::european(strike, periods, 0.5)?;
    Ok(ExpectedSweep {
        template,
        steps: steps.into_iter().collect(),
    })
}
