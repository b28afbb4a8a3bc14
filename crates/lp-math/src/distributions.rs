//! Binomial coefficients and path weights.
//!
//! Lattice expectations need `C(n, k) · p^k · (1 − p)^(n − k)` for every
//! terminal node. Computing `C(n, k)` directly overflows `f64` once `n`
//! passes roughly 1030, so the weights are assembled in the log domain on
//! top of `statrs`' `ln_binomial`.

use lp_core::{ensure, errors::Result, Probability, Real, Size};
use statrs::function::factorial::ln_binomial;

/// Natural logarithm of the binomial coefficient `C(n, k)`.
///
/// Returns `-inf` when `k > n`, matching `ln(0)`.
pub fn ln_binomial_coefficient(n: Size, k: Size) -> Real {
    if k > n {
        return f64::NEG_INFINITY;
    }
    ln_binomial(n as u64, k as u64)
}

/// Natural logarithms of the risk-neutral weights of the `n + 1` terminal
/// nodes of an `n`-period binomial lattice with up-probability `p`.
///
/// Element `k` is `ln P(k up-moves)`. Staying in the log domain lets callers
/// fold in node prices that would themselves overflow, e.g. `u^k` for large
/// `k`, before exponentiating.
pub fn ln_binomial_weights(n: Size, p: Probability) -> Result<Vec<Real>> {
    ensure!(
        (0.0..=1.0).contains(&p),
        "probability must lie in [0, 1], got {p}"
    );
    if p == 0.0 || p == 1.0 {
        let hit = if p == 0.0 { 0 } else { n };
        return Ok((0..=n)
            .map(|k| if k == hit { 0.0 } else { f64::NEG_INFINITY })
            .collect());
    }
    let (ln_p, ln_q) = (p.ln(), (1.0 - p).ln());
    Ok((0..=n)
        .map(|k| ln_binomial_coefficient(n, k) + k as Real * ln_p + (n - k) as Real * ln_q)
        .collect())
}
