//! Binomial lattice pricing engine.
//!
//! Two valuation regimes:
//!
//! * **Closed form**: the terminal payoffs weighted by their binomial
//!   probabilities, `Σ payoff[k] · C(N, k) · p^k · p^(N − k)`. European only.
//!   Every term is assembled in the log domain, so no lattice is built and
//!   node prices beyond `f64::MAX` still yield a finite value.
//! * **Backward induction**: collapse the terminal payoffs one level at a
//!   time, `value[j] = p · (value[j] + value[j + 1])`, comparing against
//!   immediate exercise after every collapse when the contract is American.
//!
//! Both regimes agree on European contracts. With a zero rate the discount
//! factor is 1 and does not appear in the recursion.

use lp_core::{ensure, errors::Result, Price, Real};
use lp_instruments::{
    ExerciseStyle, OptionContract, Payoff, PricingEngine, PricingResults, UP_PROBABILITY,
};
use lp_math::ln_binomial_weights;
use lp_methods::{roll_back, PriceLattice};
use tracing::debug;

/// Valuation regime used by [`BinomialLatticeEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PricingRegime {
    /// Direct binomial expectation of terminal payoffs.
    ClosedForm,
    /// Level-by-level backward induction.
    BackwardInduction,
}

/// Prices [`OptionContract`]s on a binomial lattice.
///
/// By default the regime follows the exercise style: closed form for
/// European contracts, backward induction for American ones. A fixed regime
/// can be forced with [`with_regime`](Self::with_regime).
#[derive(Debug, Clone, Copy, Default)]
pub struct BinomialLatticeEngine {
    regime: Option<PricingRegime>,
}

impl BinomialLatticeEngine {
    /// Engine dispatching on exercise style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that always uses `regime`.
    pub fn with_regime(regime: PricingRegime) -> Self {
        Self {
            regime: Some(regime),
        }
    }

    /// The regime this engine applies to `contract`.
    pub fn regime_for(&self, contract: &OptionContract) -> PricingRegime {
        self.regime.unwrap_or(if contract.style().allows_early_exercise() {
            PricingRegime::BackwardInduction
        } else {
            PricingRegime::ClosedForm
        })
    }

    /// Present value of `contract`.
    ///
    /// # Errors
    /// [`InvalidParameter`](lp_core::Error::InvalidParameter) when the
    /// closed form is forced on an American contract, or when backward
    /// induction needs a lattice whose node prices overflow.
    pub fn npv(&self, contract: &OptionContract) -> Result<Price> {
        let regime = self.regime_for(contract);
        debug!(
            strike = contract.strike(),
            periods = contract.periods(),
            step = contract.step(),
            style = %contract.style(),
            ?regime,
            "pricing on lattice"
        );
        match regime {
            PricingRegime::ClosedForm => {
                ensure!(
                    !contract.style().allows_early_exercise(),
                    "the closed form cannot value early exercise"
                );
                closed_form(contract)
            }
            PricingRegime::BackwardInduction => {
                let lattice = lattice_for(contract)?;
                Ok(backward_induction(contract, &lattice))
            }
        }
    }
}

impl PricingEngine<OptionContract> for BinomialLatticeEngine {
    fn calculate(&self, contract: &OptionContract) -> Result<PricingResults> {
        let npv = self.npv(contract)?;
        let nodes = PriceLattice::node_count_for(contract.periods());
        let mut results = PricingResults::from_npv(npv).with_result("lattice_nodes", nodes as Real);

        if contract.style().allows_early_exercise() {
            let european = contract.with_style(ExerciseStyle::European);
            let european_npv = closed_form(&european)?;
            results = results
                .with_result("european_npv", european_npv)
                .with_result("early_exercise_premium", npv - european_npv);
        }
        Ok(results)
    }
}

/// Fresh lattice for `contract`.
fn lattice_for(contract: &OptionContract) -> Result<PriceLattice> {
    PriceLattice::build(
        contract.spot(),
        contract.up(),
        contract.down(),
        contract.periods(),
    )
}

/// Price `contract` with the regime appropriate to its exercise style.
pub fn price(contract: &OptionContract) -> Result<Price> {
    BinomialLatticeEngine::new().npv(contract)
}

/// Terminal payoffs weighted by their binomial probabilities.
///
/// For an in-the-money node, `w_k · φ(S_k − K)` is formed as
/// `φ(exp(ln S_k + ln w_k) − exp(ln K + ln w_k))`, so neither `C(N, k)` nor
/// `u^k` is ever materialised.
fn closed_form(contract: &OptionContract) -> Result<Price> {
    let n = contract.periods();
    let (ln_up, ln_down) = (contract.up().ln(), contract.down().ln());
    let (ln_spot, ln_strike) = (contract.spot().ln(), contract.strike().ln());
    let phi = contract.option_type().sign();
    let ln_weights = ln_binomial_weights(n, UP_PROBABILITY)?;
    let expectation: Real = ln_weights
        .iter()
        .enumerate()
        .map(|(k, &ln_w)| {
            let ln_s = ln_spot + k as Real * ln_up + (n - k) as Real * ln_down;
            if phi * (ln_s - ln_strike) > 0.0 {
                phi * ((ln_s + ln_w).exp() - (ln_strike + ln_w).exp())
            } else {
                0.0
            }
        })
        .sum();
    Ok(contract.discount().powi(n as i32) * expectation)
}

/// Backward induction from the terminal payoffs, exercising early at every
/// level when the contract allows it.
fn backward_induction(contract: &OptionContract, lattice: &PriceLattice) -> Price {
    let payoff = contract.payoff();
    let terminal = payoff.terminal_values(lattice.terminal());
    let early = contract.style().allows_early_exercise();
    roll_back(
        lattice,
        terminal,
        UP_PROBABILITY,
        contract.discount(),
        |_, prices, values| {
            if early {
                payoff.exercise_against(values, prices);
            }
        },
    )
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lp_instruments::OptionType;
    use proptest::prelude::*;

    #[test]
    fn european_call_three_periods() {
        let c = OptionContract::european(1.1, 3, 0.5).unwrap();
        assert_abs_diff_eq!(price(&c).unwrap(), 0.29375, epsilon = 1e-12);
    }

    #[test]
    fn american_call_three_periods_has_no_premium() {
        let c = OptionContract::american(1.1, 3, 0.5).unwrap();
        let results = BinomialLatticeEngine::new().calculate(&c).unwrap();
        assert_abs_diff_eq!(results.npv, 0.29375, epsilon = 1e-12);
        assert_abs_diff_eq!(results.result("european_npv").unwrap(), 0.29375, epsilon = 1e-12);
        assert_abs_diff_eq!(
            results.result("early_exercise_premium").unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_eq!(results.result("lattice_nodes"), Some(10.0));
    }

    #[test]
    fn zero_periods_is_intrinsic_value() {
        for style in [ExerciseStyle::European, ExerciseStyle::American] {
            let itm = OptionContract::builder(0.8, 0, 0.3)
                .style(style)
                .build()
                .unwrap();
            assert_abs_diff_eq!(price(&itm).unwrap(), 0.2, epsilon = 1e-15);
            let otm = OptionContract::builder(1.2, 0, 0.3)
                .style(style)
                .build()
                .unwrap();
            assert_abs_diff_eq!(price(&otm).unwrap(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn closed_form_refuses_american_contracts() {
        let c = OptionContract::american(1.0, 3, 0.5).unwrap();
        let err = BinomialLatticeEngine::with_regime(PricingRegime::ClosedForm)
            .npv(&c)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn regime_dispatch_follows_style() {
        let engine = BinomialLatticeEngine::new();
        let eu = OptionContract::european(1.0, 3, 0.5).unwrap();
        let am = OptionContract::american(1.0, 3, 0.5).unwrap();
        assert_eq!(engine.regime_for(&eu), PricingRegime::ClosedForm);
        assert_eq!(engine.regime_for(&am), PricingRegime::BackwardInduction);
        let forced = BinomialLatticeEngine::with_regime(PricingRegime::BackwardInduction);
        assert_eq!(forced.regime_for(&eu), PricingRegime::BackwardInduction);
    }

    #[test]
    fn american_put_exercises_early_only_with_value() {
        // Zero rate: early exercise of a put never beats holding.
        let put = OptionContract::builder(1.1, 6, 0.3)
            .option_type(OptionType::Put)
            .build()
            .unwrap();
        let eu = price(&put).unwrap();
        let am = price(&put.with_style(ExerciseStyle::American)).unwrap();
        assert_abs_diff_eq!(am, eu, epsilon = 1e-12);
    }

    #[test]
    fn overflowing_lattice_never_prices_as_non_finite() {
        // u^1200 = 1.9^1200 overflows f64.
        let eu = OptionContract::european(1.0, 1200, 0.9).unwrap();
        let closed = price(&eu).unwrap();
        assert!(closed.is_finite(), "closed form {closed}");
        // In the money only beyond ~939 ups: almost no probability, but
        // nearly all of the price-weighted mass.
        assert_abs_diff_eq!(closed, 1.0, epsilon = 1e-9);

        let induction = BinomialLatticeEngine::with_regime(PricingRegime::BackwardInduction).npv(&eu);
        assert!(induction.unwrap_err().is_invalid_parameter());
        let am = OptionContract::american(1.0, 1200, 0.9).unwrap();
        assert!(price(&am).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn large_period_count_stays_finite() {
        let c = OptionContract::european(1.0, 2000, 0.01).unwrap();
        let closed = price(&c).unwrap();
        let induction = BinomialLatticeEngine::with_regime(PricingRegime::BackwardInduction)
            .npv(&c)
            .unwrap();
        assert!(closed.is_finite());
        assert_abs_diff_eq!(closed, induction, epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn closed_form_matches_backward_induction(
            strike in 0.2f64..3.0,
            periods in 0usize..40,
            step in 0.01f64..0.99,
        ) {
            let c = OptionContract::european(strike, periods, step).unwrap();
            let closed = BinomialLatticeEngine::with_regime(PricingRegime::ClosedForm).npv(&c).unwrap();
            let induction = BinomialLatticeEngine::with_regime(PricingRegime::BackwardInduction).npv(&c).unwrap();
            prop_assert!((closed - induction).abs() < 1e-10 * (1.0 + closed.abs()),
                "closed {closed} vs induction {induction}");
        }

        #[test]
        fn american_never_below_european(
            strike in 0.2f64..3.0,
            periods in 0usize..40,
            step in 0.01f64..0.99,
        ) {
            let eu = OptionContract::european(strike, periods, step).unwrap();
            let am = eu.with_style(ExerciseStyle::American);
            prop_assert!(price(&am).unwrap() >= price(&eu).unwrap() - 1e-12);
        }
    }
}
