//! Property tests over the public API.

use lattice_pricer::methods::PriceLattice;
use lattice_pricer::{
    calibrate, expected_path_maximum, expected_terminal_price, price, BinomialLatticeEngine,
    ExerciseStyle, OptionContract, PricingRegime,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn european_regimes_agree(
        strike in 0.1f64..4.0,
        periods in 0usize..60,
        step in 0.01f64..0.99,
    ) {
        let c = OptionContract::european(strike, periods, step).unwrap();
        let closed = BinomialLatticeEngine::with_regime(PricingRegime::ClosedForm).npv(&c).unwrap();
        let induction = BinomialLatticeEngine::with_regime(PricingRegime::BackwardInduction)
            .npv(&c)
            .unwrap();
        prop_assert!((closed - induction).abs() <= 1e-10 * (1.0 + closed.abs()));
    }

    #[test]
    fn american_dominates_european(
        strike in 0.1f64..4.0,
        periods in 0usize..60,
        step in 0.01f64..0.99,
    ) {
        let eu = OptionContract::european(strike, periods, step).unwrap();
        let am = eu.with_style(ExerciseStyle::American);
        prop_assert!(price(&am).unwrap() >= price(&eu).unwrap() - 1e-12);
    }

    #[test]
    fn call_value_is_bounded(
        strike in 0.1f64..4.0,
        periods in 0usize..60,
        step in 0.01f64..0.99,
    ) {
        let p = price(&OptionContract::european(strike, periods, step).unwrap()).unwrap();
        prop_assert!(p >= (1.0 - strike).max(0.0) - 1e-12);
        prop_assert!(p <= 1.0 + 1e-12);
    }

    #[test]
    fn no_drift(step in 0.001f64..0.999, period in 0usize..120) {
        let e = expected_terminal_price(1.0, step, period).unwrap();
        prop_assert!((e - 1.0).abs() < 1e-9, "E[S_{period}] = {e}");
    }

    #[test]
    fn path_maximum_bounds(step in 0.01f64..0.99, period in 0usize..20) {
        let max = expected_path_maximum(1.0, step, period).unwrap();
        prop_assert!(max >= expected_terminal_price(1.0, step, period).unwrap() - 1e-12);
        prop_assert!(max >= 1.0 - 1e-12);
    }

    #[test]
    fn lattice_shape(periods in 0usize..80, step in 0.01f64..0.99, spot in 0.1f64..10.0) {
        let lattice = PriceLattice::build(spot, 1.0 + step, 1.0 - step, periods).unwrap();
        prop_assert_eq!(lattice.levels().count(), periods + 1);
        prop_assert_eq!(lattice.level(0), &[spot][..]);
        for (i, level) in lattice.levels().enumerate() {
            prop_assert_eq!(level.len(), i + 1);
            prop_assert!(level.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn calibration_round_trip(
        strike in 0.5f64..1.5,
        periods in 1usize..30,
        step in 0.05f64..0.9,
    ) {
        let contract = OptionContract::european(strike, periods, step).unwrap();
        let target = price(&contract).unwrap();
        let v = calibrate(strike, periods, target).unwrap();
        let repriced = price(&contract.with_step(v).unwrap()).unwrap();
        prop_assert!((repriced - target).abs() < 1e-8, "v {v}: {repriced} vs {target}");
        if target > (1.0 - strike).max(0.0) + 1e-6 {
            prop_assert!((v - step).abs() < 1e-6, "recovered {v}, expected {step}");
        }
    }
}
