//! End-to-end pricing, calibration and statistics scenarios.

use approx::assert_abs_diff_eq;
use lattice_pricer::{
    calibrate, expected_sweep, expected_terminal_price, price, BinomialLatticeEngine,
    CalibrationConfig, Calibrator, ExerciseStyle, OptionContract, PricingEngine, PricingRegime,
    SolverMethod,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn european_call_k110_n3_v50() {
    init_logging();
    let call = OptionContract::european(1.1, 3, 0.5).unwrap();
    assert_abs_diff_eq!(price(&call).unwrap(), 0.29375, epsilon = 1e-12);
}

#[test]
fn american_call_k110_n3_v50() {
    init_logging();
    let call = OptionContract::american(1.1, 3, 0.5).unwrap();
    assert_abs_diff_eq!(price(&call).unwrap(), 0.29375, epsilon = 1e-12);
}

#[test]
fn calibrate_k100_n3_recovers_half() {
    init_logging();
    let v = calibrate(1.0, 3, 0.34375).unwrap();
    assert_abs_diff_eq!(v, 0.5, epsilon = 1e-8);
}

#[test]
fn expected_terminal_price_n4_v90() {
    assert_abs_diff_eq!(expected_terminal_price(1.0, 0.9, 4).unwrap(), 1.0, epsilon = 1e-12);
    let sweep = expected_sweep(1.1, 4, [0.9]).unwrap();
    let (v, e) = sweep.iter().next().unwrap().unwrap();
    assert_eq!(v, 0.9);
    assert_abs_diff_eq!(e, 1.0, epsilon = 1e-12);
}

#[test]
fn zero_periods_returns_intrinsic_value() {
    for style in [ExerciseStyle::European, ExerciseStyle::American] {
        for (strike, intrinsic) in [(0.75, 0.25), (1.0, 0.0), (1.3, 0.0)] {
            let c = OptionContract::builder(strike, 0, 0.4)
                .style(style)
                .build()
                .unwrap();
            assert_abs_diff_eq!(price(&c).unwrap(), intrinsic, epsilon = 1e-15);
        }
    }
}

#[test]
fn invalid_contracts_are_rejected_at_construction() {
    assert!(OptionContract::european(1.1, 3, 0.0).unwrap_err().is_invalid_parameter());
    assert!(OptionContract::european(1.1, 3, 1.0).unwrap_err().is_invalid_parameter());
    assert!(OptionContract::european(0.0, 3, 0.5).unwrap_err().is_invalid_parameter());
    assert!(OptionContract::builder(1.1, 3, 0.5)
        .spot(-1.0)
        .build()
        .unwrap_err()
        .is_invalid_parameter());
}

#[test]
fn engine_reports_european_value_for_american_contracts() {
    let engine = BinomialLatticeEngine::new();
    let results = engine
        .calculate(&OptionContract::american(0.9, 5, 0.2).unwrap())
        .unwrap();
    let european = results.result("european_npv").unwrap();
    let premium = results.result("early_exercise_premium").unwrap();
    assert_abs_diff_eq!(results.npv, european + premium, epsilon = 1e-14);
    assert!(premium >= -1e-14);

    let forced = BinomialLatticeEngine::with_regime(PricingRegime::BackwardInduction);
    let eu = OptionContract::european(0.9, 5, 0.2).unwrap();
    assert_abs_diff_eq!(forced.npv(&eu).unwrap(), european, epsilon = 1e-12);
}

#[test]
fn unattainable_price_fails_calibration() {
    init_logging();
    let err = calibrate(1.1, 3, 2.0).unwrap_err();
    assert!(err.is_calibration_failure(), "got {err}");
}

#[test]
fn configured_calibrator_accepts_other_solvers() {
    let calibrator = Calibrator::new(
        CalibrationConfig::builder()
            .method(SolverMethod::FdNewtonSafe)
            .accuracy(1e-13)
            .build(),
    );
    let target = price(&OptionContract::european(1.05, 7, 0.3).unwrap()).unwrap();
    let v = calibrator.calibrate(1.05, 7, target).unwrap();
    let repriced = price(&OptionContract::european(1.05, 7, v).unwrap()).unwrap();
    assert_abs_diff_eq!(repriced, target, epsilon = 1e-10);
}
