use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lattice_pricer::{
    calibrate, expected_path_maximum, price, BinomialLatticeEngine, OptionContract, PricingRegime,
};
use std::hint::black_box;

fn bench_regimes(c: &mut Criterion) {
    let mut group = c.benchmark_group("european_call");
    for periods in [10usize, 100, 1000] {
        let call = OptionContract::european(1.0, periods, 0.5 / (periods as f64).sqrt())
            .expect("benchmark contract should be valid");
        for regime in [PricingRegime::ClosedForm, PricingRegime::BackwardInduction] {
            let engine = BinomialLatticeEngine::with_regime(regime);
            group.bench_with_input(
                BenchmarkId::new(format!("{regime:?}"), periods),
                &call,
                |b, call| b.iter(|| black_box(engine.npv(black_box(call)).expect("pricing"))),
            );
        }
    }
    group.finish();
}

fn bench_american(c: &mut Criterion) {
    let call = OptionContract::american(1.0, 500, 0.02).expect("benchmark contract should be valid");
    c.bench_function("american_call_500", |b| {
        b.iter(|| black_box(price(black_box(&call)).expect("pricing")))
    });
}

fn bench_calibration(c: &mut Criterion) {
    let target = price(&OptionContract::european(1.0, 50, 0.07).expect("valid")).expect("pricing");
    c.bench_function("calibrate_n50", |b| {
        b.iter(|| black_box(calibrate(1.0, 50, black_box(target)).expect("calibration")))
    });
}

fn bench_path_maximum(c: &mut Criterion) {
    c.bench_function("expected_path_maximum_n20", |b| {
        b.iter(|| black_box(expected_path_maximum(1.0, black_box(0.1), 20).expect("statistics")))
    });
}

criterion_group!(
    benches,
    bench_regimes,
    bench_american,
    bench_calibration,
    bench_path_maximum
);
criterion_main!(benches);
