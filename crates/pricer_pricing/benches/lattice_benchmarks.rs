//! Criterion benchmarks for the trinomial lattice.
//!
//! Benchmarks cover:
//! - Lattice construction and calibration
//! - Backward vs recursive pricing, with and without pruning
//! - Parallel vs sequential Greeks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_models::instruments::VanillaOption;
use pricer_models::market::{DividendPolicy, Market};
use pricer_pricing::greeks::{GreeksConfig, SensitivityEngine};
use pricer_pricing::lattice::{
    propagate_reach, prune, BackwardPricer, LatticeBuilder, LatticeEngine, PricingMethod,
    PricingRequest, PruningThreshold, RecursivePricer,
};

fn market() -> Market {
    Market::builder()
        .spot(100.0)
        .rate(0.05)
        .volatility(0.2)
        .maturity(1.0)
        .dividend(0.5, DividendPolicy::with_yield(0.02).unwrap())
        .build()
        .unwrap()
}

/// Benchmark lattice construction (trunk, prices and calibration).
fn bench_lattice_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_build");
    let market = market();

    for steps in [100, 300, 1_000] {
        group.bench_with_input(BenchmarkId::new("build", steps), &steps, |b, &n| {
            b.iter(|| black_box(LatticeBuilder::new(&market, n).unwrap().build()));
        });
    }

    group.finish();
}

/// Benchmark both pricers on a prebuilt lattice.
fn bench_pricers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_pricers");
    group.sample_size(30);
    let market = market();
    let put = VanillaOption::american_put(100.0).unwrap();

    for steps in [100, 300, 1_000] {
        let lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        let mut pruned = lattice.clone();
        propagate_reach(&mut pruned);
        prune(&mut pruned, PruningThreshold::new(1e-7).unwrap());

        group.bench_with_input(BenchmarkId::new("backward", steps), &lattice, |b, l| {
            b.iter(|| BackwardPricer.price(&mut l.clone(), black_box(&put)));
        });
        group.bench_with_input(BenchmarkId::new("backward_pruned", steps), &pruned, |b, l| {
            b.iter(|| BackwardPricer.price(&mut l.clone(), black_box(&put)));
        });
        group.bench_with_input(BenchmarkId::new("recursive", steps), &lattice, |b, l| {
            let mut pricer = RecursivePricer::new();
            b.iter(|| pricer.price(&mut l.clone(), black_box(&put)));
        });
        group.bench_with_input(BenchmarkId::new("recursive_pruned", steps), &pruned, |b, l| {
            let mut pricer = RecursivePricer::new();
            b.iter(|| pricer.price(&mut l.clone(), black_box(&put)));
        });
    }

    group.finish();
}

/// Benchmark the full pipeline through the engine facade.
fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_engine");
    group.sample_size(20);

    for method in PricingMethod::ALL {
        let request = PricingRequest::builder()
            .market(market())
            .option(VanillaOption::american_put(100.0).unwrap())
            .steps(500)
            .method(method)
            .pruning(1e-7)
            .build()
            .unwrap();
        group.bench_function(BenchmarkId::new("price_500", method), |b| {
            b.iter(|| LatticeEngine::price_value(black_box(&request)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark Greeks revaluation, parallel vs sequential.
fn bench_greeks(c: &mut Criterion) {
    let mut group = c.benchmark_group("greeks");
    group.sample_size(10);

    let request = PricingRequest::builder()
        .market(market())
        .option(VanillaOption::american_put(100.0).unwrap())
        .steps(200)
        .build()
        .unwrap();

    for parallel in [false, true] {
        let engine =
            SensitivityEngine::new(GreeksConfig::builder().parallel(parallel).build().unwrap());
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(BenchmarkId::new("all_greeks_200", label), |b| {
            b.iter(|| engine.compute(black_box(&request)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lattice_build,
    bench_pricers,
    bench_engine,
    bench_greeks
);
criterion_main!(benches);
