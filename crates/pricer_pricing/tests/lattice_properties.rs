//! Property-based tests for lattice invariants.

use pricer_models::instruments::VanillaOption;
use pricer_models::market::{DividendPolicy, Market};
use pricer_pricing::lattice::{
    propagate_reach, prune, BackwardPricer, LatticeBuilder, PruningThreshold, RecursivePricer,
};
use proptest::prelude::*;

fn market_strategy() -> impl Strategy<Value = Market> {
    (
        50.0..150.0_f64,
        -0.02..0.10_f64,
        0.05..0.6_f64,
        0.1..2.0_f64,
        proptest::option::of((0.1..0.9_f64, 0.0..0.05_f64, 0.0..2.0_f64)),
    )
        .prop_map(|(spot, rate, vol, maturity, dividend)| {
            let mut builder = Market::builder()
                .spot(spot)
                .rate(rate)
                .volatility(vol)
                .maturity(maturity);
            if let Some((fraction, rho, lam)) = dividend {
                builder = builder.dividend(
                    fraction * maturity,
                    DividendPolicy::new(rho, lam, 0.0).unwrap(),
                );
            }
            builder.build().unwrap()
        })
}

fn option_strategy() -> impl Strategy<Value = VanillaOption> {
    (60.0..140.0_f64, 0..4_u8).prop_map(|(strike, kind)| match kind {
        0 => VanillaOption::european_call(strike).unwrap(),
        1 => VanillaOption::european_put(strike).unwrap(),
        2 => VanillaOption::american_call(strike).unwrap(),
        _ => VanillaOption::american_put(strike).unwrap(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn transitions_form_a_simplex(market in market_strategy(), steps in 1usize..60) {
        let lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        for level in lattice.levels().iter().take(steps) {
            for node in level.nodes() {
                let t = node.transition.unwrap();
                for p in t.probabilities() {
                    prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
                }
                prop_assert!((t.total() - 1.0).abs() < 1e-9);
                let i = level.index() as i64;
                prop_assert!(t.kprime >= -i && t.kprime <= i);
            }
        }
    }

    #[test]
    fn lattice_has_triangular_shape(market in market_strategy(), steps in 1usize..60) {
        let lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        prop_assert_eq!(lattice.levels().len(), steps + 1);
        for (i, level) in lattice.levels().iter().enumerate() {
            prop_assert_eq!(level.len(), 2 * i + 1);
            prop_assert!(level.nodes().all(|n| n.stock_price > 0.0));
        }
    }

    #[test]
    fn backward_and_recursive_agree(
        market in market_strategy(),
        option in option_strategy(),
        steps in 1usize..80,
        threshold in proptest::option::of(0.0..1e-3_f64),
    ) {
        let mut lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        if let Some(t) = threshold {
            propagate_reach(&mut lattice);
            prune(&mut lattice, PruningThreshold::new(t).unwrap());
        }
        let backward = BackwardPricer.price(&mut lattice.clone(), &option);
        let recursive = RecursivePricer::new().price(&mut lattice, &option);
        prop_assert!((backward - recursive).abs() < 1e-8);
    }

    #[test]
    fn zero_threshold_is_no_pruning(
        market in market_strategy(),
        option in option_strategy(),
        steps in 1usize..60,
    ) {
        let mut plain = LatticeBuilder::new(&market, steps).unwrap().build();
        let mut reached = plain.clone();
        propagate_reach(&mut reached);
        prop_assert_eq!(prune(&mut reached, PruningThreshold::new(0.0).unwrap()), 0);
        prop_assert_eq!(
            BackwardPricer.price(&mut plain, &option),
            BackwardPricer.price(&mut reached, &option)
        );
    }

    #[test]
    fn american_dominates_european(
        market in market_strategy(),
        strike in 60.0..140.0_f64,
        steps in 1usize..60,
    ) {
        let lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        for (american, european) in [
            (VanillaOption::american_call(strike).unwrap(), VanillaOption::european_call(strike).unwrap()),
            (VanillaOption::american_put(strike).unwrap(), VanillaOption::european_put(strike).unwrap()),
        ] {
            let a = BackwardPricer.price(&mut lattice.clone(), &american);
            let e = BackwardPricer.price(&mut lattice.clone(), &european);
            prop_assert!(a >= e - 1e-12);
            prop_assert!(e >= 0.0);
        }
    }

    #[test]
    fn reach_mass_is_conserved(market in market_strategy(), steps in 1usize..60) {
        let mut lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        let mass = propagate_reach(&mut lattice);
        prop_assert!((mass - 1.0).abs() < 1e-9);
    }
}
