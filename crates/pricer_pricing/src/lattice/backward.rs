//! Backward induction pricer.
//!
//! Terminal nodes take the payoff; each earlier node takes the discounted
//! expectation over its three children (empty children worth 0) and, for
//! American exercise, the larger of that and the immediate payoff.

use pricer_models::instruments::VanillaOption;

use super::node::{Lattice, Node, Transition};

/// Value of a node given its children's values.
///
/// Shared by the backward and recursive pricers so both produce the same
/// floating-point result for the same lattice.
#[inline]
pub(crate) fn node_value(
    option: &VanillaOption,
    node: &Node,
    transition: &Transition,
    children: [f64; 3],
    discount: f64,
) -> f64 {
    let hold = discount
        * (transition.p_down * children[0]
            + transition.p_mid * children[1]
            + transition.p_up * children[2]);
    if option.is_american() {
        hold.max(option.payoff(node.stock_price))
    } else {
        hold
    }
}

/// Bottom-up dynamic program over the lattice levels.
///
/// # Examples
/// ```
/// use pricer_models::instruments::VanillaOption;
/// use pricer_models::market::Market;
/// use pricer_pricing::lattice::{BackwardPricer, LatticeBuilder};
///
/// let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
/// let call = VanillaOption::european_call(100.0).unwrap();
/// let mut lattice = LatticeBuilder::new(&market, 200).unwrap().build();
///
/// let price = BackwardPricer.price(&mut lattice, &call);
/// assert!((price - 10.4506).abs() < 0.02);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardPricer;

impl BackwardPricer {
    /// Prices `option`, writing `option_value` into every surviving node,
    /// and returns the root value (0 if the root was pruned).
    pub fn price(&self, lattice: &mut Lattice, option: &VanillaOption) -> f64 {
        let discount = lattice.discount;
        let Some(terminal) = lattice.levels.last_mut() else {
            return 0.0;
        };
        for node in terminal.slots_mut().iter_mut().flatten() {
            node.option_value = Some(option.payoff(node.stock_price));
        }

        for i in (0..lattice.steps).rev() {
            let (head, tail) = lattice.levels.split_at_mut(i + 1);
            let next = &tail[0];
            for node in head[i].slots_mut().iter_mut().flatten() {
                let Some(transition) = node.transition else {
                    continue;
                };
                let [d, m, u] = transition.child_slots(i);
                let children = [next.value_at(d), next.value_at(m), next.value_at(u)];
                node.option_value = Some(node_value(option, node, &transition, children, discount));
            }
        }

        lattice
            .root()
            .and_then(|root| root.option_value)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeBuilder;
    use approx::assert_relative_eq;
    use pricer_models::analytical::BlackScholes;
    use pricer_models::market::Market;

    fn market() -> Market {
        Market::new(100.0, 0.05, 0.2, 1.0).unwrap()
    }

    fn price(market: &Market, option: &VanillaOption, steps: usize) -> f64 {
        let mut lattice = LatticeBuilder::new(market, steps).unwrap().build();
        BackwardPricer.price(&mut lattice, option)
    }

    #[test]
    fn test_european_call_close_to_black_scholes() {
        let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap().price_call(100.0, 1.0);
        let call = VanillaOption::european_call(100.0).unwrap();
        assert_relative_eq!(price(&market(), &call, 200), bs, epsilon = 0.02);
    }

    #[test]
    fn test_values_written_to_every_node() {
        let put = VanillaOption::american_put(100.0).unwrap();
        let mut lattice = LatticeBuilder::new(&market(), 30).unwrap().build();
        BackwardPricer.price(&mut lattice, &put);
        for level in lattice.levels() {
            for node in level.nodes() {
                let value = node.option_value.unwrap();
                assert!(value >= put.payoff(node.stock_price) - 1e-12);
            }
        }
    }

    #[test]
    fn test_single_step() {
        let call = VanillaOption::european_call(100.0).unwrap();
        let mut lattice = LatticeBuilder::new(&market(), 1).unwrap().build();
        let value = BackwardPricer.price(&mut lattice, &call);
        let t = lattice.root().unwrap().transition.unwrap();
        let terminal = &lattice.levels()[1];
        let expected = lattice.discount()
            * (t.p_down * call.payoff(terminal.node(-1).unwrap().stock_price)
                + t.p_mid * call.payoff(terminal.node(0).unwrap().stock_price)
                + t.p_up * call.payoff(terminal.node(1).unwrap().stock_price));
        assert_relative_eq!(value, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_deep_out_of_the_money_is_nearly_worthless() {
        let call = VanillaOption::european_call(1_000.0).unwrap();
        assert!(price(&market(), &call, 100) < 1e-8);
    }
}
