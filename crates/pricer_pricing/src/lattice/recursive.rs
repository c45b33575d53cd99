//! Memoized top-down pricer.
//!
//! Evaluates the same recursion as [`BackwardPricer`](super::BackwardPricer)
//! starting from the root, memoizing each `(level, slot)` value. The
//! traversal uses an explicit work stack so deep lattices do not exhaust
//! the thread stack.

use pricer_models::instruments::VanillaOption;

use super::backward::node_value;
use super::node::Lattice;

/// Per-valuation memo table indexed by `(level, slot)`.
///
/// Sized for one lattice at the start of a pricing call and emptied at the
/// end of it, so nothing leaks between lattices.
#[derive(Debug, Default, Clone)]
pub struct MemoCache {
    values: Vec<Vec<Option<f64>>>,
}

impl MemoCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn reset_for(&mut self, lattice: &Lattice) {
        self.values.clear();
        self.values
            .extend(lattice.levels().iter().map(|l| vec![None; l.len()]));
    }

    #[inline]
    fn get(&self, level: usize, slot: usize) -> Option<f64> {
        self.values[level][slot]
    }

    #[inline]
    fn insert(&mut self, level: usize, slot: usize, value: f64) {
        self.values[level][slot] = Some(value);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of memoized values.
    pub fn len(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_some()).count()
    }

    /// True when nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Top-down pricer owning its memo cache.
///
/// # Examples
/// ```
/// use pricer_models::instruments::VanillaOption;
/// use pricer_models::market::Market;
/// use pricer_pricing::lattice::{BackwardPricer, LatticeBuilder, RecursivePricer};
///
/// let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
/// let put = VanillaOption::american_put(100.0).unwrap();
/// let lattice = LatticeBuilder::new(&market, 80).unwrap().build();
///
/// let mut recursive = RecursivePricer::new();
/// let top_down = recursive.price(&mut lattice.clone(), &put);
/// let bottom_up = BackwardPricer.price(&mut lattice.clone(), &put);
/// assert!((top_down - bottom_up).abs() < 1e-8);
/// assert!(recursive.cache().is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecursivePricer {
    cache: MemoCache,
}

impl RecursivePricer {
    /// Pricer with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The memo cache; empty between calls.
    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    /// Prices `option` from the root, writing `option_value` into every node
    /// the recursion visits. Returns 0 if the root was pruned.
    pub fn price(&mut self, lattice: &mut Lattice, option: &VanillaOption) -> f64 {
        if lattice.root().is_none() {
            return 0.0;
        }
        self.cache.reset_for(lattice);
        let value = self.evaluate(lattice, option);
        self.write_back(lattice);
        self.cache.clear();
        value
    }

    fn evaluate(&mut self, lattice: &Lattice, option: &VanillaOption) -> f64 {
        let steps = lattice.steps();
        let discount = lattice.discount();
        let levels = lattice.levels();
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];

        while let Some(&(i, slot)) = stack.last() {
            if self.cache.get(i, slot).is_some() {
                stack.pop();
                continue;
            }
            let node = match levels[i].slots()[slot].as_ref() {
                Some(node) => node,
                None => {
                    self.cache.insert(i, slot, 0.0);
                    stack.pop();
                    continue;
                }
            };
            let transition = match node.transition {
                Some(t) if i < steps => t,
                _ => {
                    self.cache.insert(i, slot, option.payoff(node.stock_price));
                    stack.pop();
                    continue;
                }
            };

            let child_slots = transition.child_slots(i);
            let pending: Vec<usize> = child_slots
                .iter()
                .copied()
                .filter(|&c| self.cache.get(i + 1, c).is_none())
                .collect();
            if !pending.is_empty() {
                stack.extend(pending.into_iter().map(|c| (i + 1, c)));
                continue;
            }

            let children = child_slots.map(|c| self.cache.get(i + 1, c).unwrap_or(0.0));
            let value = node_value(option, node, &transition, children, discount);
            self.cache.insert(i, slot, value);
            stack.pop();
        }

        self.cache.get(0, 0).unwrap_or(0.0)
    }

    fn write_back(&self, lattice: &mut Lattice) {
        for (level, memo) in lattice.levels.iter_mut().zip(&self.cache.values) {
            for (slot, value) in level.slots_mut().iter_mut().zip(memo) {
                if let (Some(node), Some(v)) = (slot.as_mut(), value) {
                    node.option_value = Some(*v);
                }
            }
        }
    }
}
