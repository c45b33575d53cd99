//! Reach-probability pruning.
//!
//! Nodes whose reach probability falls below a threshold are removed from
//! the lattice. Removed nodes contribute zero to their parents'
//! continuation value, so aggressive thresholds bias prices low.

use super::error::LatticeError;
use super::node::Lattice;

/// Validated pruning threshold in `[0, 1)`.
///
/// Zero prunes nothing. Values below 1 never prune the root, whose reach
/// probability is 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PruningThreshold(f64);

impl PruningThreshold {
    /// Validates `threshold`.
    ///
    /// # Errors
    /// `LatticeError::InvalidPruningThreshold` unless finite and in `[0, 1)`.
    pub fn new(threshold: f64) -> Result<Self, LatticeError> {
        if !threshold.is_finite() || !(0.0..1.0).contains(&threshold) {
            return Err(LatticeError::InvalidPruningThreshold(threshold));
        }
        Ok(Self(threshold))
    }

    /// Raw threshold.
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Empties every slot whose node has `p_reach < threshold`.
///
/// Reach probabilities must already be propagated. Returns the number of
/// nodes removed.
pub fn prune(lattice: &mut Lattice, threshold: PruningThreshold) -> usize {
    let cut = threshold.value();
    let mut pruned = 0;
    for level in lattice.levels.iter_mut() {
        for slot in level.slots_mut() {
            if slot.as_ref().is_some_and(|n| n.p_reach < cut) {
                *slot = None;
                pruned += 1;
            }
        }
    }
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{propagate_reach, LatticeBuilder};
    use pricer_models::market::Market;

    fn reached_lattice(steps: usize) -> Lattice {
        let market = Market::new(100.0, 0.05, 0.2, 1.0).unwrap();
        let mut lattice = LatticeBuilder::new(&market, steps).unwrap().build();
        propagate_reach(&mut lattice);
        lattice
    }

    #[test]
    fn test_threshold_validation() {
        assert!(PruningThreshold::new(0.0).is_ok());
        assert!(PruningThreshold::new(0.999).is_ok());
        for bad in [-1e-9, 1.0, 2.0, f64::NAN, f64::INFINITY] {
            assert!(PruningThreshold::new(bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_zero_threshold_prunes_nothing() {
        let mut lattice = reached_lattice(50);
        let before = lattice.clone();
        assert_eq!(prune(&mut lattice, PruningThreshold::new(0.0).unwrap()), 0);
        assert_eq!(before, lattice);
    }

    #[test]
    fn test_pruning_removes_tails_but_keeps_root() {
        let mut lattice = reached_lattice(100);
        let total = lattice.node_count();
        let pruned = prune(&mut lattice, PruningThreshold::new(1e-7).unwrap());
        assert!(pruned > 0);
        assert_eq!(lattice.node_count(), total - pruned);
        assert!(lattice.root().is_some());
        // Extreme corners are unreachable in practice.
        let last = lattice.levels().last().unwrap();
        assert!(last.slots()[0].is_none());
        assert!(last.slots()[last.len() - 1].is_none());
        // Shape is preserved: pruning empties slots, it does not remove them.
        assert_eq!(last.len(), 201);
    }

    #[test]
    fn test_surviving_nodes_meet_threshold() {
        let mut lattice = reached_lattice(60);
        let threshold = PruningThreshold::new(1e-4).unwrap();
        prune(&mut lattice, threshold);
        assert!(lattice
            .levels()
            .iter()
            .flat_map(|l| l.nodes())
            .all(|n| n.p_reach >= threshold.value()));
    }
}
