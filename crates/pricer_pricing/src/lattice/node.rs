//! Lattice storage: nodes, levels and the lattice arena.
//!
//! Level `i` holds `2i + 1` slots for offsets `k ∈ [-i, i]`; slot index is
//! `k + i`. A pruned node is an empty slot (`None`), and every consumer
//! treats an empty slot as contributing zero value and zero probability.
//!
//! Each pricing phase writes its own node field: the builder fills
//! `stock_price` and `transition`, reach propagation fills `p_reach`, and the
//! pricers fill `option_value`.

/// One-step transition out of a node.
///
/// Children sit at offsets `kprime - 1`, `kprime`, `kprime + 1` of the next
/// level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Transition {
    /// Probability of moving to `kprime - 1`.
    pub p_down: f64,
    /// Probability of moving to `kprime`.
    pub p_mid: f64,
    /// Probability of moving to `kprime + 1`.
    pub p_up: f64,
    /// Offset of the middle child in the next level.
    pub kprime: i64,
}

impl Transition {
    /// All mass on the middle child.
    #[inline]
    pub fn certain(kprime: i64) -> Self {
        Self {
            p_down: 0.0,
            p_mid: 1.0,
            p_up: 0.0,
            kprime,
        }
    }

    /// Slot indices of the down, middle and up children in level `level + 1`.
    #[inline]
    pub fn child_slots(&self, level: usize) -> [usize; 3] {
        let base = (self.kprime + level as i64 + 1) as usize;
        [base - 1, base, base + 1]
    }

    /// Probabilities in child order (down, middle, up).
    #[inline]
    pub fn probabilities(&self) -> [f64; 3] {
        [self.p_down, self.p_mid, self.p_up]
    }

    /// Sum of the three probabilities.
    #[inline]
    pub fn total(&self) -> f64 {
        self.p_down + self.p_mid + self.p_up
    }
}

/// A lattice node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    /// Level index `i`.
    pub time_index: usize,
    /// Offset `k ∈ [-i, i]` from the trunk.
    pub offset: i64,
    /// Underlying price at this node.
    pub stock_price: f64,
    /// Calibrated transition; `None` on the terminal level.
    pub transition: Option<Transition>,
    /// Probability of reaching this node from the root.
    pub p_reach: f64,
    /// Option value once priced.
    pub option_value: Option<f64>,
}

impl Node {
    pub(crate) fn new(time_index: usize, offset: i64, stock_price: f64) -> Self {
        Self {
            time_index,
            offset,
            stock_price,
            transition: None,
            p_reach: 0.0,
            option_value: None,
        }
    }
}

/// One time level of the lattice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Level {
    index: usize,
    slots: Vec<Option<Node>>,
}

impl Level {
    pub(crate) fn new(index: usize, slots: Vec<Option<Node>>) -> Self {
        Self { index, slots }
    }

    /// Level index `i`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// All slots, pruned ones included as `None`.
    #[inline]
    pub fn slots(&self) -> &[Option<Node>] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<Node>] {
        &mut self.slots
    }

    /// Number of slots (`2i + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: a level has at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Node at offset `k`, or `None` when out of range or pruned.
    pub fn node(&self, offset: i64) -> Option<&Node> {
        let slot = offset + self.index as i64;
        if slot < 0 {
            return None;
        }
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    /// Iterates over surviving nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }

    /// Number of surviving nodes.
    pub fn live_count(&self) -> usize {
        self.nodes().count()
    }

    /// Value stored in a slot, with empty slots and unpriced nodes worth 0.
    #[inline]
    pub(crate) fn value_at(&self, slot: usize) -> f64 {
        self.slots[slot]
            .as_ref()
            .and_then(|n| n.option_value)
            .unwrap_or(0.0)
    }
}

/// Recombining trinomial lattice.
///
/// Owns its nodes; built once per pricing request and dropped after the
/// price is read unless the caller asked to keep it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lattice {
    pub(crate) steps: usize,
    pub(crate) dt: f64,
    pub(crate) alpha: f64,
    pub(crate) exp_sig2_dt: f64,
    pub(crate) discount: f64,
    pub(crate) trunk: Vec<f64>,
    pub(crate) levels: Vec<Level>,
}

impl Lattice {
    /// Number of steps `N`.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Step length `T / N`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Spacing multiplier `exp(σ √(3 dt))`.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `exp(σ² dt)`.
    #[inline]
    pub fn exp_sig2_dt(&self) -> f64 {
        self.exp_sig2_dt
    }

    /// One-step discount factor `exp(-r dt)`.
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Central price per level, `trunk[0] = S0`.
    #[inline]
    pub fn trunk(&self) -> &[f64] {
        &self.trunk
    }

    /// Levels `0..=N`.
    #[inline]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level `i`.
    #[inline]
    pub fn level(&self, i: usize) -> Option<&Level> {
        self.levels.get(i)
    }

    /// The root node, absent only if the lattice is empty.
    pub fn root(&self) -> Option<&Node> {
        self.levels.first().and_then(|l| l.slots.first()).and_then(Option::as_ref)
    }

    /// Total slot count, pruned slots included.
    pub fn slot_count(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    /// Number of surviving nodes.
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(Level::live_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_slots() {
        // Node at level 3 centred on kprime = -3 → children at offsets -4..-2,
        // i.e. slots 0..2 of level 4.
        assert_eq!(Transition::certain(-3).child_slots(3), [0, 1, 2]);
        assert_eq!(Transition::certain(3).child_slots(3), [6, 7, 8]);
        assert_eq!(Transition::certain(0).child_slots(0), [0, 1, 2]);
    }

    #[test]
    fn test_level_lookup_and_empty_slots() {
        let level = Level::new(
            1,
            vec![Some(Node::new(1, -1, 90.0)), None, Some(Node::new(1, 1, 110.0))],
        );
        assert_eq!(level.len(), 3);
        assert_eq!(level.live_count(), 2);
        assert_eq!(level.node(-1).map(|n| n.stock_price), Some(90.0));
        assert!(level.node(0).is_none());
        assert!(level.node(2).is_none());
        assert!(level.node(-2).is_none());
        assert_eq!(level.value_at(1), 0.0);
    }
}
