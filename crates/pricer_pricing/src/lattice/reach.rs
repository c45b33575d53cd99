//! Forward reach-probability propagation.
//!
//! Transports probability mass from the root through the calibrated
//! transitions: each node with positive mass sends `p_reach * p` to its
//! three children. The terminal level is renormalised to absorb rounding
//! drift.

use super::node::Lattice;

/// Fills `p_reach` on every node of `lattice`.
///
/// Empty child slots receive nothing. Returns the terminal mass before
/// renormalisation (1 up to rounding on an unpruned lattice).
pub fn propagate_reach(lattice: &mut Lattice) -> f64 {
    for level in lattice.levels.iter_mut() {
        for node in level.slots_mut().iter_mut().flatten() {
            node.p_reach = 0.0;
        }
    }
    if let Some(root) = lattice
        .levels
        .first_mut()
        .and_then(|l| l.slots_mut().first_mut())
        .and_then(Option::as_mut)
    {
        root.p_reach = 1.0;
    }

    for i in 0..lattice.steps {
        let (head, tail) = lattice.levels.split_at_mut(i + 1);
        let parents = &head[i];
        let children = tail[0].slots_mut();
        for node in parents.nodes() {
            let Some(transition) = node.transition else {
                continue;
            };
            if node.p_reach <= 0.0 {
                continue;
            }
            let slots = transition.child_slots(i);
            for (slot, p) in slots.into_iter().zip(transition.probabilities()) {
                if let Some(child) = children[slot].as_mut() {
                    child.p_reach += node.p_reach * p;
                }
            }
        }
    }

    let terminal = match lattice.levels.last_mut() {
        Some(level) => level,
        None => return 0.0,
    };
    let mass: f64 = terminal.nodes().map(|n| n.p_reach).sum();
    if mass > 0.0 {
        for node in terminal.slots_mut().iter_mut().flatten() {
            node.p_reach /= mass;
        }
    }
    mass
}
