//! Recombining binomial price lattice.
//!
//! Node `(i, j)` holds `S0 · u^j · d^(i − j)`: the price after `i` periods,
//! `j` of which were up-moves. Because every ordering of the same moves
//! lands on the same price, the lattice needs `(N + 1)(N + 2) / 2` nodes
//! rather than `2^N` paths.
//!
//! Nodes are stored level by level in one flat vector; level `i` starts at
//! offset `i (i + 1) / 2`.

use lp_core::{ensure, errors::Result, Price, Real, Size};
use tracing::debug;

/// A recombining binomial lattice of underlying prices.
///
/// The lattice has `steps + 1` levels, with level `i` holding `i + 1`
/// nodes in increasing order of up-moves.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLattice {
    steps: Size,
    nodes: Vec<Price>,
}

impl PriceLattice {
    /// Build the full lattice from the initial price, the up and down
    /// factors and the number of periods.
    ///
    /// # Errors
    /// [`InvalidParameter`](lp_core::Error::InvalidParameter) if `spot`,
    /// `up` or `down` is non-positive or non-finite, or if a node price
    /// overflows `f64`.
    pub fn build(spot: Price, up: Real, down: Real, steps: Size) -> Result<Self> {
        ensure!(
            spot.is_finite() && spot > 0.0,
            "initial price must be positive, got {spot}"
        );
        ensure!(
            up.is_finite() && up > 0.0,
            "up factor must be positive, got {up}"
        );
        ensure!(
            down.is_finite() && down > 0.0,
            "down factor must be positive, got {down}"
        );

        let mut nodes = Vec::with_capacity(Self::node_count_for(steps));
        for i in 0..=steps {
            nodes.extend((0..=i).map(|j| spot * down.powi((i - j) as i32) * up.powi(j as i32)));
            ensure!(
                nodes.iter().rev().take(i + 1).all(|s| s.is_finite()),
                "lattice node price overflows at level {i} (u = {up}, d = {down})"
            );
        }
        debug!(spot, up, down, steps, nodes = nodes.len(), "built price lattice");

        Ok(Self { steps, nodes })
    }

    /// Number of nodes in a lattice of `steps` periods, `(N + 1)(N + 2) / 2`.
    pub fn node_count_for(steps: Size) -> Size {
        (steps + 1) * (steps + 2) / 2
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of periods `N`.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Number of nodes at level `i` (always `i + 1`).
    pub fn size(&self, i: Size) -> Size {
        i + 1
    }

    /// Total number of nodes in the lattice.
    pub fn node_count(&self) -> Size {
        self.nodes.len()
    }

    /// Index on the next level of the node reached from `index`.
    ///
    /// `branch = 0` → down, `branch = 1` → up.
    pub fn descendant(&self, index: Size, branch: Size) -> Size {
        index + branch
    }

    /// Underlying price at node `(i, index)`.
    ///
    /// # Panics
    /// Panics if `i > steps` or `index > i`.
    pub fn underlying(&self, i: Size, index: Size) -> Price {
        assert!(i <= self.steps, "level {i} beyond lattice depth {}", self.steps);
        assert!(index <= i, "node {index} out of range at level {i}");
        self.nodes[offset(i) + index]
    }

    /// All prices at level `i`, ordered by number of up-moves.
    ///
    /// # Panics
    /// Panics if `i > steps`.
    pub fn level(&self, i: Size) -> &[Price] {
        assert!(i <= self.steps, "level {i} beyond lattice depth {}", self.steps);
        let start = offset(i);
        &self.nodes[start..start + i + 1]
    }

    /// The terminal level `N`.
    pub fn terminal(&self) -> &[Price] {
        self.level(self.steps)
    }

    /// Iterate over the levels from `0` to `N`.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = &[Price]> + '_ {
        (0..=self.steps).map(move |i| self.level(i))
    }
}

/// Offset of level `i` in the flat node vector.
#[inline]
fn offset(i: Size) -> Size {
    i * (i + 1) / 2
}

// ─── Tests ────────────────────────────────────────────────────────────────────
