// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sparse trie over the nodes of a product lattice, materialized in a flat cell buffer.
//!
//! # Layout
//!
//! The root block holds `h_0` cells at offset 0. A cell in dimension `d < D-1` is either
//! [`Cell::Empty`] or a [`Cell::Child`] pointing at a block of `h_{d+1}` cells for the next
//! dimension. A cell in the last dimension is [`Cell::Empty`] or [`Cell::Leaf`]. A point is
//! stored iff the path of its coordinates ends in a leaf, so every operation touches at most
//! D blocks along one path.
//!
//! # Comparators
//!
//! Membership and deletion come in three modes, one code path parameterized by
//! [`Comparator`]:
//!
//! - `Eq`: the point itself,
//! - `Geq`: every stored point that dominates the key (coordinates `key[d]..h_d` in each
//!   dimension),
//! - `Leq`: every stored point dominated by the key (coordinates `0..=key[d]`).
//!
//! `Geq` and `Leq` fan out over sibling ranges, so their cost grows with the number of
//! incomparable stored points rather than staying at D steps.
//!
//! # Compaction
//!
//! Blocks emptied by a clear are unlinked but stay in the buffer. When the fraction of live
//! cells falls below the configured threshold, the trie re-inserts all points into a fresh
//! buffer and moves it in place of the old one.
//!
//! # Examples
//!
//! ```
//! use sparse_lattice::space::NodeSpace;
//! use sparse_lattice::trie::{Comparator, Trie};
//! use std::sync::Arc;
//!
//! let space = Arc::new(NodeSpace::new(vec![4, 2, 3]).unwrap());
//! let mut trie = Trie::new(space);
//! trie.put(&[1, 1, 2]);
//!
//! assert!(trie.contains(&[1, 1, 2], Comparator::Eq));
//! assert!(trie.contains(&[0, 1, 2], Comparator::Geq)); // (1,1,2) dominates (0,1,2)
//! assert!(trie.contains(&[3, 1, 2], Comparator::Leq)); // (1,1,2) is below (3,1,2)
//! assert!(!trie.contains(&[0, 1, 2], Comparator::Leq));
//! ```

pub mod buffer;
pub mod cell;
pub mod stack;
pub mod walk;

pub use buffer::Buffer;
pub use cell::Cell;
pub use stack::TraversalStack;
pub use walk::{Identifiers, Nodes};

use crate::config::LatticeConfig;
use crate::error::Result;
use crate::space::{Coordinates, NodeSpace};
use std::ops::Range;
use std::sync::Arc;
use strum_macros::{Display, EnumCount, EnumIter};
use walk::Walk;

/// Membership mode of trie queries and deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum Comparator {
    /// Exactly the key.
    Eq,
    /// Stored points greater than or equal to the key.
    Geq,
    /// Stored points less than or equal to the key.
    Leq,
}

impl Comparator {
    /// Coordinates to visit in a dimension where the key has `value`.
    #[inline]
    pub fn scan(self, value: usize, height: usize) -> Range<usize> {
        match self {
            Comparator::Eq => value..value + 1,
            Comparator::Geq => value..height,
            Comparator::Leq => 0..value + 1,
        }
    }
}

/// Memory and activity figures of a trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrieStatistics {
    /// Cells handed out by the buffer.
    pub allocated_cells: usize,
    /// Cells in blocks still linked from the root.
    pub used_cells: usize,
    /// Stored points.
    pub points: usize,
    /// Compactions performed so far.
    pub compactions: u64,
    /// Structural changes so far.
    pub generation: u64,
}

impl TrieStatistics {
    /// Fraction of allocated cells still in use.
    pub fn utilization(&self) -> f64 {
        if self.allocated_cells == 0 {
            1.0
        } else {
            self.used_cells as f64 / self.allocated_cells as f64
        }
    }
}

/// A set of lattice nodes stored as a trie in a flat buffer.
///
/// Keys must be valid nodes of the trie's space; [`Lattice`](crate::Lattice) checks them
/// before calling in.
#[derive(Debug, Clone)]
pub struct Trie {
    space: Arc<NodeSpace>,
    buffer: Buffer,
    /// Cells of linked blocks, root included
    used: usize,
    /// Stored points
    len: usize,
    /// Incremented on every structural change
    generation: u64,
    compactions: u64,
    config: LatticeConfig,
}

impl Trie {
    /// Create an empty trie with the default configuration.
    pub fn new(space: Arc<NodeSpace>) -> Self {
        Self::with_config(space, LatticeConfig::default())
    }

    /// Create an empty trie.
    pub fn with_config(space: Arc<NodeSpace>, config: LatticeConfig) -> Self {
        let root = space.heights()[0];
        let mut buffer = Buffer::with_capacity(config.initial_cells.max(root));
        buffer.allocate(root);
        Self {
            space,
            buffer,
            used: root,
            len: 0,
            generation: 0,
            compactions: 0,
            config,
        }
    }

    /// The space this trie stores nodes of.
    pub fn space(&self) -> &Arc<NodeSpace> {
        &self.space
    }

    /// Insert a point. Returns whether it was not stored before.
    pub fn put<K: Coordinates + ?Sized>(&mut self, key: &K) -> bool {
        let heights = self.space.heights();
        let last = heights.len() - 1;

        let mut block = 0usize;
        for dimension in 0..last {
            let value = key.coordinate(dimension);
            debug_assert!(value < heights[dimension]);
            let index = block + value;
            block = match self.buffer.get(index) {
                Cell::Child(child) => child as usize,
                Cell::Empty => {
                    let height = heights[dimension + 1];
                    let child = self.buffer.allocate(height);
                    self.used += height;
                    self.buffer.set(index, Cell::Child(child));
                    self.generation += 1;
                    child as usize
                }
                Cell::Leaf => panic!("Corrupt trie: leaf in dimension {}", dimension),
            };
        }

        let index = block + key.coordinate(last);
        if self.buffer.get(index) == Cell::Leaf {
            return false;
        }
        self.buffer.set(index, Cell::Leaf);
        self.len += 1;
        self.generation += 1;
        true
    }

    /// Whether a stored point relates to `key` under `comparator`.
    pub fn contains<K: Coordinates + ?Sized>(&self, key: &K, comparator: Comparator) -> bool {
        self.contains_from(key, 0, 0, comparator)
    }

    /// Remove every stored point that relates to `key` under `comparator`, then compact if
    /// utilization dropped below the threshold. Returns the number of points removed.
    pub fn clear<K: Coordinates + ?Sized>(&mut self, key: &K, comparator: Comparator) -> usize {
        let before = self.len;
        self.clear_from(key, 0, 0, comparator);
        let removed = before - self.len;
        if removed > 0 {
            self.generation += 1;
        }

        let threshold = self.config.compaction_threshold;
        if threshold > 0.0 && self.statistics().utilization() < threshold {
            self.compact();
        }
        removed
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no point is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Structural change counter; compaction counts as a change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bytes held by the cell buffer.
    pub fn byte_size(&self) -> usize {
        self.buffer.byte_size()
    }

    /// Memory and activity figures.
    pub fn statistics(&self) -> TrieStatistics {
        TrieStatistics {
            allocated_cells: self.buffer.len(),
            used_cells: self.used,
            points: self.len,
            compactions: self.compactions,
            generation: self.generation,
        }
    }

    /// All stored points in lexicographic order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::over_trie(&self.buffer, Walk::new(Arc::clone(&self.space), None))
    }

    /// Stored points whose coordinates sum to `level`.
    pub fn nodes_at_level(&self, level: usize) -> Result<Nodes<'_>> {
        self.space.check_level(level)?;
        Ok(Nodes::over_trie(
            &self.buffer,
            Walk::new(Arc::clone(&self.space), Some(level)),
        ))
    }

    /// All stored points as ascending identifiers.
    pub fn identifiers(&self) -> Identifiers<'_> {
        Identifiers::over_trie(&self.buffer, Walk::new(Arc::clone(&self.space), None))
    }

    /// Stored points on `level` as ascending identifiers.
    pub fn identifiers_at_level(&self, level: usize) -> Result<Identifiers<'_>> {
        self.space.check_level(level)?;
        Ok(Identifiers::over_trie(
            &self.buffer,
            Walk::new(Arc::clone(&self.space), Some(level)),
        ))
    }

    /// Buffer backing this trie, for walks driven from outside.
    pub(crate) fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn contains_from<K: Coordinates + ?Sized>(
        &self,
        key: &K,
        dimension: usize,
        block: usize,
        comparator: Comparator,
    ) -> bool {
        let height = self.space.heights()[dimension];
        for value in comparator.scan(key.coordinate(dimension), height) {
            match self.buffer.get(block + value) {
                Cell::Empty => {}
                Cell::Leaf => return true,
                Cell::Child(child) => {
                    if self.contains_from(key, dimension + 1, child as usize, comparator) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Returns whether the block still holds a present cell.
    fn clear_from<K: Coordinates + ?Sized>(
        &mut self,
        key: &K,
        dimension: usize,
        block: usize,
        comparator: Comparator,
    ) -> bool {
        let height = self.space.heights()[dimension];
        for value in comparator.scan(key.coordinate(dimension), height) {
            let index = block + value;
            match self.buffer.get(index) {
                Cell::Empty => {}
                Cell::Leaf => {
                    self.buffer.set(index, Cell::Empty);
                    self.len -= 1;
                }
                Cell::Child(child) => {
                    if !self.clear_from(key, dimension + 1, child as usize, comparator) {
                        self.buffer.set(index, Cell::Empty);
                        self.used -= self.space.heights()[dimension + 1];
                    }
                }
            }
        }
        self.buffer.any_present(block..block + height)
    }

    /// Rebuild the buffer with only the live points.
    fn compact(&mut self) {
        let before = self.buffer.len();
        let mut fresh = Trie::with_config(Arc::clone(&self.space), self.config);
        let mut walk = Walk::new(Arc::clone(&self.space), None);
        while walk.advance(&self.buffer) {
            fresh.put(walk.element());
        }
        debug_assert_eq!(fresh.len, self.len);

        self.used = fresh.used;
        self.buffer.replace(fresh.buffer);
        self.compactions += 1;
        self.generation += 1;
        tracing::debug!(
            cells_before = before,
            cells_after = self.buffer.len(),
            points = self.len,
            "compacted trie"
        );
    }
}
