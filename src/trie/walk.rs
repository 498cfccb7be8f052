// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Non-recursive depth-first enumeration of trie leaves.
//!
//! A [`Walk`] keeps one frame per open dimension on three traversal stacks moving in
//! lockstep:
//!
//! - `offsets`: next coordinate to inspect in the frame's block,
//! - `blocks`: buffer offset of the frame's block,
//! - `prefixes`: packed identifier of the coordinates above the frame.
//!
//! Each step inspects one cell. An exhausted frame is popped and its parent resumes; a child
//! cell opens a new frame; a leaf cell is a result. The same walk runs over a trie buffer or
//! over the [`Dense`] source, in which every cell is present, to enumerate the whole
//! unmaterialized node space.
//!
//! # Level-restricted walks
//!
//! With a target level the walk keeps the running coordinate sum. A frame whose sum exceeds
//! the target is abandoned, since its remaining coordinates only grow. A new frame for
//! dimension `d` starts at `target - sum - headroom(d + 1)` (clamped at zero), the smallest
//! coordinate from which the remaining dimensions can still reach the target.

use super::buffer::Buffer;
use super::cell::Cell;
use super::stack::TraversalStack;
use crate::space::NodeSpace;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Source of cells for a walk.
pub(crate) trait CellSource {
    /// The cell at `index`; `terminal` is true in the last dimension.
    fn cell(&self, index: usize, terminal: bool) -> Cell;
}

impl CellSource for Buffer {
    #[inline]
    fn cell(&self, index: usize, _terminal: bool) -> Cell {
        self.get(index)
    }
}

/// Every node of the space is present; all blocks live at offset 0.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dense;

impl CellSource for Dense {
    #[inline]
    fn cell(&self, _index: usize, terminal: bool) -> Cell {
        if terminal {
            Cell::Leaf
        } else {
            Cell::Child(0)
        }
    }
}

/// Borrowed trie buffer or dense space.
#[derive(Debug, Clone, Copy)]
enum Source<'a> {
    Trie(&'a Buffer),
    Dense,
}

impl CellSource for Source<'_> {
    #[inline]
    fn cell(&self, index: usize, terminal: bool) -> Cell {
        match self {
            Source::Trie(buffer) => buffer.cell(index, terminal),
            Source::Dense => Dense.cell(index, terminal),
        }
    }
}

/// Traversal state of one enumeration.
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    space: Arc<NodeSpace>,
    /// Requested level, if any
    target: Option<usize>,
    offsets: TraversalStack<usize>,
    blocks: TraversalStack<usize>,
    prefixes: TraversalStack<u64>,
    /// Coordinates of the current path; zero below the open frames
    element: Vec<usize>,
    /// Coordinate sum of the current path
    sum: usize,
    /// Identifier of the last leaf found
    identifier: u64,
    done: bool,
}

impl Walk {
    /// Start a walk over all leaves, or over the leaves on level `target`.
    ///
    /// `target` must be a valid level of `space`.
    pub(crate) fn new(space: Arc<NodeSpace>, target: Option<usize>) -> Self {
        let dimensions = space.dimensions();
        let mut walk = Self {
            offsets: TraversalStack::new(dimensions),
            blocks: TraversalStack::new(dimensions),
            prefixes: TraversalStack::new(dimensions),
            element: vec![0; dimensions],
            sum: 0,
            identifier: 0,
            done: false,
            target,
            space,
        };
        let start = walk.start(0);
        walk.offsets.push(start);
        walk.blocks.push(0);
        walk.prefixes.push(0);
        walk
    }

    /// Move to the next leaf. Returns false once the walk is exhausted, and on every later
    /// call.
    pub(crate) fn advance<S: CellSource + ?Sized>(&mut self, source: &S) -> bool {
        if self.done {
            return false;
        }
        let dimensions = self.space.dimensions();

        loop {
            // Close exhausted frames and frames above the target level
            while self.offsets.peek() >= self.space.heights()[self.offsets.len() - 1]
                || self.overshoots()
            {
                let dimension = self.offsets.len() - 1;
                self.sum -= self.element[dimension];
                self.element[dimension] = 0;
                self.offsets.pop();
                self.blocks.pop();
                self.prefixes.pop();
                if self.offsets.is_empty() {
                    self.done = true;
                    return false;
                }
            }

            let dimension = self.offsets.len() - 1;
            let value = self.offsets.peek();
            let terminal = dimension + 1 == dimensions;
            let cell = source.cell(self.blocks.peek() + value, terminal);
            self.offsets.increment();
            if !cell.is_present() {
                continue;
            }

            self.sum = self.sum - self.element[dimension] + value;
            self.element[dimension] = value;
            let prefix =
                self.prefixes.peek() + value as u64 * self.space.multipliers()[dimension];

            match cell {
                Cell::Child(child) if !terminal => {
                    let start = self.start(dimension + 1);
                    self.offsets.push(start);
                    self.blocks.push(child as usize);
                    self.prefixes.push(prefix);
                }
                Cell::Leaf if terminal => {
                    if self.target.map_or(true, |target| target == self.sum) {
                        self.identifier = prefix;
                        return true;
                    }
                }
                other => panic!(
                    "Corrupt trie cell {:?} in dimension {} of {}",
                    other, dimension, dimensions
                ),
            }
        }
    }

    /// Coordinates of the current leaf.
    pub(crate) fn element(&self) -> &[usize] {
        &self.element
    }

    /// Packed identifier of the current leaf.
    pub(crate) fn identifier(&self) -> u64 {
        self.identifier
    }

    fn overshoots(&self) -> bool {
        self.target.map_or(false, |target| self.sum > target)
    }

    /// First coordinate worth inspecting when opening `dimension`.
    fn start(&self, dimension: usize) -> usize {
        match self.target {
            None => 0,
            Some(target) => {
                let reachable = self.sum + self.space.headroom(dimension + 1);
                target
                    .saturating_sub(reachable)
                    .min(self.space.heights()[dimension])
            }
        }
    }
}

/// Iterator over stored points as coordinate vectors, in lexicographic order.
///
/// Created by [`Trie::nodes`](super::Trie::nodes), [`Trie::nodes_at_level`](super::Trie::nodes_at_level)
/// and the exhaustive scans of [`Lattice`](crate::Lattice).
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    source: Source<'a>,
    walk: Walk,
}

impl<'a> Nodes<'a> {
    pub(crate) fn over_trie(buffer: &'a Buffer, walk: Walk) -> Self {
        Self {
            source: Source::Trie(buffer),
            walk,
        }
    }
}

impl Nodes<'static> {
    pub(crate) fn over_space(walk: Walk) -> Self {
        Self {
            source: Source::Dense,
            walk,
        }
    }
}

impl Iterator for Nodes<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.walk.advance(&self.source) {
            Some(self.walk.element().to_vec())
        } else {
            None
        }
    }
}

impl FusedIterator for Nodes<'_> {}

/// Iterator over stored points as packed identifiers, in ascending order.
///
/// Identifiers are accumulated on the walk's prefix stack, so no vector is built per step.
#[derive(Debug, Clone)]
pub struct Identifiers<'a> {
    source: Source<'a>,
    walk: Walk,
}

impl<'a> Identifiers<'a> {
    pub(crate) fn over_trie(buffer: &'a Buffer, walk: Walk) -> Self {
        Self {
            source: Source::Trie(buffer),
            walk,
        }
    }
}

impl Identifiers<'static> {
    pub(crate) fn over_space(walk: Walk) -> Self {
        Self {
            source: Source::Dense,
            walk,
        }
    }
}

impl Iterator for Identifiers<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.walk.advance(&self.source) {
            Some(self.walk.identifier())
        } else {
            None
        }
    }
}

impl FusedIterator for Identifiers<'_> {}
