// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Direct successors and predecessors of a node.

use super::NodeSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Up,
    Down,
}

/// Iterator over the nodes that differ from a node by one in exactly one coordinate.
///
/// Yielded in dimension order. Created by [`NodeSpace::successors`] and
/// [`NodeSpace::predecessors`].
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    space: &'a NodeSpace,
    node: Vec<usize>,
    dimension: usize,
    step: Step,
}

impl<'a> Neighbors<'a> {
    pub(crate) fn successors(space: &'a NodeSpace, node: &[usize]) -> Self {
        Self::new(space, node, Step::Up)
    }

    pub(crate) fn predecessors(space: &'a NodeSpace, node: &[usize]) -> Self {
        Self::new(space, node, Step::Down)
    }

    fn new(space: &'a NodeSpace, node: &[usize], step: Step) -> Self {
        Self {
            space,
            node: node.to_vec(),
            dimension: 0,
            step,
        }
    }
}

impl Iterator for Neighbors<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let heights = self.space.heights();
        while self.dimension < heights.len() {
            let dimension = self.dimension;
            self.dimension += 1;

            let value = self.node[dimension];
            let moved = match self.step {
                Step::Up if value + 1 < heights[dimension] => value + 1,
                Step::Down if value > 0 => value - 1,
                _ => continue,
            };
            let mut neighbor = self.node.clone();
            neighbor[dimension] = moved;
            return Some(neighbor);
        }
        None
    }
}
