// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use sparse_lattice::{Direction, Lattice};
use std::collections::BTreeSet;

/// Heights of the lattice used throughout the examples: 4 × 2 × 3 = 24 nodes, 7 levels.
pub const HEIGHTS: [usize; 3] = [4, 2, 3];

pub fn example_lattice<U>() -> Lattice<usize, U> {
    Lattice::from_heights(&HEIGHTS).expect("valid heights")
}

/// Component-wise `a >= b`.
pub fn dominates(a: &[usize], b: &[usize]) -> bool {
    a.iter().zip(b).all(|(x, y)| x >= y)
}

/// Every coordinate vector of `heights`, in lexicographic order.
pub fn all_nodes(heights: &[usize]) -> Vec<Vec<usize>> {
    let mut nodes = vec![Vec::new()];
    for &height in heights {
        nodes = nodes
            .into_iter()
            .flat_map(|prefix| {
                (0..height).map(move |value| {
                    let mut node = prefix.clone();
                    node.push(value);
                    node
                })
            })
            .collect();
    }
    nodes
}

/// Naive reference model of one property: every node it was put at, no minimization.
#[derive(Debug, Clone)]
pub struct PropertyModel {
    pub direction: Direction,
    up: Vec<Vec<usize>>,
    down: Vec<Vec<usize>>,
    exact: BTreeSet<Vec<usize>>,
}

impl PropertyModel {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            up: Vec::new(),
            down: Vec::new(),
            exact: BTreeSet::new(),
        }
    }

    /// Record a put. Nothing is recorded where the property already holds.
    pub fn put(&mut self, node: &[usize]) {
        if self.holds(node) {
            return;
        }
        if self.direction.propagates_up() {
            self.up.push(node.to_vec());
        }
        if self.direction.propagates_down() {
            self.down.push(node.to_vec());
        }
        if self.direction == Direction::None {
            self.exact.insert(node.to_vec());
        }
    }

    pub fn remove(&mut self, node: &[usize]) {
        self.up.retain(|p| !dominates(p, node));
        self.down.retain(|p| !dominates(node, p));
        self.exact.remove(node);
    }

    pub fn holds(&self, node: &[usize]) -> bool {
        self.up.iter().any(|p| dominates(node, p))
            || self.down.iter().any(|p| dominates(p, node))
            || self.exact.contains(node)
    }

    /// Size of the minimal generator sets implied by the recorded puts.
    pub fn generator_count(&self) -> usize {
        let up: BTreeSet<&Vec<usize>> = self.up.iter().collect();
        let down: BTreeSet<&Vec<usize>> = self.down.iter().collect();
        let minimal = up
            .iter()
            .filter(|p| !up.iter().any(|q| q != *p && dominates(p, q)))
            .count();
        let maximal = down
            .iter()
            .filter(|p| !down.iter().any(|q| q != *p && dominates(q, p)))
            .count();
        minimal + maximal + self.exact.len()
    }
}
