// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Addressing for the nodes of a product lattice.
//!
//! A lattice with D dimensions of heights `h_0..h_{D-1}` has `Π h_i` nodes. A node is
//! addressed either by its coordinate vector (`node[i] < h_i`) or by a packed `u64`
//! identifier, a mixed-radix encoding in which the last dimension varies fastest:
//!
//! ```text
//! multiplier[D-1] = 1
//! multiplier[i]   = multiplier[i+1] * h_{i+1}
//! id              = Σ node[i] * multiplier[i]
//! ```
//!
//! With this layout, lexicographic order of coordinate vectors is ascending identifier order.
//!
//! # Examples
//!
//! ```
//! use sparse_lattice::space::NodeSpace;
//!
//! let space = NodeSpace::new(vec![4, 2, 3]).unwrap();
//! assert_eq!(space.num_nodes(), 24);
//! assert_eq!(space.levels(), 7);
//!
//! let id = space.to_id(&[1, 1, 2]).unwrap();
//! assert_eq!(id, 1 * 6 + 1 * 3 + 2);
//! assert_eq!(space.to_coordinates(id).unwrap(), vec![1, 1, 2]);
//! ```

pub mod domain;
pub mod neighbors;

pub use domain::{Domains, NodeBuilder};
pub use neighbors::Neighbors;

use crate::error::{LatticeError, Result};

/// Read access to the coordinates of one node.
///
/// Trie operations take any key implementing this trait, so packed identifiers can be decoded
/// one dimension at a time without materializing a vector.
pub trait Coordinates {
    /// The coordinate of this node in `dimension`.
    fn coordinate(&self, dimension: usize) -> usize;
}

impl Coordinates for [usize] {
    #[inline]
    fn coordinate(&self, dimension: usize) -> usize {
        self[dimension]
    }
}

impl Coordinates for Vec<usize> {
    #[inline]
    fn coordinate(&self, dimension: usize) -> usize {
        self[dimension]
    }
}

impl<const N: usize> Coordinates for [usize; N] {
    #[inline]
    fn coordinate(&self, dimension: usize) -> usize {
        self[dimension]
    }
}

/// A packed identifier viewed as coordinates of its space.
#[derive(Debug, Clone, Copy)]
pub struct PackedId<'a> {
    id: u64,
    space: &'a NodeSpace,
}

impl PackedId<'_> {
    /// The packed identifier.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Coordinates for PackedId<'_> {
    #[inline]
    fn coordinate(&self, dimension: usize) -> usize {
        let height = self.space.heights[dimension] as u64;
        ((self.id / self.space.multipliers[dimension]) % height) as usize
    }
}

/// Shape of a product lattice: per-dimension heights and everything derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpace {
    /// Cardinality of each dimension
    heights: Box<[usize]>,
    /// Mixed-radix weight of each dimension
    multipliers: Box<[u64]>,
    /// `headroom[i]` = largest coordinate sum reachable by dimensions `i..D`; length D+1
    headroom: Box<[usize]>,
    /// Number of distinct levels
    levels: usize,
    /// Number of nodes
    num_nodes: u64,
}

impl NodeSpace {
    /// Create the space for the given heights.
    ///
    /// Fails if there are no dimensions, a dimension has height zero, or the node count does
    /// not fit into a `u64`.
    pub fn new(heights: Vec<usize>) -> Result<Self> {
        if heights.is_empty() {
            return Err(LatticeError::NoDimensions);
        }
        if let Some(dimension) = heights.iter().position(|&height| height == 0) {
            return Err(LatticeError::EmptyDomain { dimension });
        }

        let mut multipliers = vec![1u64; heights.len()];
        let mut num_nodes: u64 = 1;
        for dimension in (0..heights.len()).rev() {
            multipliers[dimension] = num_nodes;
            num_nodes = num_nodes
                .checked_mul(heights[dimension] as u64)
                .ok_or(LatticeError::TooManyNodes)?;
        }

        let mut headroom = vec![0usize; heights.len() + 1];
        for dimension in (0..heights.len()).rev() {
            headroom[dimension] = headroom[dimension + 1] + heights[dimension] - 1;
        }
        let levels = headroom[0] + 1;

        Ok(Self {
            heights: heights.into_boxed_slice(),
            multipliers: multipliers.into_boxed_slice(),
            headroom: headroom.into_boxed_slice(),
            levels,
            num_nodes,
        })
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.heights.len()
    }

    /// Height (cardinality) of every dimension.
    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    /// Mixed-radix weight of every dimension.
    pub fn multipliers(&self) -> &[u64] {
        &self.multipliers
    }

    /// Number of levels, `1 + Σ (h_i - 1)`.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of nodes, `Π h_i`.
    pub fn num_nodes(&self) -> u64 {
        self.num_nodes
    }

    /// Largest coordinate sum reachable by dimensions `dimension..D`.
    pub(crate) fn headroom(&self, dimension: usize) -> usize {
        self.headroom[dimension]
    }

    /// Check length and range of a coordinate vector.
    pub fn check_node(&self, node: &[usize]) -> Result<()> {
        if node.len() != self.heights.len() {
            return Err(LatticeError::WrongDimensionality {
                expected: self.heights.len(),
                found: node.len(),
            });
        }
        for (dimension, (&value, &height)) in node.iter().zip(self.heights.iter()).enumerate() {
            if value >= height {
                return Err(LatticeError::CoordinateOutOfRange {
                    dimension,
                    value,
                    height,
                });
            }
        }
        Ok(())
    }

    /// Check that `id` addresses a node.
    pub fn check_id(&self, id: u64) -> Result<()> {
        if id >= self.num_nodes {
            return Err(LatticeError::IdentifierOutOfRange {
                id,
                num_nodes: self.num_nodes,
            });
        }
        Ok(())
    }

    /// Check that `level` is in `0..levels`.
    pub fn check_level(&self, level: usize) -> Result<()> {
        if level >= self.levels {
            return Err(LatticeError::LevelOutOfRange {
                level,
                levels: self.levels,
            });
        }
        Ok(())
    }

    /// Pack a coordinate vector into its identifier.
    pub fn to_id(&self, node: &[usize]) -> Result<u64> {
        self.check_node(node)?;
        Ok(self.pack(node))
    }

    /// Unpack an identifier into its coordinate vector.
    pub fn to_coordinates(&self, id: u64) -> Result<Vec<usize>> {
        let packed = self.packed(id)?;
        Ok((0..self.dimensions())
            .map(|dimension| packed.coordinate(dimension))
            .collect())
    }

    /// View a checked identifier as coordinates, without unpacking it.
    pub fn packed(&self, id: u64) -> Result<PackedId<'_>> {
        self.check_id(id)?;
        Ok(PackedId { id, space: self })
    }

    /// Level (coordinate sum) of a node.
    pub fn level_of(&self, node: &[usize]) -> Result<usize> {
        self.check_node(node)?;
        Ok(node.iter().sum())
    }

    /// The least node, all coordinates zero.
    pub fn bottom(&self) -> Vec<usize> {
        vec![0; self.heights.len()]
    }

    /// The greatest node, every coordinate at its maximum.
    pub fn top(&self) -> Vec<usize> {
        self.heights.iter().map(|&height| height - 1).collect()
    }

    /// Direct successors of `node`: one coordinate raised by one.
    pub fn successors(&self, node: &[usize]) -> Result<Neighbors<'_>> {
        self.check_node(node)?;
        Ok(Neighbors::successors(self, node))
    }

    /// Direct predecessors of `node`: one coordinate lowered by one.
    pub fn predecessors(&self, node: &[usize]) -> Result<Neighbors<'_>> {
        self.check_node(node)?;
        Ok(Neighbors::predecessors(self, node))
    }

    /// Pack a vector that has already been checked.
    pub(crate) fn pack(&self, node: &[usize]) -> u64 {
        node.iter()
            .zip(self.multipliers.iter())
            .map(|(&value, &multiplier)| value as u64 * multiplier)
            .sum()
    }

    /// View an identifier that has already been checked.
    pub(crate) fn packed_unchecked(&self, id: u64) -> PackedId<'_> {
        debug_assert!(id < self.num_nodes);
        PackedId { id, space: self }
    }
}
