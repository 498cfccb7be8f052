// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-dimension domains: mapping between source values and coordinates.
//!
//! Each dimension is an ordered list of distinct source values. The position of a value in
//! its list is its coordinate, so the order in which values are given is the lattice order
//! of that dimension.
//!
//! # Examples
//!
//! ```
//! use sparse_lattice::space::Domains;
//!
//! let domains = Domains::new(vec![
//!     vec!["A", "B", "C", "D"],
//!     vec!["A", "B"],
//!     vec!["A", "B", "C"],
//! ])
//! .unwrap();
//!
//! let node = domains.builder().next(&"B").next(&"B").next(&"C").create().unwrap();
//! assert_eq!(node, vec![1, 1, 2]);
//! assert_eq!(domains.to_source(&node).unwrap(), vec![&"B", &"B", &"C"]);
//! ```

use crate::error::{LatticeError, Result};
use indexmap::IndexSet;
use std::hash::Hash;

/// The ordered value sets of every dimension.
#[derive(Debug, Clone)]
pub struct Domains<T> {
    dimensions: Vec<IndexSet<T>>,
}

impl<T: Hash + Eq> Domains<T> {
    /// Build domains from one list of values per dimension.
    ///
    /// Fails if there are no dimensions, a dimension is empty, or a dimension repeats a value.
    pub fn new(domains: Vec<Vec<T>>) -> Result<Self> {
        if domains.is_empty() {
            return Err(LatticeError::NoDimensions);
        }

        let mut dimensions = Vec::with_capacity(domains.len());
        for (dimension, values) in domains.into_iter().enumerate() {
            if values.is_empty() {
                return Err(LatticeError::EmptyDomain { dimension });
            }
            let count = values.len();
            let set: IndexSet<T> = values.into_iter().collect();
            if set.len() != count {
                return Err(LatticeError::DuplicateValue { dimension });
            }
            dimensions.push(set);
        }
        Ok(Self { dimensions })
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of values in every dimension.
    pub fn heights(&self) -> Vec<usize> {
        self.dimensions.iter().map(IndexSet::len).collect()
    }

    /// Coordinate of `value` in `dimension`.
    pub fn index_of(&self, dimension: usize, value: &T) -> Option<usize> {
        self.dimensions.get(dimension)?.get_index_of(value)
    }

    /// Source value at `index` in `dimension`.
    pub fn value(&self, dimension: usize, index: usize) -> Option<&T> {
        self.dimensions.get(dimension)?.get_index(index)
    }

    /// Translate source values into a coordinate vector.
    pub fn to_index(&self, values: &[T]) -> Result<Vec<usize>> {
        self.check_length(values.len())?;
        values
            .iter()
            .enumerate()
            .map(|(dimension, value)| {
                self.index_of(dimension, value)
                    .ok_or(LatticeError::UnknownValue { dimension })
            })
            .collect()
    }

    /// Translate a coordinate vector into source values.
    pub fn to_source(&self, node: &[usize]) -> Result<Vec<&T>> {
        self.check_length(node.len())?;
        node.iter()
            .enumerate()
            .map(|(dimension, &index)| {
                self.value(dimension, index)
                    .ok_or(LatticeError::CoordinateOutOfRange {
                        dimension,
                        value: index,
                        height: self.dimensions[dimension].len(),
                    })
            })
            .collect()
    }

    /// Start building a node one source value at a time.
    pub fn builder(&self) -> NodeBuilder<'_, T> {
        NodeBuilder {
            domains: self,
            node: Vec::with_capacity(self.dimensions()),
            error: None,
        }
    }

    fn check_length(&self, found: usize) -> Result<()> {
        if found != self.dimensions() {
            return Err(LatticeError::WrongDimensionality {
                expected: self.dimensions(),
                found,
            });
        }
        Ok(())
    }
}

impl Domains<usize> {
    /// Domains whose values are the coordinates themselves, `0..height` per dimension.
    pub fn from_heights(heights: &[usize]) -> Result<Self> {
        Self::new(heights.iter().map(|&height| (0..height).collect()).collect())
    }
}

/// Builds a coordinate vector from source values, dimension by dimension.
///
/// The first failure is kept and reported by [`NodeBuilder::create`].
#[derive(Debug)]
pub struct NodeBuilder<'a, T> {
    domains: &'a Domains<T>,
    node: Vec<usize>,
    error: Option<LatticeError>,
}

impl<T: Hash + Eq> NodeBuilder<'_, T> {
    /// Append the value for the next dimension.
    pub fn next(mut self, value: &T) -> Self {
        if self.error.is_some() {
            return self;
        }
        let dimension = self.node.len();
        if dimension >= self.domains.dimensions() {
            self.error = Some(LatticeError::WrongDimensionality {
                expected: self.domains.dimensions(),
                found: dimension + 1,
            });
            return self;
        }
        match self.domains.index_of(dimension, value) {
            Some(index) => self.node.push(index),
            None => self.error = Some(LatticeError::UnknownValue { dimension }),
        }
        self
    }

    /// Finish the node.
    pub fn create(self) -> Result<Vec<usize>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.domains.check_length(self.node.len())?;
        Ok(self.node)
    }
}
