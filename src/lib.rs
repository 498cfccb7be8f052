// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sparse storage and predictive properties for very large product lattices.
//!
//! A product lattice is the Cartesian product of finite, totally ordered domains, ordered
//! component-wise. Realistic lattices have far more nodes than could ever be materialized;
//! this crate stores data for the few nodes that matter and answers property questions for
//! all the others.
//!
//! # Architecture
//!
//! ## Storage
//!
//! - [`trie::Trie`]: a set of nodes held as a trie in one flat `Vec<u32>`. Besides exact
//!   membership it answers "is some stored node below / above this one" by scanning ranges of
//!   sibling cells, and clears whole dominated or dominating regions the same way.
//! - [`space::NodeSpace`]: node addressing. Coordinate vectors and packed `u64` identifiers
//!   are interchangeable; lexicographic order of vectors is ascending identifier order.
//!
//! ## Properties
//!
//! A [`PredictiveProperty`] put at a node holds at every successor ([`Direction::Up`]), every
//! predecessor ([`Direction::Down`]), both, or only there ([`Direction::None`]). Each direction
//! is stored as a trie of generators kept minimal: a node implied by an existing generator is
//! not stored, and a new generator evicts the generators it implies. A property query is then
//! a single dominance query on one or two tries.
//!
//! ## Lattice
//!
//! [`Lattice`] ties the pieces together: a data store keyed by identifier, a master trie of
//! every node data or a property was put at, and the property stores. Every operation exists
//! for coordinate vectors and for identifiers.
//!
//! # Memory
//!
//! Trie blocks are bump-allocated and never freed individually. When clearing leaves less
//! than [`LatticeConfig::compaction_threshold`] of a buffer in use, the trie is rebuilt into a
//! fresh buffer.
//!
//! # Example
//!
//! ```
//! use sparse_lattice::{Direction, Lattice, PredictiveProperty};
//!
//! let mut lattice: Lattice<usize, ()> = Lattice::from_heights(&[4, 2, 3]).unwrap();
//! let down = PredictiveProperty::new(Direction::Down);
//! lattice.put_property(&[1, 1, 2], &down).unwrap();
//!
//! assert!(lattice.has_property(&[0, 1, 2], &down).unwrap());
//! assert!(!lattice.has_property(&[2, 1, 2], &down).unwrap());
//! assert_eq!(lattice.list_nodes().collect::<Vec<_>>(), vec![vec![1, 1, 2]]);
//! ```

pub mod config;
pub mod error;
pub mod lattice;
pub mod property;
pub mod space;
pub mod trie;

// Re-export commonly used types
pub use config::LatticeConfig;
pub use error::{LatticeError, Result};
pub use lattice::{Lattice, NodeCursor};
pub use property::{Direction, PredictiveProperty};
pub use space::{Domains, NodeSpace};
pub use trie::{Comparator, Trie, TrieStatistics};
