// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for lattice construction and node addressing.
//!
//! Every check that can fail runs at the lattice boundary, before any trie is touched, so a
//! rejected call never leaves a trie partially mutated. Broken internal invariants (a corrupt
//! cell, a traversal stack overflow) are not represented here: they panic.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LatticeError>;

/// Errors reported by [`Lattice`](crate::Lattice) and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// The lattice was given no dimensions at all.
    #[error("lattice must have at least one dimension")]
    NoDimensions,

    /// One dimension has no values.
    #[error("dimension {dimension} has an empty domain")]
    EmptyDomain { dimension: usize },

    /// One dimension lists the same value twice.
    #[error("dimension {dimension} contains a duplicate value")]
    DuplicateValue { dimension: usize },

    /// The product of all heights does not fit the identifier range.
    #[error("lattice would contain more than {} nodes", u64::MAX)]
    TooManyNodes,

    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A coordinate vector has the wrong length.
    #[error("node has {found} coordinates, expected {expected}")]
    WrongDimensionality { expected: usize, found: usize },

    /// A coordinate lies outside its dimension.
    #[error("coordinate {value} is out of range for dimension {dimension} (height {height})")]
    CoordinateOutOfRange {
        dimension: usize,
        value: usize,
        height: usize,
    },

    /// A packed identifier does not address a node of this lattice.
    #[error("identifier {id} is out of range (lattice has {num_nodes} nodes)")]
    IdentifierOutOfRange { id: u64, num_nodes: u64 },

    /// A level outside `0..levels` was requested.
    #[error("level {level} is out of range (lattice has {levels} levels)")]
    LevelOutOfRange { level: usize, levels: usize },

    /// A source value is not part of its dimension's domain.
    #[error("value is not part of the domain of dimension {dimension}")]
    UnknownValue { dimension: usize },

    /// A detached cursor was used after the lattice changed.
    #[error("cursor created at generation {created} is stale (lattice is at generation {current})")]
    StaleCursor { created: u64, current: u64 },

    /// A detached cursor was handed a lattice other than the one that created it.
    #[error("cursor belongs to a different lattice")]
    ForeignCursor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LatticeError::WrongDimensionality {
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "node has 2 coordinates, expected 3");

        let err = LatticeError::CoordinateOutOfRange {
            dimension: 1,
            value: 7,
            height: 2,
        };
        assert_eq!(
            err.to_string(),
            "coordinate 7 is out of range for dimension 1 (height 2)"
        );

        let err = LatticeError::StaleCursor {
            created: 4,
            current: 6,
        };
        assert!(err.to_string().contains("stale"));
        assert_eq!(
            LatticeError::ForeignCursor.to_string(),
            "cursor belongs to a different lattice"
        );
    }
}
