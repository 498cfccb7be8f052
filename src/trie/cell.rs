// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cell type for trie memory slots.
//!
//! Every slot of a trie buffer is a single `u32`. The two highest values are reserved
//! markers; everything below them is the offset of a child block. [`Cell`] is the decoded
//! view of a slot, so matching code never compares against raw sentinels.
//!
//! # Examples
//!
//! ```
//! use sparse_lattice::trie::Cell;
//!
//! assert_eq!(Cell::from_bits(Cell::Empty.to_bits()), Cell::Empty);
//! assert_eq!(Cell::from_bits(17), Cell::Child(17));
//! assert!(Cell::Leaf.is_present());
//! assert!(!Cell::Empty.is_present());
//! ```

/// Decoded content of one trie memory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No child block and no element.
    Empty,
    /// The terminal coordinate of a stored point.
    Leaf,
    /// Offset of the child block for the next dimension.
    Child(u32),
}

impl Cell {
    /// Raw encoding of [`Cell::Empty`]; freshly allocated blocks are filled with it.
    pub const EMPTY_BITS: u32 = u32::MAX;

    /// Raw encoding of [`Cell::Leaf`].
    pub const LEAF_BITS: u32 = u32::MAX - 1;

    /// Largest offset a child block may start at.
    pub const MAX_OFFSET: u32 = u32::MAX - 2;

    /// Decode a raw slot.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            Self::EMPTY_BITS => Cell::Empty,
            Self::LEAF_BITS => Cell::Leaf,
            offset => Cell::Child(offset),
        }
    }

    /// Encode into a raw slot.
    ///
    /// # Panics
    ///
    /// Panics if a child offset collides with a reserved marker.
    #[inline]
    pub fn to_bits(self) -> u32 {
        match self {
            Cell::Empty => Self::EMPTY_BITS,
            Cell::Leaf => Self::LEAF_BITS,
            Cell::Child(offset) => {
                assert!(
                    offset <= Self::MAX_OFFSET,
                    "Child offset out of range: {}",
                    offset
                );
                offset
            }
        }
    }

    /// Whether the slot holds a leaf or a child.
    #[inline]
    pub const fn is_present(self) -> bool {
        !matches!(self, Cell::Empty)
    }
}
