// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Flat cell buffer backing a trie.
//!
//! The buffer is a bump allocator over a `Vec<u32>`: blocks are appended, never freed
//! individually. Space lost to cleared blocks is reclaimed only by building a fresh buffer
//! and moving it in with [`Buffer::replace`].

use super::cell::Cell;
use crate::config::CELL_BYTES;
use std::ops::Range;

/// Growable array of fixed-width trie cells.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    memory: Vec<u32>,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `cells` cells.
    pub fn with_capacity(cells: usize) -> Self {
        Self {
            memory: Vec::with_capacity(cells),
        }
    }

    /// Append a block of `cells` empty cells and return its offset.
    ///
    /// # Panics
    ///
    /// Panics if the block would start beyond [`Cell::MAX_OFFSET`]; cells address their
    /// children with 32 bits.
    pub fn allocate(&mut self, cells: usize) -> u32 {
        let offset = self.memory.len();
        assert!(
            offset + cells <= Cell::MAX_OFFSET as usize,
            "Trie buffer overflow: {} cells exceed 32-bit addressing",
            offset + cells
        );
        self.memory.resize(offset + cells, Cell::EMPTY_BITS);
        offset as u32
    }

    /// Decode the cell at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Cell {
        Cell::from_bits(self.memory[index])
    }

    /// Overwrite the cell at `index`.
    #[inline]
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.memory[index] = cell.to_bits();
    }

    /// Whether any cell in `block` is present.
    pub fn any_present(&self, block: Range<usize>) -> bool {
        self.memory[block]
            .iter()
            .any(|&bits| bits != Cell::EMPTY_BITS)
    }

    /// Take over the memory of `other`, dropping the current memory.
    ///
    /// `other` must be fully built before the call; the swap itself is a single move.
    pub fn replace(&mut self, other: Buffer) {
        self.memory = other.memory;
    }

    /// Number of allocated cells.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Whether no block has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Bytes held by the backing vector, including spare capacity.
    pub fn byte_size(&self) -> usize {
        self.memory.capacity() * CELL_BYTES
    }
}
