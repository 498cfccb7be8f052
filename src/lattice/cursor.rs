// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration of recorded nodes that does not borrow the lattice.
//!
//! A [`NodeCursor`] remembers the lattice generation it was created at. Each step is handed
//! the lattice again and fails with [`LatticeError::StaleCursor`] once the lattice has been
//! mutated, so a caller may interleave reads and writes and learn when a cursor went stale.
//! Handing it any other lattice, a clone included, fails with [`LatticeError::ForeignCursor`].
//!
//! ```
//! use sparse_lattice::{Lattice, LatticeError};
//!
//! let mut lattice: Lattice<usize, u32> = Lattice::from_heights(&[3, 3]).unwrap();
//! lattice.put_data(&[1, 2], 7).unwrap();
//!
//! let mut cursor = lattice.cursor();
//! assert_eq!(cursor.next_node(&lattice).unwrap(), Some(vec![1, 2]));
//!
//! lattice.put_data(&[2, 2], 8).unwrap();
//! assert!(matches!(
//!     cursor.next_node(&lattice),
//!     Err(LatticeError::StaleCursor { .. })
//! ));
//! ```

use super::Lattice;
use crate::error::{LatticeError, Result};
use crate::trie::walk::Walk;
use std::sync::Arc;

/// Detached, generation-checked enumerator over the nodes recorded in a lattice.
#[derive(Debug, Clone)]
pub struct NodeCursor {
    walk: Walk,
    /// Instance of the lattice that created the cursor
    lattice: u64,
    generation: u64,
}

impl NodeCursor {
    /// Generation of the lattice when this cursor was created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next recorded node, in lexicographic order.
    ///
    /// `lattice` must be the lattice that created this cursor.
    pub fn next_node<T, U>(&mut self, lattice: &Lattice<T, U>) -> Result<Option<Vec<usize>>> {
        self.check(lattice)?;
        if self.walk.advance(lattice.master.buffer()) {
            Ok(Some(self.walk.element().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// Identifier of the next recorded node, ascending.
    pub fn next_identifier<T, U>(&mut self, lattice: &Lattice<T, U>) -> Result<Option<u64>> {
        self.check(lattice)?;
        if self.walk.advance(lattice.master.buffer()) {
            Ok(Some(self.walk.identifier()))
        } else {
            Ok(None)
        }
    }

    fn check<T, U>(&self, lattice: &Lattice<T, U>) -> Result<()> {
        if lattice.instance != self.lattice {
            return Err(LatticeError::ForeignCursor);
        }
        if lattice.generation != self.generation {
            return Err(LatticeError::StaleCursor {
                created: self.generation,
                current: lattice.generation,
            });
        }
        Ok(())
    }
}

impl<T, U> Lattice<T, U> {
    /// Cursor over every recorded node.
    pub fn cursor(&self) -> NodeCursor {
        NodeCursor {
            walk: Walk::new(Arc::clone(&self.space), None),
            lattice: self.instance,
            generation: self.generation,
        }
    }

    /// Cursor over the recorded nodes on `level`.
    pub fn cursor_at_level(&self, level: usize) -> Result<NodeCursor> {
        self.space.check_level(level)?;
        Ok(NodeCursor {
            walk: Walk::new(Arc::clone(&self.space), Some(level)),
            lattice: self.instance,
            generation: self.generation,
        })
    }
}
