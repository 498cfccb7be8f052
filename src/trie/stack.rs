// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed-capacity stack for explicit depth-first traversal.
//!
//! A traversal over a D-dimensional trie never opens more than D frames, so the stack is
//! sized once and never grows. Several stacks (offsets, block pointers, identifier prefixes)
//! are pushed and popped in lockstep, one entry per open dimension.

/// A stack of `Copy` values with a capacity fixed at construction.
#[derive(Debug, Clone)]
pub struct TraversalStack<T: Copy + Default> {
    /// Backing storage, allocated once
    buffer: Box<[T]>,
    /// Number of live entries
    size: usize,
}

impl<T: Copy + Default> TraversalStack<T> {
    /// Create an empty stack holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity].into_boxed_slice(),
            size: 0,
        }
    }

    /// Push a value.
    ///
    /// # Panics
    ///
    /// Panics if the stack is full (traversal deeper than the dimension count).
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.size == self.buffer.len() {
            panic!(
                "Traversal stack overflow: capacity {} exceeded",
                self.buffer.len()
            );
        }
        self.buffer[self.size] = value;
        self.size += 1;
    }

    /// Remove and return the top value.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> T {
        assert!(self.size > 0, "Traversal stack underflow");
        self.size -= 1;
        self.buffer[self.size]
    }

    /// Return the top value.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn peek(&self) -> T {
        assert!(self.size > 0, "Traversal stack underflow");
        self.buffer[self.size - 1]
    }

    /// Drop every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the stack has no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl TraversalStack<usize> {
    /// Add one to the top value.
    #[inline]
    pub fn increment(&mut self) {
        assert!(self.size > 0, "Traversal stack underflow");
        self.buffer[self.size - 1] += 1;
    }
}
