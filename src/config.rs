// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lattice configuration and tuning constants.

use crate::error::{LatticeError, Result};

/// Compaction runs after a clear when `used / allocated` cells drops below this ratio.
pub const DEFAULT_COMPACTION_THRESHOLD: f64 = 0.2;

/// Size in bytes of one trie memory cell.
pub const CELL_BYTES: usize = std::mem::size_of::<u32>();

/// Tuning knobs shared by every trie a lattice creates.
///
/// # Example
///
/// ```
/// use sparse_lattice::{Lattice, LatticeConfig};
///
/// let config = LatticeConfig::default()
///     .with_compaction_threshold(0.5)
///     .with_initial_cells(1024);
/// let lattice: Lattice<usize, ()> = Lattice::from_heights_with_config(&[4, 2, 3], config).unwrap();
/// assert_eq!(lattice.num_nodes(), 24);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeConfig {
    /// Utilization ratio in `[0, 1)` below which a trie rebuilds its buffer.
    /// `0.0` disables compaction.
    pub compaction_threshold: f64,

    /// Cells reserved up front in each trie buffer.
    pub initial_cells: usize,
}

impl LatticeConfig {
    /// Set the compaction threshold.
    pub fn with_compaction_threshold(mut self, threshold: f64) -> Self {
        self.compaction_threshold = threshold;
        self
    }

    /// Set the number of cells reserved in each new trie buffer.
    pub fn with_initial_cells(mut self, cells: usize) -> Self {
        self.initial_cells = cells;
        self
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.compaction_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(LatticeError::InvalidConfig(format!(
                "compaction threshold {} must lie in [0, 1)",
                threshold
            )));
        }
        Ok(())
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
            initial_cells: 0,
        }
    }
}
