// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Predictive properties and their propagation directions.
//!
//! A property put at a node is implied at other nodes according to its [`Direction`]:
//!
//! | Direction | Holds at Q if the property was put at some P with |
//! |-----------|---------------------------------------------------|
//! | `Up`      | P ≤ Q                                             |
//! | `Down`    | P ≥ Q                                             |
//! | `Both`    | P ≤ Q or P ≥ Q                                    |
//! | `None`    | P = Q                                             |
//!
//! Properties are compared by identity. Two properties created separately are different even
//! if they share a direction and a label; a clone is the same property.
//!
//! # Examples
//!
//! ```
//! use sparse_lattice::{Direction, PredictiveProperty};
//!
//! let anonymous = PredictiveProperty::new(Direction::Up);
//! let k_anonymous = PredictiveProperty::with_label(Direction::Up, "k-anonymous");
//!
//! assert_ne!(anonymous, k_anonymous);
//! assert_eq!(k_anonymous, k_anonymous.clone());
//! assert_eq!(k_anonymous.to_string(), "k-anonymous (Up)");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use strum_macros::{Display, EnumCount, EnumIter};

/// How a property put at one node extends to other nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum Direction {
    /// Inherited by every successor.
    Up,
    /// Inherited by every predecessor.
    Down,
    /// Inherited by successors and predecessors.
    Both,
    /// Holds only where it was put.
    None,
}

impl Direction {
    /// Whether successors of a tagged node inherit the property.
    pub fn propagates_up(self) -> bool {
        matches!(self, Direction::Up | Direction::Both)
    }

    /// Whether predecessors of a tagged node inherit the property.
    pub fn propagates_down(self) -> bool {
        matches!(self, Direction::Down | Direction::Both)
    }
}

/// Process-unique identity of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u64);

static NEXT_PROPERTY_ID: AtomicU64 = AtomicU64::new(0);

impl PropertyId {
    fn next() -> Self {
        PropertyId(NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value of this id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A boolean node attribute with a propagation direction.
#[derive(Debug, Clone)]
pub struct PredictiveProperty {
    id: PropertyId,
    direction: Direction,
    label: Option<Arc<str>>,
}

impl PredictiveProperty {
    /// Create an unlabelled property.
    pub fn new(direction: Direction) -> Self {
        Self {
            id: PropertyId::next(),
            direction,
            label: None,
        }
    }

    /// Create a property with a label for display.
    pub fn with_label(direction: Direction, label: impl Into<Arc<str>>) -> Self {
        Self {
            id: PropertyId::next(),
            direction,
            label: Some(label.into()),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }
}

impl PartialEq for PredictiveProperty {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PredictiveProperty {}

impl Hash for PredictiveProperty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PredictiveProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.direction),
            None => write!(f, "property #{} ({})", self.id.0, self.direction),
        }
    }
}
