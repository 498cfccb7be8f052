// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The lattice: sparse user data and predictive properties over one node space.
//!
//! Nodes are addressed by coordinate vectors or by packed identifiers; every operation has
//! both forms and checks its argument before touching any store. A master trie records every
//! node that data or a property was ever put at, and backs [`Lattice::list_nodes`] and its
//! relatives.
//!
//! # Examples
//!
//! ```
//! use sparse_lattice::{Direction, Lattice, PredictiveProperty};
//!
//! let mut lattice: Lattice<&str, String> = Lattice::new(vec![
//!     vec!["A", "B", "C", "D"],
//!     vec!["A", "B"],
//!     vec!["A", "B", "C"],
//! ])
//! .unwrap();
//!
//! let node = lattice.build().next(&"B").next(&"B").next(&"C").create().unwrap();
//! lattice.put_data(&node, "payload".to_string()).unwrap();
//! assert_eq!(lattice.get_data(&node).unwrap(), Some(&"payload".to_string()));
//!
//! let anonymous = PredictiveProperty::new(Direction::Up);
//! lattice.put_property(&node, &anonymous).unwrap();
//! assert!(lattice.has_property(&[2, 1, 2], &anonymous).unwrap());
//! assert!(!lattice.has_property(&[0, 1, 2], &anonymous).unwrap());
//! ```

pub mod cursor;
mod properties;
mod scan;

pub use cursor::NodeCursor;

use crate::config::LatticeConfig;
use crate::error::Result;
use crate::property::PredictiveProperty;
use crate::space::{Coordinates, Domains, NodeBuilder, NodeSpace};
use crate::trie::{Comparator, Identifiers, Nodes, Trie, TrieStatistics};
use properties::PropertyStore;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// Sparse storage of data of type `U` and predictive properties over the product of domains
/// with values of type `T`.
///
/// A clone is a separate lattice: cursors of the original are rejected by it.
#[derive(Debug)]
pub struct Lattice<T, U> {
    /// Distinct for every lattice and every clone
    instance: u64,
    space: Arc<NodeSpace>,
    domains: Domains<T>,
    data: FxHashMap<u64, U>,
    /// Every node that data or a property was put at
    master: Trie,
    properties: PropertyStore,
    /// Incremented on every mutation
    generation: u64,
}

impl<T: Clone, U: Clone> Clone for Lattice<T, U> {
    fn clone(&self) -> Self {
        Self {
            instance: next_instance(),
            space: Arc::clone(&self.space),
            domains: self.domains.clone(),
            data: self.data.clone(),
            master: self.master.clone(),
            properties: self.properties.clone(),
            generation: self.generation,
        }
    }
}

impl<T: Hash + Eq, U> Lattice<T, U> {
    /// Create a lattice over one list of values per dimension, with default configuration.
    ///
    /// The order of values in a list is the order of that dimension.
    pub fn new(domains: Vec<Vec<T>>) -> Result<Self> {
        Self::with_config(domains, LatticeConfig::default())
    }

    /// Create a lattice with the given configuration.
    pub fn with_config(domains: Vec<Vec<T>>, config: LatticeConfig) -> Result<Self> {
        config.validate()?;
        let domains = Domains::new(domains)?;
        let space = Arc::new(NodeSpace::new(domains.heights())?);
        tracing::debug!(
            dimensions = space.dimensions(),
            nodes = space.num_nodes(),
            levels = space.levels(),
            "created lattice"
        );

        Ok(Self {
            instance: next_instance(),
            master: Trie::with_config(Arc::clone(&space), config),
            properties: PropertyStore::new(Arc::clone(&space), config),
            data: FxHashMap::default(),
            generation: 0,
            domains,
            space,
        })
    }

    /// Start building a node from source values.
    pub fn build(&self) -> NodeBuilder<'_, T> {
        self.domains.builder()
    }
}

impl<U> Lattice<usize, U> {
    /// Create a lattice whose domain values are the coordinates `0..height` themselves.
    pub fn from_heights(heights: &[usize]) -> Result<Self> {
        Self::from_heights_with_config(heights, LatticeConfig::default())
    }

    /// Create an index-only lattice with the given configuration.
    pub fn from_heights_with_config(heights: &[usize], config: LatticeConfig) -> Result<Self> {
        Self::with_config(
            heights.iter().map(|&height| (0..height).collect()).collect(),
            config,
        )
    }
}

impl<T, U> Lattice<T, U> {
    /// Shape of the lattice: heights, identifiers and levels.
    pub fn space(&self) -> &NodeSpace {
        &self.space
    }

    /// Source values of every dimension.
    pub fn domains(&self) -> &Domains<T> {
        &self.domains
    }

    /// Whether data or a property was ever put at `node`.
    pub fn contains(&self, node: &[usize]) -> Result<bool> {
        self.space.check_node(node)?;
        Ok(self.master.contains(node, Comparator::Eq))
    }

    /// Identifier form of [`Lattice::contains`].
    pub fn contains_id(&self, id: u64) -> Result<bool> {
        let key = self.space.packed(id)?;
        Ok(self.master.contains(&key, Comparator::Eq))
    }

    /// Whether data was put at `node`.
    pub fn contains_data(&self, node: &[usize]) -> Result<bool> {
        let id = self.space.to_id(node)?;
        Ok(self.data.contains_key(&id))
    }

    /// Identifier form of [`Lattice::contains_data`].
    pub fn contains_data_id(&self, id: u64) -> Result<bool> {
        self.space.check_id(id)?;
        Ok(self.data.contains_key(&id))
    }

    /// Data attached to `node`, if any.
    pub fn get_data(&self, node: &[usize]) -> Result<Option<&U>> {
        let id = self.space.to_id(node)?;
        Ok(self.data.get(&id))
    }

    /// Identifier form of [`Lattice::get_data`].
    pub fn get_data_id(&self, id: u64) -> Result<Option<&U>> {
        self.space.check_id(id)?;
        Ok(self.data.get(&id))
    }

    /// Mutable access to the data attached to `node`. Does not move the generation.
    pub fn get_data_mut(&mut self, node: &[usize]) -> Result<Option<&mut U>> {
        let id = self.space.to_id(node)?;
        Ok(self.data.get_mut(&id))
    }

    /// Attach `value` to `node`, returning the value it replaces.
    pub fn put_data(&mut self, node: &[usize], value: U) -> Result<Option<U>> {
        let id = self.space.to_id(node)?;
        self.master.put(node);
        self.generation += 1;
        Ok(self.data.insert(id, value))
    }

    /// Identifier form of [`Lattice::put_data`].
    pub fn put_data_id(&mut self, id: u64, value: U) -> Result<Option<U>> {
        let space = Arc::clone(&self.space);
        let key = space.packed(id)?;
        self.master.put(&key);
        self.generation += 1;
        Ok(self.data.insert(id, value))
    }

    /// Whether `property` holds at `node`, put there or inherited according to its direction.
    pub fn has_property(&self, node: &[usize], property: &PredictiveProperty) -> Result<bool> {
        let id = self.space.to_id(node)?;
        Ok(self.properties.has(property, node, id))
    }

    /// Identifier form of [`Lattice::has_property`].
    pub fn has_property_id(&self, id: u64, property: &PredictiveProperty) -> Result<bool> {
        let key = self.space.packed(id)?;
        Ok(self.properties.has(property, &key, id))
    }

    /// Whether any property put into this lattice holds at `node`.
    pub fn has_any_property(&self, node: &[usize]) -> Result<bool> {
        let id = self.space.to_id(node)?;
        Ok(self.properties.has_any(node, id))
    }

    /// Identifier form of [`Lattice::has_any_property`].
    pub fn has_any_property_id(&self, id: u64) -> Result<bool> {
        let key = self.space.packed(id)?;
        Ok(self.properties.has_any(&key, id))
    }

    /// Tag `node` with `property`.
    ///
    /// The node is recorded in the master trie whatever the direction. Where the property
    /// already holds nothing else changes; for `Both` that includes a node covered by only one
    /// direction. Otherwise the node becomes a generator and the generators it implies are
    /// dropped.
    pub fn put_property(&mut self, node: &[usize], property: &PredictiveProperty) -> Result<()> {
        let id = self.space.to_id(node)?;
        self.put_property_key(node, id, property);
        Ok(())
    }

    /// Identifier form of [`Lattice::put_property`].
    pub fn put_property_id(&mut self, id: u64, property: &PredictiveProperty) -> Result<()> {
        let space = Arc::clone(&self.space);
        let key = space.packed(id)?;
        self.put_property_key(&key, id, property);
        Ok(())
    }

    /// Untag `node`.
    ///
    /// For `Up` every generator at or above the node is dropped, for `Down` every generator at
    /// or below it, for `Both` both. The property may still hold at the node afterwards through
    /// a generator on the other side. Removing a property that was never put is a no-op.
    pub fn remove_property(
        &mut self,
        node: &[usize],
        property: &PredictiveProperty,
    ) -> Result<()> {
        let id = self.space.to_id(node)?;
        self.remove_property_key(node, id, property);
        Ok(())
    }

    /// Identifier form of [`Lattice::remove_property`].
    pub fn remove_property_id(&mut self, id: u64, property: &PredictiveProperty) -> Result<()> {
        let space = Arc::clone(&self.space);
        let key = space.packed(id)?;
        self.remove_property_key(&key, id, property);
        Ok(())
    }

    /// Number of generators stored for `property`, or of exact entries for a `None` property.
    pub fn generator_count(&self, property: &PredictiveProperty) -> usize {
        self.properties.generator_count(property)
    }

    /// Properties put into this lattice, in order of first use.
    pub fn properties(&self) -> impl Iterator<Item = &PredictiveProperty> + '_ {
        self.properties.registered()
    }

    /// Statistics of the tries backing `property`: the upward trie first, then the downward
    /// one. Empty for a `None` property or one never put.
    pub fn property_statistics(&self, property: &PredictiveProperty) -> Vec<TrieStatistics> {
        self.properties.statistics(property)
    }

    /// Nodes recorded in the master trie, in lexicographic order.
    pub fn list_nodes(&self) -> Nodes<'_> {
        self.master.nodes()
    }

    /// Recorded nodes whose coordinates sum to `level`, in lexicographic order.
    pub fn list_nodes_at_level(&self, level: usize) -> Result<Nodes<'_>> {
        self.master.nodes_at_level(level)
    }

    /// Identifiers of the recorded nodes, ascending.
    pub fn list_identifiers(&self) -> Identifiers<'_> {
        self.master.identifiers()
    }

    /// Identifiers of the recorded nodes on `level`, ascending.
    pub fn list_identifiers_at_level(&self, level: usize) -> Result<Identifiers<'_>> {
        self.master.identifiers_at_level(level)
    }

    /// Size of the full space, recorded or not.
    pub fn num_nodes(&self) -> u64 {
        self.space.num_nodes()
    }

    /// Number of levels, from the bottom node up to the top node.
    pub fn num_levels(&self) -> usize {
        self.space.levels()
    }

    /// Number of dimensions.
    pub fn num_dimensions(&self) -> usize {
        self.space.dimensions()
    }

    /// Bytes held by the tries, the exact property sets and the data store. Hash table control
    /// bytes and heap data owned by `U` are not counted, so this is a lower bound.
    pub fn byte_size(&self) -> usize {
        let data = self.data.capacity() * std::mem::size_of::<(u64, U)>();
        self.master.byte_size() + self.properties.byte_size() + data
    }

    /// Mutation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the lattice changed since `generation` was read.
    pub fn is_modified_since(&self, generation: u64) -> bool {
        self.generation != generation
    }

    fn put_property_key<K: Coordinates + ?Sized>(
        &mut self,
        key: &K,
        id: u64,
        property: &PredictiveProperty,
    ) {
        let recorded = self.master.put(key);
        let changed = self.properties.put(property, key, id);
        if recorded || changed {
            self.generation += 1;
        }
    }

    fn remove_property_key<K: Coordinates + ?Sized>(
        &mut self,
        key: &K,
        id: u64,
        property: &PredictiveProperty,
    ) {
        if self.properties.remove(property, key, id) > 0 {
            self.generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LatticeError;
    use crate::property::Direction;

    fn lattice() -> Lattice<usize, &'static str> {
        Lattice::from_heights(&[4, 2, 3]).unwrap()
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Lattice::<u8, ()>::new(vec![]).unwrap_err(),
            LatticeError::NoDimensions
        );
        assert_eq!(
            Lattice::<u8, ()>::new(vec![vec![1], vec![]]).unwrap_err(),
            LatticeError::EmptyDomain { dimension: 1 }
        );
        assert!(matches!(
            Lattice::<usize, ()>::from_heights_with_config(
                &[2, 2],
                LatticeConfig::default().with_compaction_threshold(1.5)
            ),
            Err(LatticeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_metadata() {
        let lattice = lattice();
        assert_eq!(lattice.num_nodes(), 24);
        assert_eq!(lattice.num_levels(), 7);
        assert_eq!(lattice.num_dimensions(), 3);
        assert!(lattice.byte_size() > 0);
    }

    #[test]
    fn test_data_round_trip() {
        let mut lattice = lattice();
        assert_eq!(lattice.put_data(&[1, 1, 2], "a").unwrap(), None);
        assert_eq!(lattice.put_data(&[1, 1, 2], "b").unwrap(), Some("a"));
        assert_eq!(lattice.get_data(&[1, 1, 2]).unwrap(), Some(&"b"));
        assert!(lattice.contains(&[1, 1, 2]).unwrap());
        assert!(lattice.contains_data(&[1, 1, 2]).unwrap());
        assert!(!lattice.contains(&[1, 1, 1]).unwrap());

        if let Some(value) = lattice.get_data_mut(&[1, 1, 2]).unwrap() {
            *value = "c";
        }
        let id = lattice.space().to_id(&[1, 1, 2]).unwrap();
        assert_eq!(lattice.get_data_id(id).unwrap(), Some(&"c"));
        assert!(lattice.contains_id(id).unwrap());
    }

    #[test]
    fn test_property_marks_master_only() {
        let mut lattice = lattice();
        let p = PredictiveProperty::new(Direction::Up);
        lattice.put_property(&[0, 1, 0], &p).unwrap();
        assert!(lattice.contains(&[0, 1, 0]).unwrap());
        assert!(!lattice.contains_data(&[0, 1, 0]).unwrap());
        assert_eq!(lattice.get_data(&[0, 1, 0]).unwrap(), None);
    }

    #[test]
    fn test_rejects_before_mutation() {
        let mut lattice = lattice();
        let p = PredictiveProperty::new(Direction::Down);
        let generation = lattice.generation();

        assert!(lattice.put_data(&[4, 0, 0], "x").is_err());
        assert!(lattice.put_property(&[0, 0], &p).is_err());
        assert!(lattice.put_property_id(24, &p).is_err());
        assert!(lattice.remove_property(&[0, 2, 0], &p).is_err());
        assert!(lattice.has_property_id(99, &p).is_err());
        assert!(lattice.list_nodes_at_level(7).is_err());

        assert_eq!(lattice.generation(), generation);
        assert_eq!(lattice.list_nodes().count(), 0);
        assert_eq!(lattice.properties().count(), 0);
    }

    #[test]
    fn test_generation_tracks_changes() {
        let mut lattice = lattice();
        let p = PredictiveProperty::new(Direction::Up);
        let start = lattice.generation();

        lattice.put_property(&[1, 0, 0], &p).unwrap();
        assert!(lattice.is_modified_since(start));

        let after = lattice.generation();
        lattice.put_property(&[1, 0, 0], &p).unwrap();
        assert!(!lattice.is_modified_since(after));

        lattice.remove_property(&[3, 1, 2], &p).unwrap();
        assert!(!lattice.is_modified_since(after));
        lattice.remove_property(&[0, 0, 0], &p).unwrap();
        assert!(lattice.is_modified_since(after));
    }

    #[test]
    fn test_identifier_forms_agree() {
        let mut lattice = lattice();
        let p = PredictiveProperty::new(Direction::Down);
        let id = lattice.space().to_id(&[2, 0, 1]).unwrap();
        lattice.put_property_id(id, &p).unwrap();
        lattice.put_data_id(id, "d").unwrap();

        assert!(lattice.has_property(&[1, 0, 1], &p).unwrap());
        assert!(lattice.has_property_id(id, &p).unwrap());
        assert!(lattice.has_any_property_id(id).unwrap());
        assert!(lattice.contains_data(&[2, 0, 1]).unwrap());
        assert!(lattice.contains_data_id(id).unwrap());

        lattice.remove_property_id(id, &p).unwrap();
        assert!(!lattice.has_property(&[1, 0, 1], &p).unwrap());
        assert!(!lattice.has_any_property(&[2, 0, 1]).unwrap());
    }
}
