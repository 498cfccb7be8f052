// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-property generator stores.
//!
//! An `Up` property keeps the minimal nodes it was put at in an upward trie; a node has the
//! property iff some stored generator lies below it. A `Down` property keeps the maximal
//! nodes in a downward trie. A `Both` property keeps both tries and holds where either one
//! covers the node. A `None` property keeps the exact set of identifiers.
//!
//! Generators of one trie always form an antichain. Putting a node where the property already
//! holds changes nothing, even for `Both` when only one trie covers it. Otherwise each trie
//! clears the generators the new node covers before inserting it.

use crate::config::LatticeConfig;
use crate::property::{Direction, PredictiveProperty, PropertyId};
use crate::space::{Coordinates, NodeSpace};
use crate::trie::{Comparator, Trie, TrieStatistics};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// How one direction trie is queried and maintained.
#[derive(Debug, Clone, Copy)]
struct Orientation {
    /// Finds a generator that implies the property at the key
    covers: Comparator,
    /// Finds the generators the key implies
    covered: Comparator,
}

const UPWARD: Orientation = Orientation {
    covers: Comparator::Leq,
    covered: Comparator::Geq,
};

const DOWNWARD: Orientation = Orientation {
    covers: Comparator::Geq,
    covered: Comparator::Leq,
};

/// Generator stores of every property put into a lattice.
#[derive(Debug, Clone)]
pub(crate) struct PropertyStore {
    space: Arc<NodeSpace>,
    config: LatticeConfig,
    up: FxHashMap<PropertyId, Trie>,
    down: FxHashMap<PropertyId, Trie>,
    exact: FxHashMap<PropertyId, FxHashSet<u64>>,
    /// In order of first use
    registered: IndexMap<PropertyId, PredictiveProperty>,
}

impl PropertyStore {
    pub(crate) fn new(space: Arc<NodeSpace>, config: LatticeConfig) -> Self {
        Self {
            space,
            config,
            up: FxHashMap::default(),
            down: FxHashMap::default(),
            exact: FxHashMap::default(),
            registered: IndexMap::new(),
        }
    }

    /// Registered properties in order of first use.
    pub(crate) fn registered(&self) -> impl Iterator<Item = &PredictiveProperty> + '_ {
        self.registered.values()
    }

    /// Tag the node `key` (identifier `id`). Returns whether any store changed.
    pub(crate) fn put<K: Coordinates + ?Sized>(
        &mut self,
        property: &PredictiveProperty,
        key: &K,
        id: u64,
    ) -> bool {
        self.register(property);
        let pid = property.id();
        let direction = property.direction();

        if direction == Direction::None {
            return self.exact.entry(pid).or_default().insert(id);
        }

        // Nothing changes where the property already holds, in either direction
        if self.has(property, key, id) {
            return false;
        }

        let mut changed = false;
        if direction.propagates_up() {
            if let Some(trie) = self.up.get_mut(&pid) {
                changed |= Self::insert_generator(trie, key, UPWARD);
            }
        }
        if direction.propagates_down() {
            if let Some(trie) = self.down.get_mut(&pid) {
                changed |= Self::insert_generator(trie, key, DOWNWARD);
            }
        }
        changed
    }

    /// Untag the node `key`. An `Up` property loses every generator at or above the node, a
    /// `Down` property every generator at or below it. Returns the number of generators or
    /// exact entries removed.
    pub(crate) fn remove<K: Coordinates + ?Sized>(
        &mut self,
        property: &PredictiveProperty,
        key: &K,
        id: u64,
    ) -> usize {
        let pid = property.id();
        let direction = property.direction();

        if direction == Direction::None {
            return self
                .exact
                .get_mut(&pid)
                .map_or(0, |set| usize::from(set.remove(&id)));
        }

        let mut removed = 0;
        if direction.propagates_up() {
            if let Some(trie) = self.up.get_mut(&pid) {
                removed += trie.clear(key, UPWARD.covered);
            }
        }
        if direction.propagates_down() {
            if let Some(trie) = self.down.get_mut(&pid) {
                removed += trie.clear(key, DOWNWARD.covered);
            }
        }
        removed
    }

    /// Whether `property` holds at the node. Unregistered properties hold nowhere.
    pub(crate) fn has<K: Coordinates + ?Sized>(
        &self,
        property: &PredictiveProperty,
        key: &K,
        id: u64,
    ) -> bool {
        let pid = property.id();
        match property.direction() {
            Direction::None => self.exact.get(&pid).is_some_and(|set| set.contains(&id)),
            direction => {
                (direction.propagates_up()
                    && self
                        .up
                        .get(&pid)
                        .is_some_and(|trie| trie.contains(key, UPWARD.covers)))
                    || (direction.propagates_down()
                        && self
                            .down
                            .get(&pid)
                            .is_some_and(|trie| trie.contains(key, DOWNWARD.covers)))
            }
        }
    }

    /// Whether any registered property holds at the node.
    pub(crate) fn has_any<K: Coordinates + ?Sized>(&self, key: &K, id: u64) -> bool {
        self.registered
            .values()
            .any(|property| self.has(property, key, id))
    }

    /// Stored generators of `property`, or exact entries for a `None` property.
    pub(crate) fn generator_count(&self, property: &PredictiveProperty) -> usize {
        let pid = property.id();
        let up = self.up.get(&pid).map_or(0, Trie::len);
        let down = self.down.get(&pid).map_or(0, Trie::len);
        let exact = self.exact.get(&pid).map_or(0, FxHashSet::len);
        up + down + exact
    }

    /// Statistics of the upward then the downward trie of `property`, where present.
    pub(crate) fn statistics(&self, property: &PredictiveProperty) -> Vec<TrieStatistics> {
        let pid = property.id();
        self.up
            .get(&pid)
            .into_iter()
            .chain(self.down.get(&pid))
            .map(Trie::statistics)
            .collect()
    }

    /// Bytes held by the trie buffers and the payload slots of the exact sets. Hash table
    /// control bytes are not counted, so this is a lower bound.
    pub(crate) fn byte_size(&self) -> usize {
        let tries: usize = self
            .up
            .values()
            .chain(self.down.values())
            .map(Trie::byte_size)
            .sum();
        let exact: usize = self
            .exact
            .values()
            .map(|set| set.capacity() * std::mem::size_of::<u64>())
            .sum();
        tries + exact
    }

    fn register(&mut self, property: &PredictiveProperty) {
        let pid = property.id();
        if self.registered.contains_key(&pid) {
            return;
        }
        tracing::trace!(property = %property, "registering property");

        let direction = property.direction();
        if direction.propagates_up() {
            self.up
                .insert(pid, Trie::with_config(Arc::clone(&self.space), self.config));
        }
        if direction.propagates_down() {
            self.down
                .insert(pid, Trie::with_config(Arc::clone(&self.space), self.config));
        }
        if direction == Direction::None {
            self.exact.insert(pid, FxHashSet::default());
        }
        self.registered.insert(pid, property.clone());
    }

    /// Insert `key` into a trie that does not cover it yet, evicting what it covers.
    fn insert_generator<K: Coordinates + ?Sized>(
        trie: &mut Trie,
        key: &K,
        orientation: Orientation,
    ) -> bool {
        debug_assert!(!trie.contains(key, orientation.covers));
        trie.clear(key, orientation.covered);
        trie.put(key)
    }
}
