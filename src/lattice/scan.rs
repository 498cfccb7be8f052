// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Scans over the whole node space, recorded or not.
//!
//! These walk every node of the space (or of one level) and so cost time proportional to the
//! space, not to the stored data. The property scans evaluate the property engine at each
//! node.

use super::Lattice;
use crate::error::Result;
use crate::property::PredictiveProperty;
use crate::trie::walk::{Dense, Walk};
use crate::trie::{Identifiers, Nodes};
use std::sync::Arc;

impl<T, U> Lattice<T, U> {
    /// Record every node of the space in the master trie.
    pub fn materialize(&mut self) {
        let before = self.master.len();
        let mut walk = Walk::new(Arc::clone(&self.space), None);
        while walk.advance(&Dense) {
            self.master.put(walk.element());
        }
        if self.master.len() != before {
            self.generation += 1;
        }
        tracing::debug!(
            added = self.master.len() - before,
            bytes = self.master.byte_size(),
            "materialized lattice"
        );
    }

    /// Every node of the space, in lexicographic order.
    pub fn all_nodes(&self) -> Nodes<'static> {
        Nodes::over_space(Walk::new(Arc::clone(&self.space), None))
    }

    /// Every node on `level`.
    pub fn all_nodes_at_level(&self, level: usize) -> Result<Nodes<'static>> {
        self.space.check_level(level)?;
        Ok(Nodes::over_space(Walk::new(
            Arc::clone(&self.space),
            Some(level),
        )))
    }

    /// Every identifier of the space, ascending.
    pub fn all_identifiers(&self) -> Identifiers<'static> {
        Identifiers::over_space(Walk::new(Arc::clone(&self.space), None))
    }

    pub fn all_identifiers_at_level(&self, level: usize) -> Result<Identifiers<'static>> {
        self.space.check_level(level)?;
        Ok(Identifiers::over_space(Walk::new(
            Arc::clone(&self.space),
            Some(level),
        )))
    }

    /// Identifiers on `level` at which `property` holds.
    pub fn nodes_with_property<'a>(
        &'a self,
        property: &'a PredictiveProperty,
        level: usize,
    ) -> Result<impl Iterator<Item = u64> + 'a> {
        Ok(self
            .all_identifiers_at_level(level)?
            .filter(move |&id| self.has_property_unchecked(property, id)))
    }

    /// Identifiers on `level` at which some property holds.
    pub fn nodes_with_any_property(&self, level: usize) -> Result<impl Iterator<Item = u64> + '_> {
        Ok(self
            .all_identifiers_at_level(level)?
            .filter(move |&id| self.has_any_property_unchecked(id)))
    }

    /// Identifiers on `level` at which no property holds.
    pub fn nodes_without_property(&self, level: usize) -> Result<impl Iterator<Item = u64> + '_> {
        Ok(self
            .all_identifiers_at_level(level)?
            .filter(move |&id| !self.has_any_property_unchecked(id)))
    }

    /// Identifiers of the whole space at which no property holds.
    pub fn nodes_without_any_property(&self) -> impl Iterator<Item = u64> + '_ {
        self.all_identifiers()
            .filter(move |&id| !self.has_any_property_unchecked(id))
    }

    fn has_property_unchecked(&self, property: &PredictiveProperty, id: u64) -> bool {
        let key = self.space.packed_unchecked(id);
        self.properties.has(property, &key, id)
    }

    fn has_any_property_unchecked(&self, id: u64) -> bool {
        let key = self.space.packed_unchecked(id);
        self.properties.has_any(&key, id)
    }
}
