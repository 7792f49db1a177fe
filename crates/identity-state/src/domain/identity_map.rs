//! Ordered, namespace-keyed identifier collection with the merge and remove
//! algorithms.
//!
//! ## Invariants
//!
//! - Within one namespace, at most one item per distinct `id` value.
//! - Per-namespace list order is insertion order and is preserved across
//!   merges: updating an existing id rewrites its payload fields in place.
//! - Namespace keys are never empty; an empty namespace is never retained.
//! - Merge is idempotent.

use super::IdentityItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// `namespace -> ordered list of items`.
///
/// Namespace keys sort deterministically; item order inside a namespace is
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityMap {
    items: BTreeMap<String, Vec<IdentityItem>>,
}

impl IdentityMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no namespace holds any item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Namespaces currently present, in key order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Items of one namespace, in insertion order.
    #[must_use]
    pub fn items_for(&self, namespace: &str) -> Option<&[IdentityItem]> {
        self.items.get(namespace).map(Vec::as_slice)
    }

    /// Add or update a single item. Malformed entries (empty/whitespace
    /// namespace or empty id) are dropped silently.
    ///
    /// Returns whether the map changed (new item appended, or an existing
    /// item's payload fields actually differed).
    pub fn add_item(&mut self, namespace: &str, item: IdentityItem) -> bool {
        if namespace.trim().is_empty() {
            debug!("Dropping identity item with empty namespace");
            return false;
        }
        if item.id.is_empty() {
            debug!(namespace, "Dropping identity item with empty id");
            return false;
        }

        let list = self.items.entry(namespace.to_string()).or_default();
        match list.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                // Update in place, position unchanged.
                let changed = existing.authenticated_state != item.authenticated_state
                    || existing.primary != item.primary;
                existing.authenticated_state = item.authenticated_state;
                existing.primary = item.primary;
                changed
            }
            None => {
                list.push(item);
                true
            }
        }
    }

    /// Merge `incoming` into this map per the in-place-update/append rules.
    ///
    /// Returns whether any field changed, so callers can decide whether to
    /// persist or publish.
    pub fn merge(&mut self, incoming: &IdentityMap) -> bool {
        let mut changed = false;
        for (namespace, items) in &incoming.items {
            for item in items {
                changed |= self.add_item(namespace, item.clone());
            }
        }
        changed
    }

    /// Remove every namespace/id pair present in `to_remove`. Matches are
    /// exact and case-sensitive; removing a non-existent item is silently
    /// ignored. Namespaces emptied by removal are dropped entirely.
    pub fn remove_items(&mut self, to_remove: &IdentityMap) {
        for (namespace, items) in &to_remove.items {
            let Some(list) = self.items.get_mut(namespace) else {
                continue;
            };
            for item in items {
                list.retain(|existing| existing.id != item.id);
            }
            if list.is_empty() {
                self.items.remove(namespace);
            }
        }
    }

    /// Remove all items under one namespace.
    pub fn clear_namespace(&mut self, namespace: &str) {
        self.items.remove(namespace);
    }

    /// Drop entries under any of the given namespaces, logging what was
    /// filtered. Used to keep reserved namespaces out of customer updates.
    pub fn retain_without_namespaces(&mut self, reserved: &[&str]) {
        let before = self.items.len();
        self.items
            .retain(|namespace, _| !reserved.contains(&namespace.as_str()));
        if self.items.len() != before {
            debug!("Filtered reserved namespaces from incoming identity map");
        }
    }
}
