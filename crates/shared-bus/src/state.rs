//! # Shared-State Registry
//!
//! Versioned per-component state snapshots. Components register by name, then
//! publish immutable versions of their state; peers read the latest version
//! without calling into the owning component.
//!
//! The lookup result distinguishes "component unknown" from "registered but
//! nothing published yet" so readers can decide between giving up and waiting.

use crate::events::HubEvent;
use crate::publisher::{EventPublisher, InMemoryEventBus};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors from registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Publish attempted by a component that never registered.
    #[error("Component {0} is not registered")]
    NotRegistered(String),

    /// A lock guarding registry state was poisoned.
    #[error("Registry lock poisoned")]
    LockPoisoned,
}

/// A single published state version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecord {
    /// Monotonic version, starting at 1 per owner.
    pub version: u64,
    /// The published state payload.
    pub data: Value,
    /// Id of the event that caused this publication, when known.
    pub cause_event_id: Option<Uuid>,
}

/// Registration entry for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    /// Component name, e.g. `hub.identity.edge`.
    pub component: String,
    /// Number of versions published so far.
    pub published_versions: u64,
}

/// Result of reading a component's latest shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateLookup {
    /// The component never registered.
    NotRegistered,
    /// Registered, but no version published yet.
    Pending,
    /// The latest published version.
    Published(StateRecord),
}

#[derive(Debug, Default)]
struct ComponentEntry {
    versions: Vec<StateRecord>,
}

/// In-memory shared-state registry.
///
/// Publications optionally emit [`HubEvent::SharedStatePublished`] when a bus
/// handle is attached; the runtime wires this at startup.
#[derive(Default)]
pub struct SharedStateRegistry {
    components: RwLock<HashMap<String, ComponentEntry>>,
    bus: RwLock<Option<Arc<InMemoryEventBus>>>,
}

impl SharedStateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a bus handle so publications announce themselves.
    pub fn attach_bus(&self, bus: Arc<InMemoryEventBus>) {
        if let Ok(mut slot) = self.bus.write() {
            *slot = Some(bus);
        }
    }

    /// Register a component by name. Registering twice is a no-op.
    pub fn register(&self, component: &str) -> Result<(), RegistryError> {
        let mut components = self
            .components
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        if components
            .insert(component.to_string(), ComponentEntry::default())
            .is_none()
        {
            debug!(component, "Component registered");
        }
        Ok(())
    }

    /// Look up a component's registration record.
    pub fn registration(&self, component: &str) -> Result<Option<ComponentRecord>, RegistryError> {
        let components = self
            .components
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(components.get(component).map(|entry| ComponentRecord {
            component: component.to_string(),
            published_versions: entry.versions.len() as u64,
        }))
    }

    /// Publish a new state version for `owner`, returning the version number.
    ///
    /// Emits [`HubEvent::SharedStatePublished`] when a bus is attached.
    ///
    /// # Errors
    ///
    /// `RegistryError::NotRegistered` when `owner` never registered.
    pub async fn publish(
        &self,
        owner: &str,
        data: Value,
        cause_event_id: Option<Uuid>,
    ) -> Result<u64, RegistryError> {
        let version = {
            let mut components = self
                .components
                .write()
                .map_err(|_| RegistryError::LockPoisoned)?;
            let entry = components
                .get_mut(owner)
                .ok_or_else(|| RegistryError::NotRegistered(owner.to_string()))?;

            let version = entry.versions.len() as u64 + 1;
            entry.versions.push(StateRecord {
                version,
                data,
                cause_event_id,
            });
            version
        };

        debug!(owner, version, "Shared state published");

        let bus = match self.bus.read() {
            Ok(slot) => slot.clone(),
            Err(_) => {
                warn!(owner, "Bus handle lock poisoned, publication not announced");
                None
            }
        };
        if let Some(bus) = bus {
            bus.publish(HubEvent::SharedStatePublished {
                owner: owner.to_string(),
                version,
            })
            .await;
        }

        Ok(version)
    }

    /// Read the latest state published by `owner`.
    pub fn latest(&self, owner: &str) -> Result<StateLookup, RegistryError> {
        let components = self
            .components
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(match components.get(owner) {
            None => StateLookup::NotRegistered,
            Some(entry) => match entry.versions.last() {
                None => StateLookup::Pending,
                Some(record) => StateLookup::Published(record.clone()),
            },
        })
    }

    /// Read a specific version published by `owner`, if it exists.
    pub fn version(&self, owner: &str, version: u64) -> Result<Option<StateRecord>, RegistryError> {
        let components = self
            .components
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(components.get(owner).and_then(|entry| {
            version
                .checked_sub(1)
                .and_then(|idx| entry.versions.get(idx as usize))
                .cloned()
        }))
    }
}
