//! # Runtime Adapters
//!
//! Bridges between the shared-state registry and the identity component's
//! ports.

use std::sync::Arc;

use tracing::warn;

use identity_state::ports::{SharedStateLookup, SharedStateSource};
use shared_bus::{SharedStateRegistry, StateLookup};

/// [`SharedStateSource`] backed by the hub's shared-state registry.
pub struct RegistrySharedStateSource {
    registry: Arc<SharedStateRegistry>,
}

impl RegistrySharedStateSource {
    /// Wrap a registry handle.
    #[must_use]
    pub fn new(registry: Arc<SharedStateRegistry>) -> Self {
        Self { registry }
    }
}

impl SharedStateSource for RegistrySharedStateSource {
    fn component_state(&self, component: &str) -> SharedStateLookup {
        match self.registry.latest(component) {
            Ok(StateLookup::NotRegistered) => SharedStateLookup::NotRegistered,
            Ok(StateLookup::Pending) => SharedStateLookup::Pending,
            Ok(StateLookup::Published(record)) => SharedStateLookup::Published(record.data),
            Err(e) => {
                // A broken registry reads as "not ready yet" so callers defer
                // instead of treating the component as absent.
                warn!(component, error = %e, "Registry lookup failed");
                SharedStateLookup::Pending
            }
        }
    }
}
