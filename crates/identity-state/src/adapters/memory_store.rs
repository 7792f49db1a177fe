use crate::domain::{Ecid, IdentityError, IdentityProperties};
use crate::ports::IdentityStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// In-memory implementation of [`IdentityStore`] for testing.
///
/// Counts `save` calls so tests can assert write-after-call semantics and
/// boot idempotence.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    properties: RwLock<Option<IdentityProperties>>,
    legacy_ecid: RwLock<Option<Ecid>>,
    save_count: AtomicUsize,
}

impl InMemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-persisted properties.
    pub fn with_properties(properties: IdentityProperties) -> Self {
        let store = Self::new();
        *store.properties.write().unwrap_or_else(|e| e.into_inner()) = Some(properties);
        store
    }

    /// Seed the direct identity component's migratable identifier.
    pub fn set_legacy_ecid(&self, ecid: Option<Ecid>) {
        *self.legacy_ecid.write().unwrap_or_else(|e| e.into_inner()) = ecid;
    }

    /// Number of `save` calls made so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::Relaxed)
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn load(&self) -> Result<Option<IdentityProperties>, IdentityError> {
        let properties = self
            .properties
            .read()
            .map_err(|_| IdentityError::LockPoisoned)?;
        Ok(properties.clone())
    }

    fn save(&self, properties: &IdentityProperties) -> Result<(), IdentityError> {
        let mut stored = self
            .properties
            .write()
            .map_err(|_| IdentityError::LockPoisoned)?;
        *stored = Some(properties.clone());
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn load_legacy_ecid(&self) -> Result<Option<Ecid>, IdentityError> {
        let legacy = self
            .legacy_ecid
            .read()
            .map_err(|_| IdentityError::LockPoisoned)?;
        Ok(legacy.clone())
    }
}
