use crate::domain::{Ecid, IdentityError, IdentityProperties};

/// Persistence gateway abstraction.
///
/// Implementations must be durable and synchronous from the service's point
/// of view: ordering of consecutive `save` calls is preserved, and no work
/// after `save` returns may race the physical write.
pub trait IdentityStore: Send + Sync {
    /// Load the persisted aggregate, if any exists.
    fn load(&self) -> Result<Option<IdentityProperties>, IdentityError>;

    /// Persist the aggregate durably.
    fn save(&self, properties: &IdentityProperties) -> Result<(), IdentityError>;

    /// One-shot migration read of the direct identity component's own
    /// persisted identifier. Absence is the normal first-launch case.
    fn load_legacy_ecid(&self) -> Result<Option<Ecid>, IdentityError>;
}

impl<S: IdentityStore + ?Sized> IdentityStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<IdentityProperties>, IdentityError> {
        (**self).load()
    }

    fn save(&self, properties: &IdentityProperties) -> Result<(), IdentityError> {
        (**self).save(properties)
    }

    fn load_legacy_ecid(&self) -> Result<Option<Ecid>, IdentityError> {
        (**self).load_legacy_ecid()
    }
}
