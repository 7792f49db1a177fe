use crate::domain::IdentityProperties;
use crate::ports::IdentityStore;
use serde_json::Value;

/// Identity service implementing the boot/update/reset state machine.
///
/// Wraps the [`IdentityProperties`] aggregate and a persistence gateway.
/// Mutating operations return effect values (snapshots to publish, consent
/// signals to dispatch) instead of talking to a transport directly.
pub struct IdentityService {
    /// The aggregate state (domain layer).
    pub(crate) properties: IdentityProperties,
    /// Terminal once true; boot becomes a no-op.
    pub(crate) has_booted: bool,
    /// Persistence gateway.
    pub(crate) store: Box<dyn IdentityStore>,
}

impl IdentityService {
    /// Create a service with an empty aggregate. The aggregate is populated
    /// by [`IdentityService::bootup_if_ready`].
    pub fn new(store: Box<dyn IdentityStore>) -> Self {
        Self {
            properties: IdentityProperties::new(),
            has_booted: false,
            store,
        }
    }

    /// Current bootup status.
    #[must_use]
    pub fn has_booted(&self) -> bool {
        self.has_booted
    }

    /// Read access to the current aggregate.
    #[must_use]
    pub fn properties(&self) -> &IdentityProperties {
        &self.properties
    }

    /// The current publishable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.properties.to_xdm_map()
    }
}
