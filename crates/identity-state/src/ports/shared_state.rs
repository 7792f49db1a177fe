use serde_json::Value;

/// Result of looking up another component's published shared state.
///
/// An explicit tri-state instead of speculative map casts: "not registered",
/// "registered but nothing published yet", and "published with this value"
/// are all distinct outcomes the boot protocol branches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedStateLookup {
    /// The component is not registered with the hub.
    NotRegistered,
    /// The component is registered but has not published a state yet.
    Pending,
    /// The component's latest published state.
    Published(Value),
}

/// Read side of the shared-state gateway.
///
/// Publishing this component's own snapshot is NOT part of this port: the
/// mutating operations return the snapshot as an effect value and the host
/// applies it through whatever transport it uses.
pub trait SharedStateSource: Send + Sync {
    /// Look up a component's latest published state.
    fn component_state(&self, component: &str) -> SharedStateLookup;

    /// Whether a component is registered with the hub.
    fn is_registered(&self, component: &str) -> bool {
        !matches!(
            self.component_state(component),
            SharedStateLookup::NotRegistered
        )
    }
}
