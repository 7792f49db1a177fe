//! Shared constants for namespaces, wire keys, and component names.

/// Canonical "no advertising identifier" sentinel. Some platforms report this
/// all-zero value instead of an empty string when ad tracking is limited.
pub const ZERO_ADVERTISING_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Reserved identity namespaces. Entries under these keys are managed by the
/// service itself and are never merge/remove targets for customer updates.
pub mod namespaces {
    /// Primary device/install identifier.
    pub const ECID: &str = "ECID";
    /// Legacy identifier migrated from the direct identity component.
    pub const ECID_LEGACY: &str = "ECID_LEGACY";
    /// Android advertising identifier.
    pub const GAID: &str = "GAID";
    /// iOS advertising identifier.
    pub const IDFA: &str = "IDFA";

    /// All reserved namespace keys, for filtering incoming customer maps.
    pub const RESERVED: [&str; 4] = [ECID, ECID_LEGACY, GAID, IDFA];
}

/// Keys of the published XDM-shaped snapshot.
pub mod xdm {
    pub const IDENTITY_MAP: &str = "identityMap";
    pub const ID: &str = "id";
    pub const AUTHENTICATED_STATE: &str = "authenticatedState";
    pub const PRIMARY: &str = "primary";
}

/// Keys and values of the outbound consent-change payload.
pub mod consent {
    pub const CONSENTS: &str = "consents";
    pub const AD_ID: &str = "adID";
    pub const VAL: &str = "val";
    pub const ID_TYPE: &str = "idType";
    pub const YES: &str = "y";
    pub const NO: &str = "n";
}

/// Component names as they appear in the hub's shared-state registry.
pub mod components {
    /// This subsystem.
    pub const IDENTITY_EDGE: &str = "hub.identity.edge";
    /// The legacy direct identity component we migrate from.
    pub const IDENTITY_DIRECT: &str = "hub.identity.direct";
    /// Key under which the direct component publishes its identifier.
    pub const IDENTITY_DIRECT_ECID_KEY: &str = "mid";
}

/// Persistence gateway key naming.
pub mod datastore {
    /// File name for this subsystem's persisted aggregate.
    pub const IDENTITY_PROPERTIES: &str = "identity.properties";
    /// File name of the direct identity component's own store.
    pub const IDENTITY_DIRECT_PROPERTIES: &str = "identity.direct.properties";
    /// Key of the persisted identifier inside the direct component's store.
    pub const IDENTITY_DIRECT_ECID_KEY: &str = "persisted.mid";
}
