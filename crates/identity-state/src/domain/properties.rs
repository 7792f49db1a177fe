//! The aggregate identity state and its publishable snapshot form.
//!
//! The persisted form and the published shared-state snapshot are the same
//! JSON shape: `{"identityMap": {"<NS>": [{"id": ..}, ..], ..}}` with the
//! reserved namespaces split back out on load.

use super::constants::{namespaces, xdm, ZERO_ADVERTISING_ID};
use super::{AuthenticatedState, Ecid, IdentityItem, IdentityMap};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A valid advertising identifier is non-empty and not the all-zero sentinel.
#[must_use]
pub fn is_valid_ad_id(ad_id: &str) -> bool {
    !ad_id.is_empty() && ad_id != ZERO_ADVERTISING_ID
}

/// The aggregate state owned by the identity service.
///
/// Created empty at process start, populated once by bootstrap, mutated only
/// through the service operations, replaced wholesale only by reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityProperties {
    ecid: Option<Ecid>,
    ecid_secondary: Option<Ecid>,
    ad_id: Option<String>,
    customer: IdentityMap,
}

impl IdentityProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary identifier, present after successful bootstrap.
    #[must_use]
    pub fn ecid(&self) -> Option<&Ecid> {
        self.ecid.as_ref()
    }

    pub fn set_ecid(&mut self, ecid: Option<Ecid>) {
        self.ecid = ecid;
    }

    /// Legacy identifier migrated from the direct identity component.
    #[must_use]
    pub fn ecid_secondary(&self) -> Option<&Ecid> {
        self.ecid_secondary.as_ref()
    }

    pub fn set_ecid_secondary(&mut self, ecid: Option<Ecid>) {
        self.ecid_secondary = ecid;
    }

    /// Stored advertising identifier. Always a valid (non-empty, non-zero)
    /// value when present.
    #[must_use]
    pub fn ad_id(&self) -> Option<&str> {
        self.ad_id.as_deref()
    }

    /// Store a new advertising identifier. Invalid values (empty string or
    /// the all-zero sentinel) clear the stored identifier.
    pub fn set_ad_id(&mut self, ad_id: &str) {
        self.ad_id = is_valid_ad_id(ad_id).then(|| ad_id.to_string());
    }

    /// Customer-supplied identifiers, excluding all reserved namespaces.
    #[must_use]
    pub fn customer_identifiers(&self) -> &IdentityMap {
        &self.customer
    }

    /// Merge customer identifiers. Incoming entries under reserved namespaces
    /// are ignored. Returns whether any field changed.
    pub fn update_customer_identifiers(&mut self, incoming: &IdentityMap) -> bool {
        let mut filtered = incoming.clone();
        filtered.retain_without_namespaces(&namespaces::RESERVED);
        self.customer.merge(&filtered)
    }

    /// Remove customer identifiers. Reserved namespaces are exempt from
    /// removal through this path.
    pub fn remove_customer_identifiers(&mut self, incoming: &IdentityMap) {
        let mut filtered = incoming.clone();
        filtered.retain_without_namespaces(&namespaces::RESERVED);
        self.customer.remove_items(&filtered);
    }

    /// The complete identity map: reserved namespaces plus customer entries.
    ///
    /// The ECID item is always non-primary with `ambiguous` state; the
    /// advertising namespace is present only while a valid ad ID is stored.
    #[must_use]
    pub fn full_identity_map(&self) -> IdentityMap {
        let mut map = self.customer.clone();
        if let Some(ecid) = &self.ecid {
            map.clear_namespace(namespaces::ECID);
            map.add_item(
                namespaces::ECID,
                IdentityItem::new(ecid.as_str()).with_state(AuthenticatedState::Ambiguous),
            );
        }
        if let Some(secondary) = &self.ecid_secondary {
            map.clear_namespace(namespaces::ECID_LEGACY);
            map.add_item(
                namespaces::ECID_LEGACY,
                IdentityItem::new(secondary.as_str()).with_state(AuthenticatedState::Ambiguous),
            );
        }
        if let Some(ad_id) = &self.ad_id {
            map.clear_namespace(namespaces::GAID);
            map.add_item(
                namespaces::GAID,
                IdentityItem::new(ad_id.as_str()).with_state(AuthenticatedState::Ambiguous),
            );
        }
        map
    }

    /// The publishable shared-state snapshot, `{"identityMap": {..}}`.
    #[must_use]
    pub fn to_xdm_map(&self) -> serde_json::Value {
        serde_json::json!({ xdm::IDENTITY_MAP: self.full_identity_map() })
    }

    /// Rebuild the aggregate from the snapshot-shaped identity map, splitting
    /// the reserved namespaces back into their dedicated fields.
    #[must_use]
    pub fn from_full_identity_map(map: IdentityMap) -> Self {
        let mut map = map;
        let first_id = |map: &IdentityMap, namespace: &str| {
            map.items_for(namespace)
                .and_then(|items| items.first())
                .map(|item| item.id.clone())
        };

        let ecid = first_id(&map, namespaces::ECID).map(Ecid::from_string);
        let ecid_secondary = first_id(&map, namespaces::ECID_LEGACY).map(Ecid::from_string);
        let ad_id = first_id(&map, namespaces::GAID).filter(|id| is_valid_ad_id(id));

        for reserved in namespaces::RESERVED {
            map.clear_namespace(reserved);
        }

        Self {
            ecid,
            ecid_secondary,
            ad_id,
            customer: map,
        }
    }
}

impl Serialize for IdentityProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(1))?;
        state.serialize_entry(xdm::IDENTITY_MAP, &self.full_identity_map())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for IdentityProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct PersistedForm {
            #[serde(rename = "identityMap", default)]
            identity_map: IdentityMap,
        }

        let form = PersistedForm::deserialize(deserializer)?;
        Ok(Self::from_full_identity_map(form.identity_map))
    }
}
