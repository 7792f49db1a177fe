use super::core::IdentityService;
use crate::domain::{Ecid, IdentityError, IdentityMap, IdentityProperties};
use serde_json::Value;
use tracing::debug;

impl IdentityService {
    /// Discard the entire aggregate, generate a fresh primary ECID, clear the
    /// secondary and advertising identifiers and the customer map, then
    /// persist. The only path that replaces the primary identifier after
    /// boot.
    ///
    /// Returns the new snapshot to publish.
    pub fn reset_identifiers(&mut self) -> Result<Value, IdentityError> {
        let mut properties = IdentityProperties::new();
        properties.set_ecid(Some(Ecid::generate()));
        properties.set_ecid_secondary(None);

        self.store.save(&properties)?;
        self.properties = properties;
        debug!("Identities cleared and new ECID generated");

        Ok(self.properties.to_xdm_map())
    }

    /// Merge customer identifiers into the aggregate, then persist
    /// unconditionally (write-after-call semantics even when nothing
    /// changed). Reserved namespaces in the incoming map are ignored.
    ///
    /// Returns the snapshot to publish.
    pub fn update_customer_identifiers(
        &mut self,
        incoming: &IdentityMap,
    ) -> Result<Value, IdentityError> {
        let mut staged = self.properties.clone();
        staged.update_customer_identifiers(incoming);

        self.store.save(&staged)?;
        self.properties = staged;

        Ok(self.properties.to_xdm_map())
    }

    /// Remove customer identifiers named in the incoming map, then persist
    /// unconditionally. Reserved namespaces are exempt.
    ///
    /// Returns the snapshot to publish.
    pub fn remove_customer_identifiers(
        &mut self,
        incoming: &IdentityMap,
    ) -> Result<Value, IdentityError> {
        let mut staged = self.properties.clone();
        staged.remove_customer_identifiers(incoming);

        self.store.save(&staged)?;
        self.properties = staged;

        Ok(self.properties.to_xdm_map())
    }

    /// Reconcile the secondary (legacy) identifier with the direct identity
    /// component's current value, without ever touching the primary.
    ///
    /// No-op when `legacy` equals the current primary or secondary, or when
    /// both `legacy` and the current secondary are absent. Otherwise the
    /// secondary is set (possibly cleared) and persisted.
    ///
    /// Returns the snapshot to publish when a change occurred.
    pub fn update_legacy_ecid(
        &mut self,
        legacy: Option<Ecid>,
    ) -> Result<Option<Value>, IdentityError> {
        let primary = self.properties.ecid();
        let secondary = self.properties.ecid_secondary();

        if let Some(incoming) = &legacy {
            if Some(incoming) == primary || Some(incoming) == secondary {
                return Ok(None);
            }
        }

        // No need to clear an already-absent secondary.
        if legacy.is_none() && secondary.is_none() {
            return Ok(None);
        }

        let mut staged = self.properties.clone();
        staged.set_ecid_secondary(legacy.clone());

        self.store.save(&staged)?;
        self.properties = staged;
        debug!(legacy = ?legacy.as_ref().map(Ecid::as_str), "Secondary ECID reconciled");

        Ok(Some(self.properties.to_xdm_map()))
    }
}
