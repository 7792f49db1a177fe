use super::core::IdentityService;
use crate::domain::constants::components;
use crate::domain::{Ecid, IdentityError};
use crate::events::BootOutcome;
use crate::ports::{SharedStateLookup, SharedStateSource};
use serde_json::Value;
use tracing::{debug, info};

impl IdentityService {
    /// Run the one-time bootstrap protocol.
    ///
    /// Sourcing priority for the primary ECID when none is persisted:
    ///
    /// 1. The direct identity component's own persisted identifier
    ///    (cross-component migration read).
    /// 2. If that component is not registered with the hub, generate a fresh
    ///    ECID (the common first-launch path).
    /// 3. If it is registered but has published nothing yet, return
    ///    [`BootOutcome::Deferred`] without mutating or persisting anything;
    ///    the caller retries when that component publishes.
    /// 4. If it has published, adopt its identifier; a published state
    ///    carrying no identifier (opt-out) yields a fresh ECID.
    ///
    /// Persists only when a primary was newly sourced. Terminal: once booted,
    /// further calls return [`BootOutcome::AlreadyBooted`] with no I/O.
    pub fn bootup_if_ready(
        &mut self,
        shared: &dyn SharedStateSource,
    ) -> Result<BootOutcome, IdentityError> {
        if self.has_booted {
            return Ok(BootOutcome::AlreadyBooted);
        }

        let mut properties = self.store.load()?.unwrap_or_default();

        if properties.ecid().is_none() {
            if let Some(legacy) = self.store.load_legacy_ecid()? {
                debug!(ecid = %legacy, "Migrating persisted ECID from direct identity store");
                properties.set_ecid(Some(legacy));
            } else {
                match shared.component_state(components::IDENTITY_DIRECT) {
                    SharedStateLookup::NotRegistered => {
                        let ecid = Ecid::generate();
                        debug!(%ecid, "Generating new ECID on bootup");
                        properties.set_ecid(Some(ecid));
                    }
                    SharedStateLookup::Pending => {
                        debug!(
                            "Direct identity component is registered, waiting for its state change"
                        );
                        return Ok(BootOutcome::Deferred);
                    }
                    SharedStateLookup::Published(state) => {
                        properties.set_ecid(Some(ecid_from_direct_state(&state)));
                    }
                }
            }

            self.store.save(&properties)?;
        }

        self.properties = properties;
        self.has_booted = true;
        info!("Identity state successfully booted up");

        Ok(BootOutcome::Booted(self.properties.to_xdm_map()))
    }
}

/// Extract the identifier from the direct identity component's published
/// state. A missing key, empty value, or unexpected shape all mean "no
/// usable identifier" (the opt-out scenario) and yield a fresh ECID.
fn ecid_from_direct_state(state: &Value) -> Ecid {
    let migrated = state
        .get(components::IDENTITY_DIRECT_ECID_KEY)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(Ecid::from_string);

    match migrated {
        Some(ecid) => {
            debug!(%ecid, "Direct identity ECID migrated from its shared state");
            ecid
        }
        None => {
            let ecid = Ecid::generate();
            debug!(%ecid, "Direct identity state has no ECID, generating new one");
            ecid
        }
    }
}
