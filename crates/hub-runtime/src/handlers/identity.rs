//! # Identity Handler
//!
//! The event loop for the identity component.
//!
//! ## Flow
//!
//! 1. Application publishes an identity request (update/remove/reset/ad-id)
//! 2. Handler routes it into the service behind the single writer lock
//! 3. Resulting snapshot is published to the shared-state registry, tagged
//!    with the id of the event that caused it
//! 4. Side signals (reset completion, consent changes) go back on the bus
//!
//! Boot is attempted once at startup and again whenever the direct identity
//! component publishes shared state. Once booted, the same publication signal
//! drives secondary identifier reconciliation instead.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use identity_state::domain::constants::components;
use identity_state::domain::{Ecid, IdentityMap};
use identity_state::events::{consent_request_data, AdIdOutcome, BootOutcome};
use identity_state::service::IdentityService;
use shared_bus::{
    EventFilter, EventPublisher, EventTopic, HubEvent, InMemoryEventBus, SharedStateRegistry,
    StateLookup, Subscription,
};

use crate::adapters::RegistrySharedStateSource;
use crate::container::HubContainer;

/// Handler driving the identity component from bus events.
pub struct IdentityHandler {
    identity: Arc<Mutex<IdentityService>>,
    registry: Arc<SharedStateRegistry>,
    bus: Arc<InMemoryEventBus>,
    subscription: Subscription,
}

impl IdentityHandler {
    /// Create a handler wired to the container's infrastructure.
    #[must_use]
    pub fn new(container: &HubContainer) -> Self {
        let subscription = container.bus.subscribe(EventFilter::topics(vec![
            EventTopic::GenericIdentity,
            EventTopic::Hub,
        ]));
        Self {
            identity: Arc::clone(&container.identity),
            registry: Arc::clone(&container.registry),
            bus: Arc::clone(&container.bus),
            subscription,
        }
    }

    /// Run the handler loop until the bus closes.
    pub async fn run(mut self) {
        info!("Identity handler started");

        self.try_boot().await;

        while let Some(event) = self.subscription.recv().await {
            match event {
                HubEvent::UpdateIdentities {
                    request_id,
                    identifiers,
                } => self.handle_update(request_id, identifiers).await,
                HubEvent::RemoveIdentities {
                    request_id,
                    identifiers,
                } => self.handle_remove(request_id, identifiers).await,
                HubEvent::RequestReset { request_id } => self.handle_reset(request_id).await,
                HubEvent::AdvertisingIdentifierSet { request_id, ad_id } => {
                    self.handle_ad_id(request_id, &ad_id).await;
                }
                HubEvent::SharedStatePublished { owner, .. }
                    if owner == components::IDENTITY_DIRECT =>
                {
                    self.handle_direct_state_change().await;
                }
                _ => {}
            }
        }

        info!("Identity handler stopped, bus closed");
    }

    /// Attempt boot; publishes the first snapshot on success.
    async fn try_boot(&self) {
        let outcome = {
            let shared = RegistrySharedStateSource::new(Arc::clone(&self.registry));
            let mut identity = self.identity.lock();
            identity.bootup_if_ready(&shared)
        };

        match outcome {
            Ok(BootOutcome::Booted(snapshot)) => {
                self.publish_snapshot(snapshot.clone(), None).await;
                self.bus.publish(HubEvent::IdentityBooted { snapshot }).await;
            }
            Ok(BootOutcome::Deferred) => {
                debug!("Boot deferred, waiting for direct identity state");
            }
            Ok(BootOutcome::AlreadyBooted) => {}
            Err(e) => error!(error = %e, "Boot failed"),
        }
    }

    async fn handle_update(&self, request_id: Uuid, identifiers: Value) {
        let Some(map) = parse_identity_map(identifiers) else {
            warn!(%request_id, "Malformed identity map in update request");
            return;
        };

        let result = self.identity.lock().update_customer_identifiers(&map);
        match result {
            Ok(snapshot) => self.publish_snapshot(snapshot, Some(request_id)).await,
            Err(e) => error!(%request_id, error = %e, "Identity update failed"),
        }
    }

    async fn handle_remove(&self, request_id: Uuid, identifiers: Value) {
        let Some(map) = parse_identity_map(identifiers) else {
            warn!(%request_id, "Malformed identity map in remove request");
            return;
        };

        let result = self.identity.lock().remove_customer_identifiers(&map);
        match result {
            Ok(snapshot) => self.publish_snapshot(snapshot, Some(request_id)).await,
            Err(e) => error!(%request_id, error = %e, "Identity removal failed"),
        }
    }

    async fn handle_reset(&self, request_id: Uuid) {
        let result = self.identity.lock().reset_identifiers();
        match result {
            Ok(snapshot) => {
                self.publish_snapshot(snapshot, Some(request_id)).await;
                self.bus
                    .publish(HubEvent::ResetComplete { request_id })
                    .await;
            }
            Err(e) => error!(%request_id, error = %e, "Identity reset failed"),
        }
    }

    async fn handle_ad_id(&self, request_id: Uuid, ad_id: &str) {
        let result = self.identity.lock().update_advertising_identifier(ad_id);
        match result {
            Ok(AdIdOutcome::Updated { snapshot, consent }) => {
                self.publish_snapshot(snapshot, Some(request_id)).await;
                if let Some(change) = consent {
                    self.bus
                        .publish(HubEvent::ConsentUpdateRequested {
                            request_id,
                            payload: consent_request_data(change),
                        })
                        .await;
                }
            }
            Ok(AdIdOutcome::Unchanged) => {
                debug!(%request_id, "Advertising identifier unchanged");
            }
            Err(e) => error!(%request_id, error = %e, "Advertising identifier update failed"),
        }
    }

    /// React to the direct identity component publishing state: retry a
    /// deferred boot, or reconcile the secondary identifier once booted.
    async fn handle_direct_state_change(&self) {
        let booted = self.identity.lock().has_booted();
        if !booted {
            self.try_boot().await;
            return;
        }

        let legacy = match self.registry.latest(components::IDENTITY_DIRECT) {
            Ok(StateLookup::Published(record)) => record
                .data
                .get(components::IDENTITY_DIRECT_ECID_KEY)
                .and_then(Value::as_str)
                .map(Ecid::from_string),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Direct identity state unavailable");
                return;
            }
        };

        let result = self.identity.lock().update_legacy_ecid(legacy);
        match result {
            Ok(Some(snapshot)) => self.publish_snapshot(snapshot, None).await,
            Ok(None) => {}
            Err(e) => error!(error = %e, "Secondary identifier reconciliation failed"),
        }
    }

    async fn publish_snapshot(&self, snapshot: Value, cause: Option<Uuid>) {
        if let Err(e) = self
            .registry
            .publish(components::IDENTITY_EDGE, snapshot, cause)
            .await
        {
            error!(error = %e, "Snapshot publication failed");
        }
    }
}

/// Accept an identity map either bare or nested under `identityMap`.
fn parse_identity_map(mut value: Value) -> Option<IdentityMap> {
    if let Some(inner) = value.get_mut("identityMap") {
        value = inner.take();
    }
    serde_json::from_value(value).ok()
}
