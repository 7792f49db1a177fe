//! # Advertising Identifier Scenarios
//!
//! End-to-end transitions of the advertising identifier driven over the bus:
//! grant, update, revoke, and the all-zero sentinel, asserting exactly which
//! consent signals come out and what the published snapshot contains.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use uuid::Uuid;

    use hub_runtime::{HubConfig, HubContainer, IdentityHandler};
    use identity_state::adapters::InMemoryIdentityStore;
    use identity_state::domain::constants::{components, ZERO_ADVERTISING_ID};
    use identity_state::ports::IdentityStore;
    use shared_bus::{
        EventFilter, EventPublisher, EventTopic, HubEvent, StateLookup, Subscription,
    };

    use crate::util::flatten_map;

    const AD_ID: &str = "fa181743-2520-4ebc-b125-626baf1e3db8";
    const AD_ID_NEW: &str = "8d9ca5ff-7e74-44ac-bbcd-7aee7baf4f6c";

    // =============================================================================
    // TEST HARNESS
    // =============================================================================

    struct Harness {
        container: HubContainer,
        store: Arc<InMemoryIdentityStore>,
        hub_sub: Subscription,
        consent_sub: Subscription,
    }

    /// Spin up the handler against an in-memory store and wait for the boot
    /// snapshot so every test starts from a booted component.
    async fn booted_harness() -> Harness {
        let store = Arc::new(InMemoryIdentityStore::new());
        let container = HubContainer::with_store(
            HubConfig::default(),
            Box::new(Arc::clone(&store)),
        );

        let hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));
        let consent_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::EdgeConsent]));

        let handler = IdentityHandler::new(&container);
        tokio::spawn(handler.run());

        let mut harness = Harness {
            container,
            store,
            hub_sub,
            consent_sub,
        };
        harness.await_snapshot().await;
        harness
    }

    impl Harness {
        async fn set_ad_id(&self, ad_id: &str) -> Uuid {
            let request_id = Uuid::new_v4();
            self.container
                .bus
                .publish(HubEvent::AdvertisingIdentifierSet {
                    request_id,
                    ad_id: ad_id.to_string(),
                })
                .await;
            request_id
        }

        /// Block until the identity component publishes a snapshot version.
        async fn await_snapshot(&mut self) -> u64 {
            loop {
                let event = timeout(Duration::from_secs(1), self.hub_sub.recv())
                    .await
                    .expect("timeout waiting for snapshot")
                    .expect("bus closed");
                if let HubEvent::SharedStatePublished { owner, version } = event {
                    if owner == components::IDENTITY_EDGE {
                        return version;
                    }
                }
            }
        }

        /// Force a snapshot publication so earlier events are known to have
        /// been processed, then return.
        async fn drain(&mut self) {
            self.container
                .bus
                .publish(HubEvent::UpdateIdentities {
                    request_id: Uuid::new_v4(),
                    identifiers: serde_json::json!({"probe": [{"id": "p"}]}),
                })
                .await;
            self.await_snapshot().await;
        }

        fn consent_values(&mut self) -> Vec<String> {
            let mut values = Vec::new();
            while let Ok(Some(event)) = self.consent_sub.try_recv() {
                if let HubEvent::ConsentUpdateRequested { payload, .. } = event {
                    values.push(payload["consents"]["adID"]["val"].as_str().unwrap().into());
                }
            }
            values
        }

        fn latest_snapshot(&self) -> serde_json::Value {
            match self
                .container
                .registry
                .latest(components::IDENTITY_EDGE)
                .unwrap()
            {
                StateLookup::Published(record) => record.data,
                other => panic!("no published snapshot: {other:?}"),
            }
        }
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    /// No stored ad id, a valid one arrives: one consent-granted signal and
    /// the id lands in the advertising namespace.
    #[tokio::test]
    async fn test_install_time_grant() {
        let mut harness = booted_harness().await;

        harness.set_ad_id(AD_ID_NEW).await;
        harness.await_snapshot().await;

        let flat = flatten_map(&harness.latest_snapshot());
        assert_eq!(flat["identityMap.GAID[0].id"], AD_ID_NEW);
        assert_eq!(flat["identityMap.GAID[0].primary"], "false");
        assert_eq!(flat["identityMap.GAID[0].authenticatedState"], "ambiguous");

        assert_eq!(harness.consent_values(), vec!["y"]);

        // Persisted state carries the same identifier.
        let persisted = harness.store.load().unwrap().unwrap();
        assert_eq!(persisted.ad_id(), Some(AD_ID_NEW));
    }

    /// Valid to a different valid value: snapshot updates, zero consent
    /// signals.
    #[tokio::test]
    async fn test_valid_to_valid_update() {
        let mut harness = booted_harness().await;
        harness.set_ad_id(AD_ID).await;
        harness.await_snapshot().await;
        harness.consent_values(); // discard the grant

        harness.set_ad_id(AD_ID_NEW).await;
        harness.await_snapshot().await;

        let flat = flatten_map(&harness.latest_snapshot());
        assert_eq!(flat["identityMap.GAID[0].id"], AD_ID_NEW);
        assert!(harness.consent_values().is_empty());
    }

    /// Valid to empty string: one consent-denied signal and the advertising
    /// namespace disappears from snapshot and persistence.
    #[tokio::test]
    async fn test_revoke_with_empty_string() {
        let mut harness = booted_harness().await;
        harness.set_ad_id(AD_ID).await;
        harness.await_snapshot().await;
        harness.consent_values();

        harness.set_ad_id("").await;
        harness.await_snapshot().await;

        let flat = flatten_map(&harness.latest_snapshot());
        assert!(!flat.contains_key("identityMap.GAID[0].id"));
        assert_eq!(harness.consent_values(), vec!["n"]);

        let persisted = harness.store.load().unwrap().unwrap();
        assert_eq!(persisted.ad_id(), None);
    }

    /// Valid to the all-zero sentinel: identical outcome to the empty string.
    #[tokio::test]
    async fn test_revoke_with_zero_sentinel() {
        let mut harness = booted_harness().await;
        harness.set_ad_id(AD_ID).await;
        harness.await_snapshot().await;
        harness.consent_values();

        harness.set_ad_id(ZERO_ADVERTISING_ID).await;
        harness.await_snapshot().await;

        let flat = flatten_map(&harness.latest_snapshot());
        assert!(!flat.contains_key("identityMap.GAID[0].id"));
        assert_eq!(harness.consent_values(), vec!["n"]);
    }

    /// Sentinel with no stored ad id, twice: no consent signal either time,
    /// no snapshot publication, no extra persistence.
    #[tokio::test]
    async fn test_sentinel_twice_is_silent() {
        let mut harness = booted_harness().await;
        let saves_after_boot = harness.store.save_count();

        harness.set_ad_id(ZERO_ADVERTISING_ID).await;
        harness.set_ad_id(ZERO_ADVERTISING_ID).await;
        harness.drain().await;

        // Only the drain probe published; the sentinel writes never happened.
        assert!(harness.consent_values().is_empty());
        assert_eq!(harness.store.save_count(), saves_after_boot + 1);
    }

    /// Same valid value twice: second set is a complete no-op.
    #[tokio::test]
    async fn test_same_value_is_silent() {
        let mut harness = booted_harness().await;
        harness.set_ad_id(AD_ID).await;
        harness.await_snapshot().await;
        harness.consent_values();
        let saves = harness.store.save_count();

        harness.set_ad_id(AD_ID).await;
        harness.drain().await;

        assert!(harness.consent_values().is_empty());
        assert_eq!(harness.store.save_count(), saves + 1);
    }
}
