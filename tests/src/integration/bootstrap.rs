//! # Bootstrap Flows
//!
//! Boot priority (persisted, migrated, peer-adopted, generated), the deferred
//! boot retried on the direct component's publication, and the file store
//! surviving a process restart.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use uuid::Uuid;

    use hub_runtime::{HubConfig, HubContainer, IdentityHandler};
    use identity_state::adapters::{FileIdentityStore, InMemoryIdentityStore};
    use identity_state::domain::constants::components;
    use identity_state::domain::{Ecid, IdentityProperties};
    use identity_state::ports::IdentityStore;
    use shared_bus::{EventFilter, EventPublisher, EventTopic, HubEvent, StateLookup};

    use crate::util::flatten_map;

    fn container_with(store: Box<dyn IdentityStore>) -> HubContainer {
        HubContainer::with_store(HubConfig::default(), store)
    }

    async fn await_edge_snapshot(sub: &mut shared_bus::Subscription) -> u64 {
        loop {
            let event = timeout(Duration::from_secs(1), sub.recv())
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

    fn edge_snapshot(container: &HubContainer) -> serde_json::Value {
        match container
            .registry
            .latest(components::IDENTITY_EDGE)
            .unwrap()
        {
            StateLookup::Published(record) => record.data,
            other => panic!("no published snapshot: {other:?}"),
        }
    }

    // =============================================================================
    // BOOT PRIORITY
    // =============================================================================

    #[tokio::test]
    async fn test_boot_prefers_persisted_identifier() {
        let mut seed = IdentityProperties::new();
        seed.set_ecid(Some(Ecid::from_string("persistedECID")));
        let container = container_with(Box::new(InMemoryIdentityStore::with_properties(seed)));
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));

        tokio::spawn(IdentityHandler::new(&container).run());
        await_edge_snapshot(&mut hub_sub).await;

        let flat = flatten_map(&edge_snapshot(&container));
        assert_eq!(flat["identityMap.ECID[0].id"], "persistedECID");
    }

    #[tokio::test]
    async fn test_boot_migrates_legacy_identifier() {
        let store = Arc::new(InMemoryIdentityStore::new());
        store.set_legacy_ecid(Some(Ecid::from_string("legacyECID")));
        let container = container_with(Box::new(Arc::clone(&store)));
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));

        tokio::spawn(IdentityHandler::new(&container).run());
        await_edge_snapshot(&mut hub_sub).await;

        let flat = flatten_map(&edge_snapshot(&container));
        assert_eq!(flat["identityMap.ECID[0].id"], "legacyECID");

        // The adopted identifier was written back.
        assert_eq!(
            store.load().unwrap().unwrap().ecid().unwrap().as_str(),
            "legacyECID"
        );
    }

    #[tokio::test]
    async fn test_boot_announces_on_bus() {
        let container = container_with(Box::new(InMemoryIdentityStore::new()));
        let mut identity_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::EdgeIdentity]));

        tokio::spawn(IdentityHandler::new(&container).run());

        let event = timeout(Duration::from_secs(1), identity_sub.recv())
            .await
            .expect("timeout")
            .expect("bus closed");
        match event {
            HubEvent::IdentityBooted { snapshot } => {
                let flat = flatten_map(&snapshot);
                assert!(flat.contains_key("identityMap.ECID[0].id"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    // =============================================================================
    // DEFERRED BOOT
    // =============================================================================

    /// With the direct identity component registered but silent, boot waits;
    /// its first publication triggers the retry and its identifier is
    /// adopted.
    #[tokio::test]
    async fn test_deferred_boot_adopts_direct_identifier() {
        let container = container_with(Box::new(InMemoryIdentityStore::new()));
        container
            .registry
            .register(components::IDENTITY_DIRECT)
            .unwrap();
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));

        tokio::spawn(IdentityHandler::new(&container).run());

        // Give the deferred boot a moment; no snapshot should appear.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            container.registry.latest(components::IDENTITY_EDGE).unwrap(),
            StateLookup::Pending
        );

        // The direct component publishes; the handler retries boot.
        container
            .registry
            .publish(
                components::IDENTITY_DIRECT,
                serde_json::json!({"mid": "directECID"}),
                None,
            )
            .await
            .unwrap();

        await_edge_snapshot(&mut hub_sub).await;
        let flat = flatten_map(&edge_snapshot(&container));
        assert_eq!(flat["identityMap.ECID[0].id"], "directECID");
    }

    /// A direct publication without an identifier reads as opt-out; boot
    /// proceeds with a generated identifier.
    #[tokio::test]
    async fn test_deferred_boot_generates_on_opted_out_direct() {
        let container = container_with(Box::new(InMemoryIdentityStore::new()));
        container
            .registry
            .register(components::IDENTITY_DIRECT)
            .unwrap();
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));

        tokio::spawn(IdentityHandler::new(&container).run());

        container
            .registry
            .publish(components::IDENTITY_DIRECT, serde_json::json!({}), None)
            .await
            .unwrap();

        await_edge_snapshot(&mut hub_sub).await;
        let flat = flatten_map(&edge_snapshot(&container));
        let generated = &flat["identityMap.ECID[0].id"];
        assert_eq!(generated.len(), 38);
        assert!(generated.chars().all(|c| c.is_ascii_digit()));
    }

    /// Once booted, later direct publications reconcile the secondary
    /// identifier instead of re-booting.
    #[tokio::test]
    async fn test_direct_publication_after_boot_sets_secondary() {
        let container = container_with(Box::new(InMemoryIdentityStore::new()));
        container
            .registry
            .register(components::IDENTITY_DIRECT)
            .unwrap();
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));

        tokio::spawn(IdentityHandler::new(&container).run());

        container
            .registry
            .publish(
                components::IDENTITY_DIRECT,
                serde_json::json!({"mid": "directECID"}),
                None,
            )
            .await
            .unwrap();
        await_edge_snapshot(&mut hub_sub).await;

        // Direct component resets to a different identifier.
        container
            .registry
            .publish(
                components::IDENTITY_DIRECT,
                serde_json::json!({"mid": "rotatedECID"}),
                None,
            )
            .await
            .unwrap();
        await_edge_snapshot(&mut hub_sub).await;

        let flat = flatten_map(&edge_snapshot(&container));
        assert_eq!(flat["identityMap.ECID[0].id"], "directECID");
        assert_eq!(flat["identityMap.ECID_LEGACY[0].id"], "rotatedECID");
    }

    // =============================================================================
    // PERSISTENCE ACROSS RESTART
    // =============================================================================

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let first_ecid = {
            let store = FileIdentityStore::new(dir.path()).unwrap();
            let container = container_with(Box::new(store));
            let mut hub_sub = container
                .bus
                .subscribe(EventFilter::topics(vec![EventTopic::Hub]));
            tokio::spawn(IdentityHandler::new(&container).run());
            await_edge_snapshot(&mut hub_sub).await;

            flatten_map(&edge_snapshot(&container))["identityMap.ECID[0].id"].clone()
        };

        // Second container over the same directory boots with the same id.
        let store = FileIdentityStore::new(dir.path()).unwrap();
        let container = container_with(Box::new(store));
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));
        tokio::spawn(IdentityHandler::new(&container).run());
        await_edge_snapshot(&mut hub_sub).await;

        let flat = flatten_map(&edge_snapshot(&container));
        assert_eq!(flat["identityMap.ECID[0].id"], first_ecid);
    }

    // =============================================================================
    // RESET OVER THE BUS
    // =============================================================================

    #[tokio::test]
    async fn test_reset_rotates_identifier_and_completes() {
        let container = container_with(Box::new(InMemoryIdentityStore::new()));
        let mut hub_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Hub]));
        let mut identity_sub = container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::EdgeIdentity]));

        tokio::spawn(IdentityHandler::new(&container).run());
        await_edge_snapshot(&mut hub_sub).await;
        let before = flatten_map(&edge_snapshot(&container))["identityMap.ECID[0].id"].clone();

        let request_id = Uuid::new_v4();
        container
            .bus
            .publish(HubEvent::RequestReset { request_id })
            .await;
        await_edge_snapshot(&mut hub_sub).await;

        let after = flatten_map(&edge_snapshot(&container))["identityMap.ECID[0].id"].clone();
        assert_ne!(before, after);

        loop {
            let event = timeout(Duration::from_secs(1), identity_sub.recv())
                .await
                .expect("timeout")
                .expect("bus closed");
            if let HubEvent::ResetComplete { request_id: id } = event {
                assert_eq!(id, request_id);
                break;
            }
        }
    }
}
