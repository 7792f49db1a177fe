//! # Hub Container
//!
//! Configuration and wiring for the hub runtime. The container owns the
//! shared infrastructure (bus, registry) and the identity component behind a
//! single writer lock.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::info;

use identity_state::adapters::FileIdentityStore;
use identity_state::domain::constants::components;
use identity_state::ports::IdentityStore;
use identity_state::service::IdentityService;
use shared_bus::{InMemoryEventBus, SharedStateRegistry, DEFAULT_CHANNEL_CAPACITY};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Data directory for persisted identity state.
    pub data_dir: PathBuf,
    /// Event bus channel capacity.
    pub channel_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl HubConfig {
    /// Load configuration with environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("HUB_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(capacity) = std::env::var("HUB_CHANNEL_CAPACITY") {
            if let Ok(c) = capacity.parse() {
                config.channel_capacity = c;
            }
        }

        config
    }
}

/// Container holding all wired components.
///
/// The identity service sits behind a `Mutex` so all mutating operations are
/// serialized; readers go through the shared-state registry instead.
pub struct HubContainer {
    /// Runtime configuration.
    pub config: HubConfig,
    /// The event bus.
    pub bus: Arc<InMemoryEventBus>,
    /// Versioned shared-state registry.
    pub registry: Arc<SharedStateRegistry>,
    /// The identity component, single-writer.
    pub identity: Arc<Mutex<IdentityService>>,
}

impl HubContainer {
    /// Create a container using the file-backed identity store.
    pub fn new(config: HubConfig) -> Result<Self> {
        let store = FileIdentityStore::new(&config.data_dir)
            .context("Failed to open identity data directory")?;
        Ok(Self::with_store(config, Box::new(store)))
    }

    /// Create a container with an explicit store implementation.
    #[must_use]
    pub fn with_store(config: HubConfig, store: Box<dyn IdentityStore>) -> Self {
        let bus = Arc::new(InMemoryEventBus::with_capacity(config.channel_capacity));
        let registry = Arc::new(SharedStateRegistry::new());
        registry.attach_bus(Arc::clone(&bus));

        // Registration failures only happen on lock poisoning, which cannot
        // occur before any other thread touches the registry.
        let _ = registry.register(components::IDENTITY_EDGE);

        let identity = Arc::new(Mutex::new(IdentityService::new(store)));

        info!(data_dir = ?config.data_dir, "Hub container wired");

        Self {
            config,
            bus,
            registry,
            identity,
        }
    }
}
