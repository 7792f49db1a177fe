//! # Hub Runtime
//!
//! The main entry point for the identity event hub.
//!
//! ## Choreography Flow
//!
//! ```text
//! Application ──identity request──→ Event Bus
//!                                       │
//!                                       ↓
//!                               IdentityHandler
//!                                       │
//!                          ┌────────────┴────────────┐
//!                          ↓                         ↓
//!                  IdentityService           consent / reset
//!                   (single writer)            signals on bus
//!                          │
//!                          ↓
//!                Shared-State Registry
//!              (versioned XDM snapshots)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (env overrides)
//! 2. Wire container: store, bus, registry, identity service
//! 3. Spawn the identity handler (attempts boot immediately)
//! 4. Run until Ctrl+C, then signal shutdown

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hub_runtime::{HubConfig, HubContainer, IdentityHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = HubConfig::from_env();

    info!("===========================================");
    info!("  Identity Hub Runtime v0.1.0");
    info!("  Data Dir: {:?}", config.data_dir);
    info!("===========================================");

    // Wire everything together
    let container = HubContainer::new(config)?;
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    let handler = IdentityHandler::new(&container);
    tokio::spawn(async move {
        tokio::select! {
            () = handler.run() => {}
            _ = shutdown_rx.changed() => {
                info!("Identity handler shutdown signal received");
            }
        }
    });

    info!("Hub is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    info!("Initiating graceful shutdown...");
    let _ = shutdown_tx.send(true);
    info!("Shutdown complete");

    Ok(())
}
