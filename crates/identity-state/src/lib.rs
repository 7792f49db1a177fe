//! # identity-state
//!
//! Identity State subsystem for Identity-Hub.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: Authoritative device-local identity aggregate
//!   (primary ECID, migrated legacy ECID, advertising identifier, customer
//!   identifier map)
//! - **Choreography Participant**: Consumes identity update/remove/reset and
//!   ad ID events routed by the hub runtime, publishes versioned shared-state
//!   snapshots and consent signals
//! - **Bootstrap Owner**: Runs the one-time boot protocol that sources the
//!   primary ECID (persisted value, legacy migration, or fresh generation)
//!
//! ## Choreography Flow
//!
//! ```text
//! [Generic Identity events] ──→ [Event Bus] ──→ [Hub Runtime handler]
//!                                                      │
//!                                                      ↓
//!                                             [IdentityService]
//!                                                │         │
//!                                     persistence│         │effects
//!                                                ↓         ↓
//!                                      [IdentityStore]  snapshot + consent
//!                                                          │
//!                                          [SharedStateRegistry / Event Bus]
//! ```
//!
//! ## Concurrency
//!
//! The service is single-writer: all mutating operations take `&mut self` and
//! the host serializes them behind one lock for the full
//! read-modify-persist-publish cycle.

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use events::*;
pub use ports::*;
pub use service::*;
