//! # Shared Bus - Event Hub for Inter-Component Communication
//!
//! All cross-component signals travel through the bus; components never call
//! each other directly. State sharing happens through the versioned
//! shared-state registry rather than direct reads.
//!
//! ## Choreography Pattern
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Component A  │                    │ Component B  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!         │              ▼                    ↑
//!         │        ┌──────────────┐          │
//!         │        │  Event Bus   │ ─────────┘
//!         │        └──────────────┘  subscribe()
//!         ▼
//!   ┌──────────────────────┐
//!   │ Shared-State Registry │   latest(owner) -> NotRegistered
//!   │  (versioned snapshots)│                  | Pending
//!   └──────────────────────┘                  | Published(record)
//! ```
//!
//! ## Invariants
//!
//! - Shared-state versions are monotonic per owner and never mutate.
//! - Lookups distinguish an unknown owner from one that registered but has
//!   not published yet.
//! - Payload data travels as `serde_json::Value`; the bus never interprets it.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod state;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, HubEvent, APPLICATION_SOURCE};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use state::{
    ComponentRecord, RegistryError, SharedStateRegistry, StateLookup, StateRecord,
};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
