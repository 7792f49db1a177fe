//! # Integration Tests
//!
//! Cross-crate flows: the identity service, the event bus, the shared-state
//! registry, and the runtime handler working together.

pub mod ad_id_scenarios;
pub mod bootstrap;
