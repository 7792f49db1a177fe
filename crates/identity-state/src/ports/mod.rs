//! Ports: gateway traits consumed by the identity service.

pub mod shared_state;
pub mod store;

pub use shared_state::{SharedStateLookup, SharedStateSource};
pub use store::IdentityStore;
