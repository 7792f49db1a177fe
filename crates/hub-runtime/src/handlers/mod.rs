//! # Event Handlers
//!
//! Async tasks routing bus events into component operations.

mod identity;

pub use identity::IdentityHandler;
