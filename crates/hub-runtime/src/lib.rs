//! # Hub Runtime Library
//!
//! This library exposes the internal modules of the hub runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **EDA (Event-Driven Architecture)**: Components communicate via the bus only
//! - **Hexagonal Architecture**: The identity component sees the hub through
//!   its ports; adapters here implement them
//! - **Single Writer**: All identity mutations are serialized behind one lock

pub mod adapters;
pub mod container;
pub mod handlers;

pub use adapters::RegistrySharedStateSource;
pub use container::{HubConfig, HubContainer};
pub use handlers::IdentityHandler;
