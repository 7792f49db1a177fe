//! Adapters: persistence gateway implementations.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileIdentityStore;
pub use memory_store::InMemoryIdentityStore;
