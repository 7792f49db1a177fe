//! Outbound effect types and consent payload construction.

pub mod payloads;

pub use payloads::{consent_request_data, AdIdOutcome, BootOutcome, ConsentChange};
