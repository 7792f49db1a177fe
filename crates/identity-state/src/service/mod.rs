//! The identity state machine.
//!
//! All mutating operations are `&mut self` and must be serialized by the
//! host (single writer). Each operation stages its mutation on a copy of the
//! aggregate and commits only after the persistence write succeeds, so a
//! failed save never leaves a partially-mutated in-memory state.

mod ad_id;
mod boot;
mod core;
mod identifiers;


pub use core::IdentityService;
