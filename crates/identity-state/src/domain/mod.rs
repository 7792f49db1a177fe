//! Domain layer: identity value types and the merge/remove algorithms.

pub mod authenticated_state;
pub mod constants;
pub mod ecid;
pub mod errors;
pub mod identity_item;
pub mod identity_map;
pub mod properties;

pub use authenticated_state::AuthenticatedState;
pub use ecid::Ecid;
pub use errors::IdentityError;
pub use identity_item::IdentityItem;
pub use identity_map::IdentityMap;
pub use properties::IdentityProperties;
