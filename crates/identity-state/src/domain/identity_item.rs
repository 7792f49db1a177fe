use super::AuthenticatedState;
use serde::{Deserialize, Serialize};

/// One identifier entry inside an [`crate::domain::IdentityMap`] namespace.
///
/// Two items are "the same identity" iff their `id` strings are equal within
/// the same namespace. `authenticated_state` and `primary` are payload fields
/// that a merge may update in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityItem {
    /// Raw identifier value. Required, non-empty.
    pub id: String,
    /// Authentication state. Absent input defaults to `ambiguous`.
    #[serde(rename = "authenticatedState", default)]
    pub authenticated_state: AuthenticatedState,
    /// Primary flag. Absent input defaults to false.
    #[serde(default)]
    pub primary: bool,
}

impl IdentityItem {
    /// Create an item with default (`ambiguous`, non-primary) payload fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            authenticated_state: AuthenticatedState::Ambiguous,
            primary: false,
        }
    }

    /// Builder method to set the authentication state.
    #[must_use]
    pub fn with_state(mut self, state: AuthenticatedState) -> Self {
        self.authenticated_state = state;
        self
    }

    /// Builder method to set the primary flag.
    #[must_use]
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }
}
