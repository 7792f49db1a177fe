use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Authentication state of an [`crate::domain::IdentityItem`].
///
/// Parsing is lossy: any unrecognized or absent input maps to
/// [`AuthenticatedState::Ambiguous`] rather than failing the operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthenticatedState {
    /// The state is ambiguous.
    #[default]
    Ambiguous,
    /// Identified by a login or similar action that was valid at the time of
    /// the event observation.
    Authenticated,
    /// Identified by a login action at some previous point in time, but not
    /// currently logged in.
    LoggedOut,
}

impl AuthenticatedState {
    /// Wire name used in snapshots and persisted state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ambiguous => "ambiguous",
            Self::Authenticated => "authenticated",
            Self::LoggedOut => "loggedOut",
        }
    }

    /// Case-insensitive, total parse. Unknown input yields `Ambiguous`.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        if state.eq_ignore_ascii_case(Self::Authenticated.as_str()) {
            Self::Authenticated
        } else if state.eq_ignore_ascii_case(Self::LoggedOut.as_str()) {
            Self::LoggedOut
        } else {
            Self::Ambiguous
        }
    }
}

impl std::fmt::Display for AuthenticatedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AuthenticatedState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuthenticatedState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
