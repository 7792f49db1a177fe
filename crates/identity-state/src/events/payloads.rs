use crate::domain::constants::{consent, namespaces};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Polarity of an advertising-identifier consent transition.
///
/// Fires only when validity actually transitions: a valid ad ID replaced by a
/// different valid ad ID is not a consent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentChange {
    /// A valid ad ID appeared where none was stored.
    Granted,
    /// The stored ad ID became invalid (empty or the all-zero sentinel).
    Denied,
}

impl ConsentChange {
    /// Wire value for the consent payload (`"y"` / `"n"`).
    #[must_use]
    pub fn as_wire_value(&self) -> &'static str {
        match self {
            Self::Granted => consent::YES,
            Self::Denied => consent::NO,
        }
    }
}

/// Build the consent request payload dispatched on the event bus:
/// `{"consents": {"adID": {"val": "y"|"n", "idType": "GAID"}}}`.
#[must_use]
pub fn consent_request_data(change: ConsentChange) -> Value {
    serde_json::json!({
        consent::CONSENTS: {
            consent::AD_ID: {
                consent::VAL: change.as_wire_value(),
                consent::ID_TYPE: namespaces::GAID,
            }
        }
    })
}

/// Result of a bootstrap attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootOutcome {
    /// Boot already completed earlier; no I/O was performed.
    AlreadyBooted,
    /// Boot completed now; the snapshot must be published as this
    /// component's first shared state.
    Booted(Value),
    /// A dependency is not ready yet; nothing was mutated or persisted.
    /// The caller owns retry scheduling.
    Deferred,
}

/// Result of an advertising-identifier update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdIdOutcome {
    /// The normalized value matched the stored one: no mutation, no
    /// persistence write, no events.
    Unchanged,
    /// The value changed: the snapshot must be published, and a consent
    /// signal dispatched iff validity transitioned.
    Updated {
        snapshot: Value,
        consent: Option<ConsentChange>,
    },
}
