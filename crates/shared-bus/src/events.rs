//! # Hub Events
//!
//! Defines all event types that flow through the shared bus.
//! Payload data travels as `serde_json::Value` so the bus stays agnostic of
//! the components exchanging it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Source name used for events originating from the host application rather
/// than a registered component.
pub const APPLICATION_SOURCE: &str = "application";

/// All events that can be published to the event bus.
///
/// Request-shaped variants carry a `request_id` so responses and shared-state
/// publications can be correlated with the event that caused them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HubEvent {
    // =========================================================================
    // INBOUND IDENTITY REQUESTS (application -> identity component)
    // =========================================================================
    /// Merge customer identifiers into the identity aggregate.
    UpdateIdentities {
        request_id: Uuid,
        /// Identity map payload, `{namespace: [{id, ...}]}`.
        identifiers: Value,
    },

    /// Remove customer identifiers from the identity aggregate.
    RemoveIdentities {
        request_id: Uuid,
        identifiers: Value,
    },

    /// Discard all identifiers and regenerate the primary one.
    RequestReset { request_id: Uuid },

    /// The application set (or cleared) the advertising identifier.
    AdvertisingIdentifierSet {
        request_id: Uuid,
        /// Raw value as given; normalization happens in the component.
        ad_id: String,
    },

    // =========================================================================
    // OUTBOUND IDENTITY NOTIFICATIONS
    // =========================================================================
    /// A reset finished and a fresh primary identifier is in place.
    ResetComplete { request_id: Uuid },

    /// Consent preference change derived from an advertising identifier
    /// transition. Payload shape: `{"consents": {"adID": {"val", "idType"}}}`.
    ConsentUpdateRequested {
        request_id: Uuid,
        payload: Value,
    },

    /// The identity component finished booting and published its first
    /// snapshot.
    IdentityBooted { snapshot: Value },

    // =========================================================================
    // HUB LIFECYCLE
    // =========================================================================
    /// A component registered with the shared-state registry.
    ComponentRegistered { component: String },

    /// A component published a new shared-state version. Consumers waiting on
    /// another component's state use this to re-check.
    SharedStatePublished { owner: String, version: u64 },
}

impl HubEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::UpdateIdentities { .. }
            | Self::RemoveIdentities { .. }
            | Self::RequestReset { .. }
            | Self::AdvertisingIdentifierSet { .. } => EventTopic::GenericIdentity,
            Self::ResetComplete { .. } | Self::IdentityBooted { .. } => EventTopic::EdgeIdentity,
            Self::ConsentUpdateRequested { .. } => EventTopic::EdgeConsent,
            Self::ComponentRegistered { .. } | Self::SharedStatePublished { .. } => EventTopic::Hub,
        }
    }

    /// Get the originating source name.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::UpdateIdentities { .. }
            | Self::RemoveIdentities { .. }
            | Self::RequestReset { .. }
            | Self::AdvertisingIdentifierSet { .. } => APPLICATION_SOURCE,
            Self::ResetComplete { .. }
            | Self::ConsentUpdateRequested { .. }
            | Self::IdentityBooted { .. } => "hub.identity.edge",
            Self::ComponentRegistered { component } => component,
            Self::SharedStatePublished { owner, .. } => owner,
        }
    }

    /// Get the correlation id for request-shaped events, when one exists.
    #[must_use]
    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            Self::UpdateIdentities { request_id, .. }
            | Self::RemoveIdentities { request_id, .. }
            | Self::RequestReset { request_id }
            | Self::AdvertisingIdentifierSet { request_id, .. }
            | Self::ResetComplete { request_id }
            | Self::ConsentUpdateRequested { request_id, .. } => Some(*request_id),
            Self::IdentityBooted { .. }
            | Self::ComponentRegistered { .. }
            | Self::SharedStatePublished { .. } => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Application-facing identity requests.
    GenericIdentity,
    /// Identity component notifications.
    EdgeIdentity,
    /// Consent signals derived from identifier transitions.
    EdgeConsent,
    /// Registry and lifecycle events.
    Hub,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source names to include. Empty means all sources.
    pub sources: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from specific sources.
    #[must_use]
    pub fn from_sources(sources: Vec<String>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &HubEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match =
            self.sources.is_empty() || self.sources.iter().any(|s| s == event.source());

        topic_match && source_match
    }
}
