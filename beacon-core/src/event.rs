//! The canonical analytics event.
//!
//! Events are built once by the event factory and are immutable from then
//! on: the pipeline reads them, logs around them, and forwards them, but
//! never rewrites them. Everything an extension needs to act on an event is
//! captured at build time, including the identity snapshot, so later
//! mutations of the user store cannot leak into an in-flight dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Free-form key/value payload attached to track and page events.
pub type Properties = serde_json::Map<String, Value>;

/// Free-form key/value payload describing a user.
pub type Traits = serde_json::Map<String, Value>;

/// The closed set of per-event hook discriminants.
///
/// Extensions implement hooks keyed by this set; there are no open-ended,
/// stringly-typed event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A user performed an action.
    Track,
    /// A user viewed a page.
    Page,
    /// A user's identity or traits were declared.
    Identify,
}

impl EventKind {
    /// Wire name of the kind, as used in endpoint paths and the `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Track => "track",
            EventKind::Page => "page",
            EventKind::Identify => "identify",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind-specific portion of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventBody {
    /// A named action with its properties.
    Track {
        /// Name of the action, e.g. `"purchase"`.
        event: String,
        /// Action payload.
        properties: Properties,
    },
    /// A page view with its properties.
    Page {
        /// Name of the page.
        name: String,
        /// Page payload.
        properties: Properties,
    },
    /// A declaration of who the user is.
    Identify {
        /// Effective traits at the time the event was built.
        traits: Traits,
    },
}

/// Metadata identifying the client library that produced an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Library name.
    pub name: String,
    /// Library version.
    pub version: String,
}

impl Library {
    /// Create library metadata.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// A canonical analytics event record.
///
/// Common fields live here; the tagged [`EventBody`] carries what is
/// specific to each kind. The `user_id`/`anonymous_id` pair is the identity
/// snapshot captured when the event was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique id of this event record.
    pub message_id: Uuid,
    /// When the event was built.
    pub timestamp: DateTime<Utc>,
    /// Producing library.
    pub library: Library,
    /// Known user id, if the user has been identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Device-scoped anonymous id; always present.
    pub anonymous_id: String,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub body: EventBody,
}

impl Event {
    /// The hook discriminant for this event.
    pub fn kind(&self) -> EventKind {
        match self.body {
            EventBody::Track { .. } => EventKind::Track,
            EventBody::Page { .. } => EventKind::Page,
            EventBody::Identify { .. } => EventKind::Identify,
        }
    }

    /// The user-facing name of the event, where the kind has one.
    pub fn name(&self) -> Option<&str> {
        match &self.body {
            EventBody::Track { event, .. } => Some(event),
            EventBody::Page { name, .. } => Some(name),
            EventBody::Identify { .. } => None,
        }
    }
}
