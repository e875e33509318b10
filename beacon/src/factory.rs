//! Builds canonical events from user intents.
//!
//! The factory stamps every event with a fresh message id, the build-time
//! timestamp, library metadata, and the identity snapshot read from the
//! shared [`User`] store. Events are immutable once built.

use beacon_core::{Event, EventBody, Library, Properties, Traits};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::user::User;

/// Per-event overrides for callers that need deterministic records.
#[derive(Debug, Clone, Default)]
pub struct EventOptions {
    /// Replace the build-time timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// Replace the generated message id.
    pub message_id: Option<Uuid>,
}

/// Produces canonical [`Event`] records.
#[derive(Debug, Clone)]
pub struct EventFactory {
    user: User,
}

impl EventFactory {
    /// Create a factory reading identity from the given store.
    pub fn new(user: User) -> Self {
        Self { user }
    }

    fn build(
        &self,
        user_id: Option<String>,
        body: EventBody,
        options: Option<EventOptions>,
    ) -> Event {
        let options = options.unwrap_or_default();
        Event {
            message_id: options.message_id.unwrap_or_else(Uuid::new_v4),
            timestamp: options.timestamp.unwrap_or_else(Utc::now),
            library: Library::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            user_id,
            anonymous_id: self.user.anonymous_id(),
            body,
        }
    }

    /// Build a track event.
    pub fn track(
        &self,
        event: impl Into<String>,
        properties: Option<Properties>,
        options: Option<EventOptions>,
    ) -> Event {
        self.build(
            self.user.id(None),
            EventBody::Track {
                event: event.into(),
                properties: properties.unwrap_or_default(),
            },
            options,
        )
    }

    /// Build a page event.
    pub fn page(
        &self,
        name: impl Into<String>,
        properties: Option<Properties>,
        options: Option<EventOptions>,
    ) -> Event {
        self.build(
            self.user.id(None),
            EventBody::Page {
                name: name.into(),
                properties: properties.unwrap_or_default(),
            },
            options,
        )
    }

    /// Build an identify event from an already-resolved identity.
    ///
    /// The facade resolves `user_id` and `traits` through the user store
    /// before calling this, so the event carries the post-update snapshot.
    pub fn identify(
        &self,
        user_id: Option<String>,
        traits: Traits,
        options: Option<EventOptions>,
    ) -> Event {
        self.build(user_id, EventBody::Identify { traits }, options)
    }
}
