//! Structural validation of events.
//!
//! Registered first in every pipeline so malformed events never reach
//! destination extensions. A violation is a deliberate [`HookFlow::Halt`],
//! not a failure: the halting entry is recorded in the context log and the
//! violation itself is logged here.

use beacon_core::{BoxError, Context, Event, EventBody, Extension, HookFlow};
use thiserror::Error;

/// A structural problem with an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A track event with an empty action name.
    #[error("track event name is empty")]
    EmptyEventName,

    /// A page event with an empty page name.
    #[error("page name is empty")]
    EmptyPageName,

    /// An identify event whose user id is present but empty.
    #[error("identify user id is empty")]
    EmptyUserId,

    /// An event carrying neither a user id nor an anonymous id.
    #[error("event carries no identity")]
    MissingIdentity,
}

/// The built-in validation extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationExtension;

impl ValidationExtension {
    /// Create the validation extension.
    pub fn new() -> Self {
        Self
    }

    /// Check one event for structural well-formedness.
    pub fn check(event: &Event) -> Result<(), ValidationError> {
        if event.user_id.is_none() && event.anonymous_id.trim().is_empty() {
            return Err(ValidationError::MissingIdentity);
        }
        match &event.body {
            EventBody::Track { event, .. } if event.trim().is_empty() => {
                Err(ValidationError::EmptyEventName)
            }
            EventBody::Page { name, .. } if name.trim().is_empty() => {
                Err(ValidationError::EmptyPageName)
            }
            EventBody::Identify { .. } => match &event.user_id {
                Some(id) if id.trim().is_empty() => Err(ValidationError::EmptyUserId),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    async fn gate(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        match Self::check(ctx.event()) {
            Ok(()) => Ok(HookFlow::Continue),
            Err(violation) => {
                tracing::warn!(
                    context = %ctx.id(),
                    kind = %ctx.event().kind(),
                    %violation,
                    "halting malformed event"
                );
                Ok(HookFlow::Halt)
            }
        }
    }
}

impl Extension for ValidationExtension {
    fn name(&self) -> &str {
        "validation"
    }

    async fn track(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.gate(ctx).await
    }

    async fn page(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.gate(ctx).await
    }

    async fn identify(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.gate(ctx).await
    }
}
