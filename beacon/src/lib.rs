//! # beacon - an async analytics client
//!
//! Beacon accepts high-level user intents (track an action, view a page,
//! identify a user), turns them into canonical event records, and routes
//! each record through a chain of pluggable extensions that validate,
//! enrich, and forward it to destinations.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use beacon::{Analytics, Settings};
//!
//! let analytics = Analytics::load(Settings::new("writekey-abc")).await;
//! let ctx = analytics.track("purchase", None, None).await;
//! assert!(ctx.succeeded());
//! ```
//!
//! ## Pipeline guarantees
//!
//! - Extensions run in registration order, every dispatch.
//! - One extension's failure never prevents the rest from running; the
//!   context log records exactly what happened.
//! - `track`/`page`/`identify` always resolve; a slow callback is bounded
//!   by a timeout, never awaited indefinitely.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod client;
mod factory;
mod queue;
mod settings;
mod user;

pub use beacon_core::{
    // Error types
    BoxError,
    // Extension handles
    ClientHandle,
    // Context
    Context,
    // Extension
    DynExtension,
    // Event model
    Event,
    EventBody,
    EventKind,
    Extension,
    HookFlow,
    Library,
    LoadState,
    LogEntry,
    Outcome,
    Properties,
    RegisterError,
    StateHandle,
    Traits,
};

pub use callback::{Callback, DEFAULT_CALLBACK_TIMEOUT, callback, invoke_callback};
pub use client::Analytics;
pub use factory::{EventFactory, EventOptions};
pub use queue::{EventQueue, ExtensionEntry};
pub use settings::Settings;
pub use user::User;

/// Standard extension implementations.
pub mod extensions {
    pub use beacon_std::destination::{DEFAULT_ENDPOINT, DestinationError, HttpDestination};
    pub use beacon_std::validation::{ValidationError, ValidationExtension};
}

/// Testing utilities.
pub mod testing {
    pub use beacon_std::testing::{
        CountingExtension, FailingExtension, HaltingExtension, RecordingExtension, SlowExtension,
    };
}

/// Prelude module - common imports for Beacon.
///
/// # Usage
///
/// ```rust,ignore
/// use beacon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Analytics, BoxError, Context, Event, EventKind, Extension, HookFlow, Outcome, Settings,
        callback,
    };
}
