//! # beacon-core
//!
//! Core types and traits for the Beacon analytics client.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extensions that don't need the full `beacon` client.
//!
//! # Pipeline model
//!
//! Beacon turns user intents (track an action, view a page, identify a
//! user) into canonical [`Event`] records and routes each one through a
//! chain of pluggable [`Extension`]s. The pieces defined here:
//!
//! - [`Event`]: the immutable, canonical event record with a closed set of
//!   kinds ([`EventKind`]).
//! - [`Context`]: the per-event execution record: one event plus an
//!   append-only log of what every extension did with it.
//! - [`Extension`] / [`DynExtension`]: the capability trait for pipeline
//!   units, with per-kind hooks and a one-time `load` step. [`HookFlow`]
//!   lets a hook halt delivery deliberately; hook errors are isolated.
//! - [`LoadState`] / [`StateHandle`]: the observable lifecycle of a
//!   registered extension.
//!
//! The queue, facade, and bounded callback invocation live in the `beacon`
//! crate; stock extensions live in `beacon-std`.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod event;
mod extension;

// Re-exports
pub use context::{Context, LogEntry, Outcome};
pub use error::{BoxError, RegisterError};
pub use event::{Event, EventBody, EventKind, Library, Properties, Traits};
pub use extension::{
    ClientHandle, DynExtension, Extension, HookFlow, LoadState, StateHandle,
};
