//! # beacon-std
//!
//! Standard extension implementations for the Beacon analytics client.
//!
//! - [`validation`]: the structural validation extension every pipeline
//!   registers first.
//! - [`destination`]: the built-in HTTP destination that forwards events
//!   to an ingestion endpoint.
//! - [`testing`]: extensions with observable behaviour for tests.
//!
//! Everything here is an ordinary [`Extension`](beacon_core::Extension)
//! implementation; nothing is special-cased by the pipeline.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod destination;
pub mod testing;
pub mod validation;

pub use destination::{DEFAULT_ENDPOINT, DestinationError, HttpDestination};
pub use validation::{ValidationError, ValidationExtension};
