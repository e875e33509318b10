//! Error types for the Beacon pipeline.
//!
//! Failures in the pipeline are local by design: a hook that fails is
//! recorded in the [`Context`](crate::Context) log and never aborts the rest
//! of the dispatch. The types here cover the cases that *are* reported to a
//! caller, which today is extension registration.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error reported by `register` when an extension's load step fails.
///
/// The extension keeps its slot in the queue's ordering sequence; its state
/// is `Failed` and it receives no per-event hooks.
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The extension's `load` step returned an error.
    #[error("extension `{name}` failed to load")]
    LoadFailed {
        /// Name of the extension that failed.
        name: String,
        /// The underlying load error.
        #[source]
        source: BoxError,
    },
}

impl RegisterError {
    /// Name of the extension the failure is attributed to.
    pub fn extension(&self) -> &str {
        match self {
            RegisterError::LoadFailed { name, .. } => name,
        }
    }
}
