//! Load-time configuration for the client.

use std::time::Duration;

use beacon_core::{DynExtension, Extension};

/// Configuration supplied to [`Analytics::load`](crate::Analytics::load).
///
/// ```ignore
/// let settings = Settings::new("writekey-abc")
///     .with_timeout(Duration::from_millis(150))
///     .with_extension(MyEnricher::new());
/// ```
pub struct Settings {
    pub(crate) write_key: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) extensions: Vec<Box<dyn DynExtension>>,
    pub(crate) skip_primary_destination: bool,
    pub(crate) endpoint: Option<String>,
}

impl Settings {
    /// Settings for the given write key, with defaults everywhere else:
    /// default callback timeout, the built-in destination enabled, no
    /// caller extensions.
    pub fn new(write_key: impl Into<String>) -> Self {
        Self {
            write_key: write_key.into(),
            timeout: None,
            extensions: Vec::new(),
            skip_primary_destination: false,
            endpoint: None,
        }
    }

    /// Bound callback invocation by `timeout`. `Duration::ZERO` opts into
    /// waiting for callbacks indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a caller-supplied extension. Registration order follows the
    /// order of these calls, after the built-ins.
    pub fn with_extension<X: Extension>(mut self, extension: X) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Do not register the built-in HTTP destination.
    ///
    /// This is an explicit configuration choice (used by tests and by
    /// callers that only want their own destinations), not an implicit
    /// environment check, so the pipeline stays deterministic.
    pub fn skip_primary_destination(mut self) -> Self {
        self.skip_primary_destination = true;
        self
    }

    /// Point the built-in destination at a different ingestion endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
