//! The built-in HTTP destination.
//!
//! Forwards each event that survives validation to an analytics ingestion
//! endpoint as JSON. One POST per event; retry, batching, and buffering are
//! out of scope here, so a non-2xx response or transport error is simply a
//! per-event failure recorded in that context's log.

use std::sync::OnceLock;
use std::time::Duration;

use beacon_core::{BoxError, ClientHandle, Context, Extension, HookFlow};
use thiserror::Error;

/// Default ingestion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ingest.beacon.dev";

/// Request timeout applied to every send.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the HTTP destination.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// A hook ran before `load` built the HTTP client.
    #[error("destination used before load completed")]
    NotLoaded,

    /// The request could not be sent or the response not read.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("ingest API error (status {status})")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },
}

impl From<reqwest::Error> for DestinationError {
    fn from(err: reqwest::Error) -> Self {
        DestinationError::Network(err.to_string())
    }
}

/// Extension that forwards events to an HTTP ingestion endpoint.
///
/// The write key is sent as the basic-auth username, the event as the JSON
/// body, to `{endpoint}/v1/{track|page|identify}`.
pub struct HttpDestination {
    write_key: String,
    endpoint: String,
    client: OnceLock<reqwest::Client>,
}

impl HttpDestination {
    /// Create a destination posting to [`DEFAULT_ENDPOINT`].
    pub fn new(write_key: impl Into<String>) -> Self {
        Self {
            write_key: write_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: OnceLock::new(),
        }
    }

    /// Override the ingestion endpoint (trailing slashes are trimmed).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    async fn send(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        let client = self.client.get().ok_or(DestinationError::NotLoaded)?;
        let kind = ctx.event().kind();
        let url = format!("{}/v1/{kind}", self.endpoint);

        tracing::debug!(context = %ctx.id(), %kind, %url, "forwarding event");

        let response = client
            .post(&url)
            .basic_auth(&self.write_key, None::<&str>)
            .json(ctx.event())
            .send()
            .await
            .map_err(DestinationError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DestinationError::Api {
                status: status.as_u16(),
            }
            .into());
        }
        Ok(HookFlow::Continue)
    }
}

impl Extension for HttpDestination {
    fn name(&self) -> &str {
        "http-destination"
    }

    async fn load(&self, _client: ClientHandle) -> Result<(), BoxError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(DestinationError::from)?;
        // load runs once per registration; a second set is a no-op.
        let _ = self.client.set(client);
        Ok(())
    }

    async fn track(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.send(ctx).await
    }

    async fn page(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.send(ctx).await
    }

    async fn identify(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.send(ctx).await
    }
}
