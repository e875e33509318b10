use beacon::{BoxError, ClientHandle, Extension, Properties};
use std::time::Duration;

// ============================================================================
// Test Extensions
// ============================================================================

/// An extension whose `load` step takes a while, for registration-ordering
/// tests. Hooks are the pass-through defaults.
pub struct SlowLoadExtension {
    pub name: String,
    pub delay: Duration,
}

impl SlowLoadExtension {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }
}

impl Extension for SlowLoadExtension {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, _client: ClientHandle) -> Result<(), BoxError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// An extension that hangs track hooks only; page and identify pass
/// straight through. For asserting that a stalled context does not stall
/// the queue.
pub struct SlowTrackExtension {
    pub delay: Duration,
}

impl Extension for SlowTrackExtension {
    fn name(&self) -> &str {
        "slow-track"
    }

    async fn track(&self, _ctx: &beacon::Context) -> Result<beacon::HookFlow, BoxError> {
        tokio::time::sleep(self.delay).await;
        Ok(beacon::HookFlow::Continue)
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn props(value: serde_json::Value) -> Properties {
    value.as_object().cloned().unwrap_or_default()
}
