//! Testing utilities for Beacon pipelines.
//!
//! This module provides extensions with observable behaviour so tests can
//! assert on ordering, isolation, and timing without real destinations.
//!
//! # Features
//!
//! - [`RecordingExtension`]: records every context it sees
//! - [`CountingExtension`]: counts hook invocations
//! - [`FailingExtension`]: fails `load` or hooks on demand
//! - [`HaltingExtension`]: halts delivery for every event
//! - [`SlowExtension`]: sleeps in its hooks

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use beacon_core::{BoxError, ClientHandle, Context, EventKind, Extension, HookFlow};
use uuid::Uuid;

// ============================================================================
// Recording Extension
// ============================================================================

/// An extension that records every context it receives.
///
/// Clones share the recording, so keep one clone outside the pipeline to
/// inspect what ran.
pub struct RecordingExtension {
    name: String,
    seen: Arc<Mutex<Vec<(Uuid, EventKind)>>>,
}

impl RecordingExtension {
    /// Create a recording extension with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The `(context id, event kind)` pairs seen so far, in order.
    pub fn seen(&self) -> Vec<(Uuid, EventKind)> {
        self.seen.lock().unwrap().clone()
    }

    /// Number of hook invocations recorded.
    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn observe(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.seen
            .lock()
            .unwrap()
            .push((ctx.id(), ctx.event().kind()));
        Ok(HookFlow::Continue)
    }
}

impl Clone for RecordingExtension {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            seen: self.seen.clone(),
        }
    }
}

impl Extension for RecordingExtension {
    fn name(&self) -> &str {
        &self.name
    }

    async fn track(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.observe(ctx)
    }

    async fn page(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.observe(ctx)
    }

    async fn identify(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        self.observe(ctx)
    }
}

// ============================================================================
// Counting Extension
// ============================================================================

/// An extension that counts hook invocations.
pub struct CountingExtension {
    name: String,
    hits: Arc<AtomicUsize>,
}

impl CountingExtension {
    /// Create a counting extension with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The current count.
    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn bump(&self) -> Result<HookFlow, BoxError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(HookFlow::Continue)
    }
}

impl Clone for CountingExtension {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            hits: self.hits.clone(),
        }
    }
}

impl Extension for CountingExtension {
    fn name(&self) -> &str {
        &self.name
    }

    async fn track(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        let _ = ctx;
        self.bump()
    }

    async fn page(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        let _ = ctx;
        self.bump()
    }

    async fn identify(&self, ctx: &Context) -> Result<HookFlow, BoxError> {
        let _ = ctx;
        self.bump()
    }
}

// ============================================================================
// Failing Extension
// ============================================================================

/// An extension that fails on demand, for exercising failure isolation and
/// the register-failure path.
pub struct FailingExtension {
    name: String,
    fail_load: bool,
    fail_hooks: bool,
}

impl FailingExtension {
    /// An extension whose `load` step fails.
    pub fn load_failure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail_load: true,
            fail_hooks: false,
        }
    }

    /// An extension that loads fine but fails every hook.
    pub fn hook_failure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail_load: false,
            fail_hooks: true,
        }
    }

    fn hook(&self) -> Result<HookFlow, BoxError> {
        if self.fail_hooks {
            Err(format!("{} hook failed intentionally", self.name).into())
        } else {
            Ok(HookFlow::Continue)
        }
    }
}

impl Extension for FailingExtension {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, _client: ClientHandle) -> Result<(), BoxError> {
        if self.fail_load {
            Err(format!("{} load failed intentionally", self.name).into())
        } else {
            Ok(())
        }
    }

    async fn track(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        self.hook()
    }

    async fn page(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        self.hook()
    }

    async fn identify(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        self.hook()
    }
}

// ============================================================================
// Halting Extension
// ============================================================================

/// An extension that halts delivery for every event it sees.
pub struct HaltingExtension {
    name: String,
}

impl HaltingExtension {
    /// Create a halting extension with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Extension for HaltingExtension {
    fn name(&self) -> &str {
        &self.name
    }

    async fn track(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        Ok(HookFlow::Halt)
    }

    async fn page(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        Ok(HookFlow::Halt)
    }

    async fn identify(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        Ok(HookFlow::Halt)
    }
}

// ============================================================================
// Slow Extension
// ============================================================================

/// An extension that sleeps in every hook, for timing tests.
pub struct SlowExtension {
    name: String,
    delay: Duration,
}

impl SlowExtension {
    /// Create a slow extension with the given per-hook delay.
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }

    async fn dawdle(&self) -> Result<HookFlow, BoxError> {
        tokio::time::sleep(self.delay).await;
        Ok(HookFlow::Continue)
    }
}

impl Extension for SlowExtension {
    fn name(&self) -> &str {
        &self.name
    }

    async fn track(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        self.dawdle().await
    }

    async fn page(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        self.dawdle().await
    }

    async fn identify(&self, _ctx: &Context) -> Result<HookFlow, BoxError> {
        self.dawdle().await
    }
}
