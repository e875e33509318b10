//! The pluggable unit of pipeline behaviour.
//!
//! An [`Extension`] validates, enriches, or forwards events. Implementations
//! are independent and unaware of each other; the queue runs them in
//! registration order and isolates their failures.
//!
//! # Static vs dynamic dispatch
//!
//! The [`Extension`] trait uses native `async fn`-style methods for direct
//! use. The queue needs runtime polymorphism, so [`DynExtension`] mirrors it
//! in object-safe form with a blanket implementation: implement
//! `Extension`, get `DynExtension` for free.
//!
//! # Hook contract
//!
//! Hooks receive the [`Context`] read-only and report one of three outcomes:
//!
//! - `Ok(HookFlow::Continue)`: done, deliver to the next extension.
//! - `Ok(HookFlow::Halt)`: done, and delivery of this context stops here
//!   (validation uses this to block malformed events).
//! - `Err(_)`: the hook failed. The failure is recorded in the context log
//!   and later extensions still run.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use crate::context::Context;
use crate::error::BoxError;
use crate::event::EventKind;

/// Whether delivery of a context continues past the current extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFlow {
    /// Deliver the context to the next extension.
    Continue,
    /// Stop delivering this context; later extensions are not invoked.
    Halt,
}

/// The introspection handle an extension receives during `load`.
///
/// Cheaply cloneable; carries the client configuration an extension may
/// need to initialise itself.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    write_key: Arc<str>,
    timeout: Duration,
}

impl ClientHandle {
    /// Create a handle from the client's configuration.
    pub fn new(write_key: impl Into<Arc<str>>, timeout: Duration) -> Self {
        Self {
            write_key: write_key.into(),
            timeout,
        }
    }

    /// The write key the client was loaded with.
    pub fn write_key(&self) -> &str {
        &self.write_key
    }

    /// The callback timeout the client applies to dispatch resolution.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A pluggable unit of pipeline behaviour.
///
/// Override only the hooks you care about; the defaults pass every event
/// through untouched.
pub trait Extension: Send + Sync + 'static {
    /// Stable name of the extension, used to tag context log entries.
    fn name(&self) -> &str;

    /// One-time initialisation, invoked during registration.
    ///
    /// A failure here marks the extension `Failed`; it keeps its ordering
    /// slot but receives no per-event hooks.
    fn load(&self, client: ClientHandle) -> impl Future<Output = Result<(), BoxError>> + Send {
        async move {
            let _ = client;
            Ok(())
        }
    }

    /// Hook for track events.
    fn track(&self, ctx: &Context) -> impl Future<Output = Result<HookFlow, BoxError>> + Send {
        async move {
            let _ = ctx;
            Ok(HookFlow::Continue)
        }
    }

    /// Hook for page events.
    fn page(&self, ctx: &Context) -> impl Future<Output = Result<HookFlow, BoxError>> + Send {
        async move {
            let _ = ctx;
            Ok(HookFlow::Continue)
        }
    }

    /// Hook for identify events.
    fn identify(&self, ctx: &Context) -> impl Future<Output = Result<HookFlow, BoxError>> + Send {
        async move {
            let _ = ctx;
            Ok(HookFlow::Continue)
        }
    }
}

/// Object-safe version of [`Extension`].
///
/// Use this trait when you need runtime polymorphism, e.g. in the queue's
/// registration sequence.
pub trait DynExtension: Send + Sync + 'static {
    /// Stable name of the extension.
    fn name(&self) -> &str;

    /// One-time initialisation (dynamic dispatch version).
    fn load_dyn<'a>(
        &'a self,
        client: ClientHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

    /// Invoke the hook matching `kind` (dynamic dispatch version).
    fn hook_dyn<'a>(
        &'a self,
        kind: EventKind,
        ctx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = Result<HookFlow, BoxError>> + Send + 'a>>;
}

// Blanket implementation: any Extension implements DynExtension.
impl<T: Extension> DynExtension for T {
    fn name(&self) -> &str {
        Extension::name(self)
    }

    fn load_dyn<'a>(
        &'a self,
        client: ClientHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.load(client))
    }

    fn hook_dyn<'a>(
        &'a self,
        kind: EventKind,
        ctx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = Result<HookFlow, BoxError>> + Send + 'a>> {
        match kind {
            EventKind::Track => Box::pin(self.track(ctx)),
            EventKind::Page => Box::pin(self.page(ctx)),
            EventKind::Identify => Box::pin(self.identify(ctx)),
        }
    }
}

/// Lifecycle state of a registered extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Registered; `load` has not completed yet.
    Unloaded,
    /// `load` completed; the extension receives hooks.
    Loaded,
    /// `load` failed; the extension keeps its slot but receives no hooks.
    Failed,
}

const STATE_UNLOADED: u8 = 0;
const STATE_LOADED: u8 = 1;
const STATE_FAILED: u8 = 2;

/// A handle for observing (and, for the queue, advancing) an extension's
/// lifecycle state.
#[derive(Debug, Clone)]
pub struct StateHandle(Arc<AtomicU8>);

impl StateHandle {
    /// Create a handle in the `Unloaded` state.
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(STATE_UNLOADED)))
    }

    /// Read the current state.
    pub fn state(&self) -> LoadState {
        match self.0.load(Ordering::Acquire) {
            STATE_LOADED => LoadState::Loaded,
            STATE_FAILED => LoadState::Failed,
            _ => LoadState::Unloaded,
        }
    }

    /// Advance the state. Called by the queue when `load` settles.
    pub fn set(&self, state: LoadState) {
        let raw = match state {
            LoadState::Unloaded => STATE_UNLOADED,
            LoadState::Loaded => STATE_LOADED,
            LoadState::Failed => STATE_FAILED,
        };
        self.0.store(raw, Ordering::Release);
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}
