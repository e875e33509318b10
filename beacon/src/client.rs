//! The user-facing analytics client.
//!
//! [`Analytics`] owns one [`EventQueue`] and one [`User`] identity store
//! for its lifetime and composes the pieces: intents become events, events
//! are wrapped in contexts and dispatched, and the settled context is piped
//! through bounded callback invocation back to the caller.
//!
//! `track`/`page`/`identify` always resolve once dispatch completes or the
//! callback bound fires; partial failures live in the returned context's
//! log, never in an error.

use std::sync::Arc;
use std::time::Duration;

use beacon_core::{
    ClientHandle, Context, DynExtension, Event, Extension, Properties, RegisterError, StateHandle,
    Traits,
};
use beacon_std::{HttpDestination, ValidationExtension};

use crate::callback::{Callback, DEFAULT_CALLBACK_TIMEOUT, invoke_callback};
use crate::factory::EventFactory;
use crate::queue::EventQueue;
use crate::settings::Settings;
use crate::user::User;

/// The analytics client.
///
/// Obtained from [`Analytics::load`]; a value of this type is always ready
/// to dispatch. Individual extension failures are recorded per extension
/// and never escalate to the client itself.
pub struct Analytics {
    write_key: Arc<str>,
    timeout: Option<Duration>,
    queue: EventQueue,
    user: User,
    factory: EventFactory,
}

impl Analytics {
    /// Load a client: construct the queue and identity store, register the
    /// built-in validation extension first, then the built-in HTTP
    /// destination (unless skipped) and all caller-supplied extensions
    /// concurrently.
    ///
    /// Registration failures are logged and recorded on the extension;
    /// loading itself always produces a ready client.
    pub async fn load(settings: Settings) -> Analytics {
        let Settings {
            write_key,
            timeout,
            extensions,
            skip_primary_destination,
            endpoint,
        } = settings;

        let user = User::new().load();
        let factory = EventFactory::new(user.clone());
        let analytics = Analytics {
            write_key: write_key.into(),
            timeout,
            queue: EventQueue::new(),
            user,
            factory,
        };
        let handle = analytics.handle();

        // Validation holds slot zero so malformed events never reach a
        // destination; it must finish registering before anything else
        // starts.
        if let Err(error) = analytics
            .queue
            .register(Arc::new(ValidationExtension::new()), handle.clone())
            .await
        {
            tracing::warn!(%error, "validation registration failed");
        }

        let mut pending: Vec<Arc<dyn DynExtension>> = Vec::new();
        if !skip_primary_destination {
            let mut destination = HttpDestination::new(&*analytics.write_key);
            if let Some(endpoint) = &endpoint {
                destination = destination.with_endpoint(endpoint);
            }
            pending.push(Arc::new(destination));
        }
        pending.extend(extensions.into_iter().map(Arc::from));

        let registrations = pending.into_iter().map(|extension| {
            let queue = analytics.queue.clone();
            let handle = handle.clone();
            async move {
                if let Err(error) = queue.register(extension, handle).await {
                    tracing::warn!(
                        extension = error.extension(),
                        %error,
                        "extension registration failed"
                    );
                }
            }
        });
        futures::future::join_all(registrations).await;

        tracing::info!(
            extensions = analytics.queue.len(),
            "analytics client ready"
        );
        analytics
    }

    /// Track a user action.
    pub async fn track(
        &self,
        event: impl Into<String>,
        properties: Option<Properties>,
        callback: Option<Callback>,
    ) -> Context {
        let event = self.factory.track(event, properties, None);
        self.dispatch(event, callback).await
    }

    /// Record a page view.
    pub async fn page(
        &self,
        name: impl Into<String>,
        properties: Option<Properties>,
        callback: Option<Callback>,
    ) -> Context {
        let event = self.factory.page(name, properties, None);
        self.dispatch(event, callback).await
    }

    /// Declare who the current user is.
    ///
    /// The identity store is updated first; the event carries the resolved
    /// post-update snapshot.
    pub async fn identify(
        &self,
        user_id: Option<String>,
        traits: Option<Traits>,
        callback: Option<Callback>,
    ) -> Context {
        let user_id = self.user.id(user_id);
        let traits = self.user.traits(traits);
        let event = self.factory.identify(user_id, traits, None);
        self.dispatch(event, callback).await
    }

    /// Register an extension with this client's queue.
    pub async fn register<X: Extension>(&self, extension: X) -> Result<StateHandle, RegisterError> {
        self.queue.register(Arc::new(extension), self.handle()).await
    }

    /// The identity store.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Clear identity state. The extension sequence is untouched.
    pub fn reset(&self) {
        self.user.reset();
        tracing::debug!("identity reset");
    }

    /// The queue holding this client's extension sequence.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// The introspection handle passed to extensions during `load`.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle::new(
            Arc::clone(&self.write_key),
            self.timeout.unwrap_or(DEFAULT_CALLBACK_TIMEOUT),
        )
    }

    async fn dispatch(&self, event: Event, callback: Option<Callback>) -> Context {
        let ctx = Context::new(event);
        tracing::debug!(
            context = %ctx.id(),
            kind = %ctx.event().kind(),
            "dispatching event"
        );
        let dispatched = self.queue.dispatch(ctx).await;
        invoke_callback(dispatched, callback, self.timeout).await
    }
}
