//! Bounded invocation of the caller's completion callback.
//!
//! Once a dispatch settles, the caller's callback (if any) runs against the
//! resulting context, raced against a timeout. Whichever finishes first
//! resolves the call; a losing callback future is dropped and never awaited
//! further, so a slow or hung callback can never block the caller
//! indefinitely. Callback errors are logged and swallowed; they never
//! propagate to the dispatch caller.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use beacon_core::{BoxError, Context};

/// Timeout applied when the caller does not choose one.
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_millis(300);

/// A user-supplied completion callback.
///
/// Receives the settled context by reference; the returned future must be
/// `'static`, so clone whatever the async part needs out of the context
/// first. Build one with [`callback`].
pub type Callback =
    Box<dyn FnOnce(&Context) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>> + Send>;

/// Wrap a closure into a [`Callback`].
///
/// ```ignore
/// let cb = callback(|ctx| {
///     let entries = ctx.log().len();
///     async move {
///         println!("pipeline ran {entries} extensions");
///         Ok(())
///     }
/// });
/// ```
pub fn callback<F, Fut>(f: F) -> Callback
where
    F: FnOnce(&Context) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Box::new(
        move |ctx: &Context| -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>> {
            Box::pin(f(ctx))
        },
    )
}

/// Run the callback against the context, bounded by `timeout`, and return
/// the context.
///
/// `None` applies [`DEFAULT_CALLBACK_TIMEOUT`]; `Some(Duration::ZERO)` is
/// the explicit opt-in to wait for the callback indefinitely.
pub async fn invoke_callback(
    ctx: Context,
    callback: Option<Callback>,
    timeout: Option<Duration>,
) -> Context {
    let Some(callback) = callback else {
        return ctx;
    };

    let bound = timeout.unwrap_or(DEFAULT_CALLBACK_TIMEOUT);
    let fut = callback(&ctx);

    if bound.is_zero() {
        if let Err(error) = fut.await {
            tracing::warn!(context = %ctx.id(), %error, "callback failed");
        }
    } else {
        match tokio::time::timeout(bound, fut).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                tracing::warn!(context = %ctx.id(), %error, "callback failed");
            }
            Err(_) => {
                tracing::debug!(context = %ctx.id(), ?bound, "callback timed out");
            }
        }
    }

    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::EventFactory;
    use crate::user::User;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn context() -> Context {
        let factory = EventFactory::new(User::new().load());
        Context::new(factory.track("cb", None, None))
    }

    #[tokio::test]
    async fn no_callback_resolves_immediately() {
        let ctx = context();
        let id = ctx.id();
        let ctx = invoke_callback(ctx, None, None).await;
        assert_eq!(ctx.id(), id);
    }

    #[tokio::test]
    async fn callback_runs_before_resolution() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let cb = callback(move |_ctx| async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        invoke_callback(context(), Some(cb), None).await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn callback_error_is_swallowed() {
        let cb = callback(|_ctx| async { Err("callback exploded".into()) });
        let ctx = invoke_callback(context(), Some(cb), None).await;
        // Resolution still happened and the context is intact.
        assert!(ctx.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_callback_is_bounded_by_timeout() {
        let cb = callback(|_ctx| async {
            std::future::pending::<()>().await;
            Ok(())
        });

        let started = tokio::time::Instant::now();
        invoke_callback(context(), Some(cb), Some(Duration::from_millis(50))).await;
        assert_eq!(started.elapsed(), Duration::from_millis(50));
    }
}
