//! The event queue: the ordered extension sequence and the dispatch loop.
//!
//! The queue owns the only state shared across concurrent operations: the
//! registration sequence. Registration claims an ordering slot under the
//! write lock and runs the extension's `load` step *outside* it, so
//! concurrent registrations load in parallel while insertion order stays
//! serialized. Dispatch snapshots the sequence under the read lock and runs
//! hooks with no lock held, so any number of contexts can be in flight at
//! once.
//!
//! One extension's hook error is recorded in the context log and never
//! prevents subsequent extensions from running.

use std::sync::Arc;

use beacon_core::{
    ClientHandle, Context, DynExtension, HookFlow, LoadState, Outcome, RegisterError, StateHandle,
};
use parking_lot::RwLock;

/// One slot in the queue's ordering sequence.
///
/// Couples the extension with its lifecycle state. Entries are append-only
/// for the lifetime of the process; a failed extension keeps its slot so
/// ordering and log inspection stay consistent.
#[derive(Clone)]
pub struct ExtensionEntry {
    extension: Arc<dyn DynExtension>,
    state: StateHandle,
    name: String,
}

impl ExtensionEntry {
    /// Name of the registered extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        self.state.state()
    }
}

/// Holds the ordered set of registered extensions and runs contexts
/// through them.
#[derive(Clone, Default)]
pub struct EventQueue {
    extensions: Arc<RwLock<Vec<ExtensionEntry>>>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extension to the ordering sequence and run its `load`
    /// step.
    ///
    /// The slot is claimed atomically before `load` begins, so two
    /// concurrent registrations cannot interleave to corrupt ordering or
    /// drop an entry; only the insertion is serialized, the load work is
    /// not. On load failure the extension stays in the sequence marked
    /// `Failed` and the error is reported to the caller.
    pub async fn register(
        &self,
        extension: Arc<dyn DynExtension>,
        client: ClientHandle,
    ) -> Result<StateHandle, RegisterError> {
        let name = extension.name().to_string();
        let state = StateHandle::new();

        {
            let mut extensions = self.extensions.write();
            extensions.push(ExtensionEntry {
                extension: Arc::clone(&extension),
                state: state.clone(),
                name: name.clone(),
            });
        }

        tracing::debug!(extension = %name, "loading extension");
        match extension.load_dyn(client).await {
            Ok(()) => {
                state.set(LoadState::Loaded);
                tracing::info!(extension = %name, "extension registered");
                Ok(state)
            }
            Err(source) => {
                state.set(LoadState::Failed);
                tracing::warn!(extension = %name, error = %source, "extension failed to load");
                Err(RegisterError::LoadFailed { name, source })
            }
        }
    }

    /// Run a context through every registered extension, in registration
    /// order, and return it.
    ///
    /// For each loaded extension, the hook matching the context's event
    /// kind is invoked and its outcome appended to the context log. A hook
    /// error is recorded and delivery continues; a deliberate
    /// [`HookFlow::Halt`] is recorded and delivery stops. Extensions that
    /// are unloaded or failed are passed over without a log entry.
    pub async fn dispatch(&self, mut ctx: Context) -> Context {
        // Snapshot under the read lock; hooks run with no lock held.
        let entries: Vec<ExtensionEntry> = self.extensions.read().iter().cloned().collect();
        let kind = ctx.event().kind();

        for entry in &entries {
            if entry.state() != LoadState::Loaded {
                tracing::debug!(
                    extension = %entry.name(),
                    state = ?entry.state(),
                    "skipping extension that is not loaded"
                );
                continue;
            }

            match entry.extension.hook_dyn(kind, &ctx).await {
                Ok(HookFlow::Continue) => ctx.record(entry.name(), Outcome::Success),
                Ok(HookFlow::Halt) => {
                    ctx.record(entry.name(), Outcome::Halted);
                    tracing::debug!(
                        context = %ctx.id(),
                        extension = %entry.name(),
                        "delivery halted"
                    );
                    break;
                }
                Err(error) => {
                    tracing::warn!(
                        context = %ctx.id(),
                        extension = %entry.name(),
                        %error,
                        "extension hook failed"
                    );
                    ctx.record(entry.name(), Outcome::Failure(error.to_string()));
                }
            }
        }

        ctx
    }

    /// Snapshot of `(name, state)` for every registered extension, in
    /// registration order.
    pub fn roster(&self) -> Vec<(String, LoadState)> {
        self.extensions
            .read()
            .iter()
            .map(|entry| (entry.name().to_string(), entry.state()))
            .collect()
    }

    /// Number of registered extensions, including failed ones.
    pub fn len(&self) -> usize {
        self.extensions.read().len()
    }

    /// Whether no extensions have been registered.
    pub fn is_empty(&self) -> bool {
        self.extensions.read().is_empty()
    }
}
