//! The in-memory user identity store.
//!
//! Identity is shared by the facade and read by every dispatch through the
//! event factory. Mutation (`reset`, identity calls) is infrequent relative
//! to reads; events capture their identity snapshot at build time, so a
//! reset never corrupts an in-flight dispatch. Durable persistence of
//! identity is a collaborator concern outside this crate.

use std::sync::Arc;

use beacon_core::Traits;
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct UserState {
    user_id: Option<String>,
    anonymous_id: Option<String>,
    traits: Traits,
}

/// Handle to the identity of the current user.
///
/// Cheaply cloneable; all clones share one store.
#[derive(Debug, Clone, Default)]
pub struct User {
    state: Arc<RwLock<UserState>>,
}

impl User {
    /// Create an empty identity store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the anonymous id if none is present yet, and return the store.
    pub fn load(self) -> Self {
        {
            let mut state = self.state.write();
            if state.anonymous_id.is_none() {
                state.anonymous_id = Some(Uuid::new_v4().to_string());
            }
        }
        self
    }

    /// The known user id.
    ///
    /// An override, when given, replaces the stored id and becomes the
    /// returned value.
    pub fn id(&self, user_id: Option<String>) -> Option<String> {
        let mut state = self.state.write();
        if let Some(id) = user_id {
            state.user_id = Some(id);
        }
        state.user_id.clone()
    }

    /// The device-scoped anonymous id, seeding one if necessary.
    pub fn anonymous_id(&self) -> String {
        let mut state = self.state.write();
        state
            .anonymous_id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    /// The effective traits.
    ///
    /// An override, when given, is merged over the stored traits key by
    /// key and persisted; the merged result is returned.
    pub fn traits(&self, traits: Option<Traits>) -> Traits {
        let mut state = self.state.write();
        if let Some(new_traits) = traits {
            for (key, value) in new_traits {
                state.traits.insert(key, value);
            }
        }
        state.traits.clone()
    }

    /// Forget the known user: clears the user id and traits and rotates
    /// the anonymous id. Registered extensions are unaffected.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.user_id = None;
        state.traits = Traits::new();
        state.anonymous_id = Some(Uuid::new_v4().to_string());
    }
}
