//! Selective durable persistence of application state.
//!
//! Persistence is opt-in per field: the snapshot whitelists `user` and
//! `theme`, so transient fields like `is_loading` can never leak into
//! durable storage. Anything unreadable in the slot — absent, corrupt,
//! wrong shape — is treated as absent data and replaced with defaults,
//! never surfaced as a fatal condition.

use std::sync::Arc;

use {
    anyhow::anyhow,
    serde::{Deserialize, Serialize},
    serde_json::{from_str, to_string},
    tracing::warn,
};

use crate::{
    error::{app_error::AppError, interceptor::handle_global_error},
    persist::slot::StorageSlot,
    state::{
        app_state::{AppState, AppStore, Theme, UserProfile},
        store::SubscriptionId,
    },
};

/// Fixed namespace key for the application's durable record.
pub const STORAGE_KEY: &str = "coffylapse-storage";

/// Whitelisted projection of [`AppState`] that survives restarts.
///
/// Every field carries `#[serde(default)]`, so a partially present
/// snapshot rehydrates field-by-field over the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    /// Signed-in user, if any.
    #[serde(default)]
    pub user: Option<UserProfile>,
    /// Theme preference.
    #[serde(default)]
    pub theme: Theme,
}

/// Projects the persistable subset out of the full state. Pure.
#[must_use]
pub fn project(state: &AppState) -> PersistedSnapshot {
    PersistedSnapshot {
        user: state.user.clone(),
        theme: state.theme,
    }
}

/// Mirrors the whitelisted projection of the app store into a durable
/// slot and rehydrates it on startup.
#[derive(Clone)]
pub struct PersistenceLayer {
    slot: Arc<dyn StorageSlot>,
    key: String,
}

impl std::fmt::Debug for PersistenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceLayer")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PersistenceLayer {
    /// Creates a layer writing to the default [`STORAGE_KEY`].
    pub fn new(slot: Arc<dyn StorageSlot>) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    /// Creates a layer writing to a custom key.
    pub fn with_key(slot: Arc<dyn StorageSlot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    /// Reads the persisted snapshot, if a readable one exists.
    ///
    /// An absent record, garbled content, or a shape that no longer
    /// deserializes all yield `None`; the unreadable record is discarded.
    pub fn load(&self) -> Option<PersistedSnapshot> {
        let raw = self.slot.read(&self.key)?;
        match from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                warn!("discarding unreadable snapshot in slot {:?}: {error}", self.key);
                None
            }
        }
    }

    /// Writes the snapshot to the slot. Fire-and-forget: a failed write
    /// degrades to unsaved preferences and is logged as a storage error,
    /// never raised.
    pub fn save(&self, snapshot: &PersistedSnapshot) {
        let outcome = match to_string(snapshot) {
            Ok(raw) => self.slot.write(&self.key, &raw).map_err(|error| error.to_string()),
            Err(error) => Err(error.to_string()),
        };
        if let Err(reason) = outcome {
            handle_global_error(anyhow!(AppError::storage(reason)), true);
        }
    }

    /// Builds the boot-time state: the persisted snapshot merged over
    /// defaults. `is_loading` always starts false.
    #[must_use]
    pub fn rehydrate(&self) -> AppState {
        let snapshot = self.load().unwrap_or_default();
        AppState {
            user: snapshot.user,
            theme: snapshot.theme,
            is_loading: false,
        }
    }

    /// Registers the post-commit hook: after every committed update the
    /// current state's projection is saved.
    pub fn attach(&self, store: &AppStore) -> SubscriptionId {
        let layer = self.clone();
        store.subscribe(move |state| layer.save(&project(state)))
    }

    /// Startup convenience: rehydrates, builds the store, and attaches
    /// the save hook.
    #[must_use]
    pub fn bootstrap(&self) -> AppStore {
        let store = AppStore::with_initial(self.rehydrate());
        self.attach(&store);
        store
    }
}
