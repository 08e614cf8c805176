//! Application state: signed-in user, theme preference, loading flag.

use serde::{Deserialize, Serialize};

use crate::state::store::{StateStore, SubscriptionId};

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (default).
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Returns the opposite theme. Involutive: toggling twice is identity.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Identity record for the signed-in player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable player identifier.
    pub id: u64,
    /// Display name, if the player set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserProfile {
    /// Creates a profile with no display name.
    pub fn new(id: u64) -> Self {
        Self { id, name: None }
    }
}

/// Process-wide application state. One logical instance per process.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Signed-in user, if any.
    pub user: Option<UserProfile>,
    /// Current theme preference.
    pub theme: Theme,
    /// Whether a blocking operation is in flight. Transient: never persisted.
    pub is_loading: bool,
}

/// Typed store for [`AppState`] with the application's action set.
///
/// All mutation goes through the actions below; collaborators never write
/// state fields directly.
#[derive(Debug, Clone)]
pub struct AppStore {
    store: StateStore<AppState>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    /// Creates a store holding the default state
    /// (`{user: None, theme: Light, is_loading: false}`).
    pub fn new() -> Self {
        Self::with_initial(AppState::default())
    }

    /// Creates a store holding `initial`, typically a rehydrated snapshot.
    pub fn with_initial(initial: AppState) -> Self {
        Self {
            store: StateStore::new(initial),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn get(&self) -> AppState {
        self.store.get()
    }

    /// Registers a listener invoked after every committed update.
    pub fn subscribe(
        &self,
        listener: impl Fn(&AppState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Removes a previously registered listener.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.store.unsubscribe(id)
    }

    /// Sets or clears the signed-in user.
    pub fn set_user(&self, user: Option<UserProfile>) {
        self.store.update(move |state| state.user = user);
    }

    /// Flips the theme between light and dark.
    pub fn toggle_theme(&self) {
        self.store
            .update(|state| state.theme = state.theme.toggled());
    }

    /// Sets the loading flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.store.update(move |state| state.is_loading = is_loading);
    }

    /// Clears the user and loading flag. Keeps the theme preference.
    pub fn reset(&self) {
        self.store.update(|state| {
            state.user = None;
            state.is_loading = false;
        });
    }
}
