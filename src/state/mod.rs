//! Centralized state management with reactive updates to UI components.
//!
//! This module provides the generic reactive store plus the two typed
//! process-wide state instances: application state (user, theme, loading)
//! and the blockchain wallet session.

pub mod app_state;
pub mod session;
pub mod store;

pub use {
    app_state::{AppState, AppStore, Theme, UserProfile},
    session::{ProviderHandle, SignerHandle, WalletSession, WalletStore},
    store::{StateStore, SubscriptionId},
};
