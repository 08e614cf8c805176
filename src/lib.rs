//! CoffyLapse client core.
//!
//! The client-resident core of the CoffyLapse game: reactive state
//! containers for application and wallet-session state, selective
//! durable persistence of user preferences, and a typed error taxonomy
//! with process-wide interception. Rendering, routing, and wallet
//! provider calls are external collaborators; their failures arrive here
//! as inputs to be classified and surfaced.

pub mod error;
pub mod persist;
pub mod state;

// Re-export key types for convenience
pub use {
    error::{
        AppError, ErrorKind, FormatOptions, FormattedError, InstallOptions, handle_global_error,
        install, install_with, report_unhandled_rejection, safe_invoke, safe_invoke_with,
        user_message, user_message_for_foreign,
    },
    persist::{
        FileSlot, MemorySlot, PersistedSnapshot, PersistenceLayer, STORAGE_KEY, StorageSlot,
        project,
    },
    state::{
        AppState, AppStore, StateStore, SubscriptionId, Theme, UserProfile, WalletSession,
        WalletStore,
    },
};
