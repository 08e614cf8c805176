//! Blockchain wallet session state.
//!
//! Independent from [`crate::state::app_state::AppState`]: the wallet
//! session is never persisted and resets to disconnected defaults on
//! `disconnect` or process restart.

use crate::state::store::{StateStore, SubscriptionId};

/// Opaque handle to a wallet provider connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHandle(String);

impl ProviderHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Opaque handle to a transaction signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerHandle(String);

impl SignerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Current wallet session. One logical instance per process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletSession {
    /// Whether a wallet is currently connected.
    pub is_connected: bool,
    /// Connected account address.
    pub address: Option<String>,
    /// Provider connection handle.
    pub provider: Option<ProviderHandle>,
    /// Signer handle for transaction submission.
    pub signer: Option<SignerHandle>,
}

/// Typed store for [`WalletSession`].
#[derive(Debug, Clone)]
pub struct WalletStore {
    store: StateStore<WalletSession>,
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletStore {
    /// Creates a store in the disconnected default state.
    pub fn new() -> Self {
        Self {
            store: StateStore::new(WalletSession::default()),
        }
    }

    /// Returns a snapshot of the current session.
    pub fn get(&self) -> WalletSession {
        self.store.get()
    }

    /// Registers a listener invoked after every committed update.
    pub fn subscribe(
        &self,
        listener: impl Fn(&WalletSession) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Removes a previously registered listener.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.store.unsubscribe(id)
    }

    /// Records an established wallet connection.
    pub fn connect(&self, address: impl Into<String>, provider: ProviderHandle, signer: SignerHandle) {
        let address = address.into();
        self.store.update(move |session| {
            session.is_connected = true;
            session.address = Some(address);
            session.provider = Some(provider);
            session.signer = Some(signer);
        });
    }

    /// Resets the session to the disconnected defaults.
    pub fn disconnect(&self) {
        self.store.update(|session| *session = WalletSession::default());
    }
}

#[cfg(test)]
mod tests {
    use crate::state::session::{ProviderHandle, SignerHandle, WalletSession, WalletStore};

    #[test]
    fn test_default_session_is_disconnected() {
        let session = WalletSession::default();
        assert!(!session.is_connected);
        assert!(session.address.is_none());
        assert!(session.provider.is_none());
        assert!(session.signer.is_none());
    }

    #[test]
    fn test_connect_populates_session() {
        let store = WalletStore::new();
        store.connect(
            "0xabc",
            ProviderHandle::new("injected"),
            SignerHandle::new("signer-0"),
        );

        let session = store.get();
        assert!(session.is_connected);
        assert_eq!(session.address.as_deref(), Some("0xabc"));
        assert_eq!(session.provider, Some(ProviderHandle::new("injected")));
        assert_eq!(session.signer, Some(SignerHandle::new("signer-0")));
    }

    #[test]
    fn test_disconnect_resets_to_defaults() {
        let store = WalletStore::new();
        store.connect(
            "0xabc",
            ProviderHandle::new("injected"),
            SignerHandle::new("signer-0"),
        );
        store.disconnect();
        assert_eq!(store.get(), WalletSession::default());
    }
}
