//! Generic reactive state container with synchronous subscriptions.
//!
//! This module provides the `StateStore` primitive that the typed
//! application and wallet stores are built on. Updates are applied
//! atomically and observed in issue order; subscribers are notified
//! synchronously after each commit.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;
type Patch<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Identifies an active subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Shared reactive container for a single logical state instance.
///
/// The store is a cheap handle: cloning it yields another handle to the
/// same underlying state. All mutation goes through [`StateStore::update`];
/// no component holds a direct reference into the state.
#[derive(Debug)]
pub struct StateStore<S> {
    inner: Arc<StoreInner<S>>,
}

struct StoreInner<S> {
    state: Mutex<S>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
    /// Updates issued while a notification cycle is running.
    pending: Mutex<VecDeque<Patch<S>>>,
    /// Set while a notification cycle is draining the pending queue.
    notifying: AtomicBool,
    next_id: AtomicU64,
}

impl<S> std::fmt::Debug for StoreInner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreInner")
            .field("listeners", &self.listeners.lock().len())
            .field("notifying", &self.notifying.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Clone + Send + 'static> StateStore<S> {
    /// Creates a store holding `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(initial),
                listeners: Mutex::new(Vec::new()),
                pending: Mutex::new(VecDeque::new()),
                notifying: AtomicBool::new(false),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn get(&self) -> S {
        self.inner.state.lock().clone()
    }

    /// Applies `patch` to the state and notifies subscribers.
    ///
    /// The patch runs under the state lock, so no observer ever sees a
    /// partially applied update. After the commit, every current
    /// subscriber is invoked synchronously, in subscription order, with
    /// the new state. An update issued from inside a listener does not
    /// recurse: it is queued and applied after the running notification
    /// cycle completes, in issue order.
    pub fn update(&self, patch: impl FnOnce(&mut S) + Send + 'static) {
        self.inner.pending.lock().push_back(Box::new(patch));
        if self.inner.notifying.swap(true, Ordering::AcqRel) {
            // A cycle is already draining; it will pick this patch up.
            return;
        }
        self.drain();
    }

    /// Registers `listener` to run after every committed update.
    ///
    /// # Returns
    ///
    /// A `SubscriptionId` accepted by [`StateStore::unsubscribe`].
    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Removes a previously registered listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.lock().retain(|(entry, _)| *entry != id);
    }

    fn drain(&self) {
        loop {
            let next = self.inner.pending.lock().pop_front();
            let Some(patch) = next else {
                self.inner.notifying.store(false, Ordering::Release);
                // An update may have been enqueued between the empty pop
                // and the flag reset; reclaim the cycle if so.
                if self.inner.pending.lock().is_empty()
                    || self.inner.notifying.swap(true, Ordering::AcqRel)
                {
                    return;
                }
                continue;
            };

            let snapshot = {
                let mut state = self.inner.state.lock();
                patch(&mut state);
                state.clone()
            };

            // Snapshot the subscriber list so listeners may subscribe or
            // unsubscribe re-entrantly without deadlocking.
            let listeners = self.inner.listeners.lock().clone();
            for (_, listener) in &listeners {
                listener(&snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering::SeqCst},
    };

    use crate::state::store::StateStore;

    #[test]
    fn test_get_returns_snapshot() {
        let store = StateStore::new(7_i32);
        assert_eq!(store.get(), 7);
        store.update(|value| *value = 9);
        assert_eq!(store.get(), 9);
    }

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let store = StateStore::new(0_i32);
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store.subscribe(move |_| order.lock().unwrap().push(tag));
        }

        store.update(|value| *value += 1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_listener_sees_fully_applied_state() {
        let store = StateStore::new((0_i32, 0_i32));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_by_listener = Arc::clone(&seen);
        store.subscribe(move |state: &(i32, i32)| {
            seen_by_listener.lock().unwrap().push(*state);
        });

        store.update(|state| {
            state.0 = 1;
            state.1 = 2;
        });
        assert_eq!(*seen.lock().unwrap(), vec![(1, 2)]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = StateStore::new(0_i32);
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_in_listener = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            calls_in_listener.fetch_add(1, SeqCst);
        });

        store.update(|value| *value += 1);
        store.unsubscribe(id);
        store.update(|value| *value += 1);
        assert_eq!(calls.load(SeqCst), 1);
    }

    #[test]
    fn test_reentrant_update_is_queued_not_recursed() {
        let store = StateStore::new(0_i32);
        let observed = Arc::new(Mutex::new(Vec::new()));

        let handle = store.clone();
        let observed_by_listener = Arc::clone(&observed);
        store.subscribe(move |value: &i32| {
            observed_by_listener.lock().unwrap().push(*value);
            if *value == 1 {
                // Must not recurse into another notification cycle.
                handle.update(|value| *value = 2);
            }
        });

        store.update(|value| *value = 1);

        // Both commits were observed, in issue order, after each other.
        assert_eq!(*observed.lock().unwrap(), vec![1, 2]);
        assert_eq!(store.get(), 2);
    }

    #[test]
    fn test_updates_are_applied_in_issue_order() {
        let store = StateStore::new(Vec::<i32>::new());
        for n in 0..5 {
            store.update(move |log| log.push(n));
        }
        assert_eq!(store.get(), vec![0, 1, 2, 3, 4]);
    }
}
