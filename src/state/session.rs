//! Session manager: the single owner of the bearer credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! Created once at the app root and provided through Leptos context. Route
//! guards read the reactive auth flag, request controllers read the credential
//! at call time, and login/signup/logout flows are the only writers.
//!
//! DESIGN
//! ======
//! Auth state is published two ways on every mutation: an `ArcRwSignal<bool>`
//! for view code, and a synchronous listener list for non-view observers. Both
//! are updated before the mutating call returns.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never escape. A failed read or write leaves the session
//! logged out and emits a `warn` log.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use leptos::prelude::{ArcReadSignal, ArcRwSignal, Get, GetUntracked, Set};

use crate::util::credential_store::CredentialStore;

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`SessionManager::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Authoritative holder of the credential and the derived auth flag.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    authenticated: ArcRwSignal<bool>,
    listeners: Arc<Mutex<Listeners>>,
}

impl SessionManager {
    /// Build a session over `store`, seeding the auth flag from whatever a
    /// previous page load left behind.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let present = read_credential(store.as_ref()).is_some();
        log::debug!("session: restored authenticated={present}");
        Self {
            store,
            authenticated: ArcRwSignal::new(present),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Persist `token` and mark the session authenticated.
    ///
    /// The token is stored as-is; the server decides whether it is valid. The
    /// published flag is whatever storage reports afterwards, so a value the
    /// store reads back as absent (an empty token) leaves the session logged out.
    pub fn set_credential(&self, token: &str) {
        if let Err(err) = self.store.save(token) {
            log::warn!("session: credential write failed, staying logged out: {err}");
            self.publish(false);
            return;
        }
        self.publish(read_credential(self.store.as_ref()).is_some());
    }

    /// Remove the credential and mark the session unauthenticated.
    ///
    /// Calling this with nothing stored is a no-op.
    pub fn clear_credential(&self) {
        let had_credential = read_credential(self.store.as_ref()).is_some();
        if !had_credential && !self.authenticated.get_untracked() {
            return;
        }
        if let Err(err) = self.store.remove() {
            log::warn!("session: credential removal failed: {err}");
        }
        self.publish(false);
    }

    /// Reactive auth flag. Reading this inside a Leptos effect or view closure
    /// subscribes the caller to future changes.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    /// Read-only signal for components that want to hold the flag directly.
    pub fn auth_signal(&self) -> ArcReadSignal<bool> {
        self.authenticated.read_only()
    }

    /// Re-derive the auth flag from storage, notifying only on change.
    pub fn refresh(&self) {
        let present = read_credential(self.store.as_ref()).is_some();
        if present != self.authenticated.get_untracked() {
            self.publish(present);
        }
    }

    /// Register `listener` to be called synchronously after every mutation.
    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> SubscriptionId {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Drop a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        listeners.entries.len() != before
    }

    /// Current credential, read from storage at call time.
    ///
    /// Crate-private: only the request layer attaches it to outbound calls.
    pub(crate) fn credential(&self) -> Option<String> {
        read_credential(self.store.as_ref())
    }

    fn publish(&self, authenticated: bool) {
        self.authenticated.set(authenticated);
        // Snapshot so listeners may (un)subscribe without deadlocking.
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(authenticated);
        }
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.authenticated.get_untracked())
            .finish_non_exhaustive()
    }
}

fn read_credential(store: &dyn CredentialStore) -> Option<String> {
    match store.load() {
        Ok(token) => token,
        Err(err) => {
            log::warn!("session: credential read failed, treating as logged out: {err}");
            None
        }
    }
}
