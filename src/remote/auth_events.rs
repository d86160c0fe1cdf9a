use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        Weak,
    },
};

use crate::core::AuthSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChange {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub change: AuthChange,
    pub session: Option<AuthSession>,
}

impl AuthEvent {
    pub fn new(change: AuthChange, session: Option<AuthSession>) -> Self {
        Self { change, session }
    }

    pub fn signed_out() -> Self {
        Self { change: AuthChange::SignedOut, session: None }
    }
}

pub type AuthListener = Box<dyn Fn(AuthEvent) + Send + Sync>;

type SharedListener = Arc<dyn Fn(AuthEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, SharedListener>,
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registry of auth-state listeners owned by a remote service.
#[derive(Clone, Default)]
pub struct AuthEvents {
    listeners: Arc<Mutex<Listeners>>,
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`, hands it `initial` right away and returns the handle
    /// that keeps it registered.
    pub fn subscribe(&self, listener: AuthListener, initial: AuthEvent) -> Subscription {
        let listener: SharedListener = Arc::from(listener);

        let id = {
            let mut listeners = lock(&self.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, Arc::clone(&listener));
            id
        };

        listener(initial);

        Subscription { id, listeners: Arc::downgrade(&self.listeners), active: true }
    }

    pub fn emit(&self, event: AuthEvent) {
        // Listeners run outside the lock so they may subscribe or unsubscribe.
        let listeners: Vec<SharedListener> = lock(&self.listeners).entries.values().cloned().collect();

        log::debug!("Auth event {:?} delivered to {} listener(s)", event.change, listeners.len());

        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }
}

/// Keeps an auth listener registered until unsubscribed or dropped.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
    active: bool,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).entries.remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
