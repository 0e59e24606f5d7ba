//! Observer registry used for every event channel in the crate.
//!
//! A [`Subscribers`] holds callbacks in registration order. Emission snapshots
//! the list before dispatch, so a callback may unsubscribe itself (or others)
//! while being called. Each callback runs in its own failure domain: a panic
//! is caught and logged, and the remaining callbacks still run.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::error;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback<T>>,
}

/// Ordered collection of callbacks for one event channel.
pub struct Subscribers<T> {
    name: &'static str,
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Subscribers<T> {
    /// Create an empty registry. `name` is only used in log output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: BTreeMap::new(),
            })),
        }
    }

    /// Register a callback. It stays registered until the returned
    /// [`Subscription`] is unsubscribed; dropping the handle does not remove it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, Arc::new(callback));

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).callbacks.remove(&id);
                }
            })),
        }
    }

    /// Deliver `value` to every callback registered at the time of the call.
    pub fn emit(&self, value: &T) {
        // Snapshot so callbacks can (un)subscribe without deadlocking.
        let snapshot: Vec<Callback<T>> = lock(&self.inner).callbacks.values().cloned().collect();

        for callback in snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
                error!(
                    event = self.name,
                    "Error in event listener: {}",
                    panic_message(panic.as_ref())
                );
            }
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        lock(&self.inner).callbacks.len()
    }

    /// Check whether no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Disposer returned by [`Subscribers::subscribe`].
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the callback from its registry. Idempotent.
    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    /// Same as [`Subscription::unsubscribe`], usable through `&mut`.
    pub fn dispose(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    /// A subscription that owns nothing.
    pub fn empty() -> Self {
        Self { remove: None }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Extract a printable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
