//! Subscriber registry for cache state changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::CacheState;

type Listener = Arc<dyn Fn(&CacheState) + Send + Sync>;

/// Synchronous fan-out of state changes.
///
/// Listeners are invoked inline on the mutating task, after the state lock is
/// released. `emit` works on a copy of the registry, so a listener may
/// subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl Listeners {
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(&CacheState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Some(Arc::downgrade(self)),
        }
    }

    pub(crate) fn emit(&self, state: &CacheState) {
        let listeners: Vec<Listener> = self.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(state);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|(entry, _)| *entry != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    /// Keep the listener registered for the lifetime of the cache.
    pub fn detach(mut self) {
        self.registry = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|r| r.upgrade()) {
            registry.remove(self.id);
        }
    }
}
