//! Explicit observer registration.
//!
//! Components register a callback and hold the returned [`Subscription`] for
//! as long as they are mounted. Dropping the subscription unregisters the
//! callback, so there is no global event bus and no manual cleanup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// A registered callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registrations<E> {
    next_id: u64,
    listeners: BTreeMap<u64, Listener<E>>,
}

/// A set of callbacks notified synchronously, in registration order.
pub struct ObserverRegistry<E> {
    inner: Arc<Mutex<Registrations<E>>>,
}

impl<E: 'static> ObserverRegistry<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registrations {
                next_id: 0,
                listeners: BTreeMap::new(),
            })),
        }
    }

    /// Registers `listener` until the returned subscription is dropped.
    pub fn subscribe(&self, listener: Listener<E>) -> Subscription {
        let id = {
            let mut regs = lock(&self.inner);
            let id = regs.next_id;
            regs.next_id += 1;
            regs.listeners.insert(id, listener);
            id
        };

        let weak: Weak<Mutex<Registrations<E>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).listeners.remove(&id);
            }
        })
    }

    /// Invokes every registered listener with `event`.
    ///
    /// Listeners are snapshotted first and called without holding the lock, so
    /// a listener may read the owning store or drop its own subscription.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = lock(&self.inner).listeners.values().cloned().collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of currently registered listeners.
    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for ObserverRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<E>(inner: &Mutex<Registrations<E>>) -> MutexGuard<'_, Registrations<E>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Guard that unregisters a listener when dropped.
#[must_use = "dropping a Subscription unregisters the listener immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that holds nothing, for backends without change events.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Unregisters now. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_reaches_all_listeners() {
        let registry = ObserverRegistry::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let t1 = total.clone();
        let _a = registry.subscribe(Arc::new(move |v: &u32| {
            t1.fetch_add(*v as usize, Ordering::SeqCst);
        }));
        let t2 = total.clone();
        let _b = registry.subscribe(Arc::new(move |v: &u32| {
            t2.fetch_add(*v as usize, Ordering::SeqCst);
        }));

        registry.notify(&5);
        assert_eq!(total.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_drop_unregisters() {
        let registry = ObserverRegistry::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let sub = registry.subscribe(Arc::new(move |_: &()| {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(registry.len(), 1);

        registry.notify(&());
        drop(sub);
        registry.notify(&());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_may_drop_its_own_subscription() {
        let registry = ObserverRegistry::<()>::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let s = slot.clone();
        let sub = registry.subscribe(Arc::new(move |_: &()| {
            s.lock().unwrap().take();
        }));
        *slot.lock().unwrap() = Some(sub);

        registry.notify(&());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_subscription_outlives_registry() {
        let registry = ObserverRegistry::<()>::new();
        let sub = registry.subscribe(Arc::new(|_: &()| {}));
        drop(registry);
        sub.unsubscribe();
    }
}
