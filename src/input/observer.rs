//! Listener lists for handler and event notifications.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::util::lock;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ListenerList<T> = Mutex<Vec<(u64, Listener<T>)>>;

/// Removes the listener it was returned for. Calling it again is a no-op.
pub type ListenerRemover = Box<dyn Fn() + Send + Sync>;

/// A list of listeners that are notified in registration order.
///
/// Listeners are invoked on a snapshot of the list, so a listener may add or
/// remove listeners (itself included) while being notified.
pub struct Observable<T> {
    listeners: Arc<ListenerList<T>>,
    next_id: AtomicU64,
}

impl<T: 'static> Observable<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a listener and returns the closure that removes it again.
    pub fn add_listener<F>(&self, listener: F) -> ListenerRemover
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, Arc::new(listener)));

        let weak: Weak<ListenerList<T>> = Arc::downgrade(&self.listeners);
        Box::new(move || {
            if let Some(listeners) = weak.upgrade() {
                lock(&listeners).retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Notifies every listener registered at the time of the call.
    pub fn raise(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Drops every listener.
    pub fn clear(&self) {
        lock(&self.listeners).clear();
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn raise_reaches_all_listeners_in_order() {
        let observable = Observable::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in 0..3 {
            let seen = seen.clone();
            let _ = observable.add_listener(move |value: &u32| {
                seen.lock().unwrap().push((tag, *value));
            });
        }

        observable.raise(&7);
        assert_eq!(*seen.lock().unwrap(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn remover_detaches_listener_and_is_idempotent() {
        let observable = Observable::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let remove = observable.add_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        observable.raise(&());
        remove();
        remove();
        observable.raise(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(observable.listener_count(), 0);
    }

    #[test]
    fn listener_may_register_during_raise() {
        let observable = Arc::new(Observable::<()>::new());
        let inner = observable.clone();
        let _ = observable.add_listener(move |_| {
            let _ = inner.add_listener(|_| {});
        });

        observable.raise(&());
        assert_eq!(observable.listener_count(), 2);
    }
}
