//! Synchronous change notification
//!
//! Listeners run on the caller's thread in registration order. The list is
//! snapshotted before dispatch, so a listener may register or remove listeners
//! (or read the registry that notified it) without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by [`ListenerList::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub struct ListenerList<E> {
    listeners: Mutex<Vec<(ListenerId, Listener<E>)>>,
    next_id: AtomicU64,
}

impl<E> Default for ListenerList<E> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<E> std::fmt::Debug for ListenerList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerList")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<E> ListenerList<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns false when the id was not registered
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_in_registration_order() {
        let list = ListenerList::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            list.subscribe(move |value: &u32| seen.lock().unwrap().push((tag, *value)));
        }

        list.notify(&7);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let list = ListenerList::<()>::new();
        let calls = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&calls);
        let id = list.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        list.notify(&());
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        list.notify(&());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn test_listener_can_subscribe_during_dispatch() {
        let list = Arc::new(ListenerList::<()>::new());
        let inner = Arc::clone(&list);
        list.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        list.notify(&());
        assert_eq!(list.len(), 2);
    }
}
