//! # Subscriber Registry
//!
//! Synchronous publish/subscribe used by every store.
//!
//! ## Notification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Mutation → Notification                              │
//! │                                                                         │
//! │  store.add_to_cart(p)                                                   │
//! │       │                                                                 │
//! │       ├── 1. lock collection, apply change, unlock                      │
//! │       │                                                                 │
//! │       ├── 2. Subscribers::notify(&event)                                │
//! │       │        ├── view A callback  (reads store: sees new state)       │
//! │       │        └── view B callback  (reads store: sees new state)       │
//! │       │                                                                 │
//! │       └── 3. return to the event handler                                │
//! │                                                                         │
//! │  Callbacks run with NO lock held, so they may read or mutate the        │
//! │  store they were notified by.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Nested Mutations
//! An event raised while a pass is running is queued and delivered once
//! the current event has reached every subscriber. All subscribers see
//! events in the order the changes were applied.
//!
//! ## Teardown
//! `subscribe` returns a [`Subscription`] guard. Dropping it removes the
//! callback, so a torn-down view is never called again and its captured
//! state is released.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

/// Identifier handed out for each registration.
pub type SubscriberId = u64;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// The set of callbacks registered against one store.
pub struct Subscribers<E> {
    registry: Arc<Registry<E>>,
}

struct Registry<E> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriberId, Callback<E>)>>,
    dispatch: Mutex<Dispatch<E>>,
}

/// Events waiting for delivery, and whether a pass is already running.
struct Dispatch<E> {
    running: bool,
    pending: VecDeque<E>,
}

impl<E> Registry<E> {
    fn entries(&self) -> MutexGuard<'_, Vec<(SubscriberId, Callback<E>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self) -> MutexGuard<'_, Dispatch<E>> {
        self.dispatch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contains(&self, id: SubscriberId) -> bool {
        self.entries().iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// Type-erased removal so a [`Subscription`] does not carry the event type.
trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: SubscriberId) -> bool;
}

impl<E: Send> Unsubscribe for Registry<E> {
    fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = {
            let mut entries = self.entries();
            entries
                .iter()
                .position(|(entry_id, _)| *entry_id == id)
                .map(|pos| entries.remove(pos))
        };
        // The callback (and whatever it captured) is dropped here, after the
        // lock is released.
        removed.is_some()
    }
}

impl<E: 'static> Subscribers<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Subscribers {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                entries: Mutex::new(Vec::new()),
                dispatch: Mutex::new(Dispatch {
                    running: false,
                    pending: VecDeque::new(),
                }),
            }),
        }
    }

    /// Registers `callback` and returns the guard that keeps it registered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        E: Send,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.entries().push((id, Arc::new(callback)));
        trace!(subscriber = id, "subscriber registered");

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        let registry: Weak<dyn Unsubscribe> = registry;
        Subscription { id, registry }
    }

    /// Calls every current subscriber with `event`, in registration order.
    ///
    /// A subscriber removed by an earlier callback in the same pass is
    /// skipped. Called from inside a callback, the event is queued behind
    /// the one being delivered and this returns immediately.
    pub fn notify(&self, event: &E)
    where
        E: Clone,
    {
        {
            let mut dispatch = self.registry.dispatch();
            dispatch.pending.push_back(event.clone());
            if dispatch.running {
                trace!(queued = dispatch.pending.len(), "notification queued");
                return;
            }
            dispatch.running = true;
        }

        let _reset = DispatchReset(&self.registry);
        loop {
            let next = {
                let mut dispatch = self.registry.dispatch();
                match dispatch.pending.pop_front() {
                    Some(next) => next,
                    None => {
                        dispatch.running = false;
                        return;
                    }
                }
            };
            self.deliver(&next);
        }
    }

    fn deliver(&self, event: &E) {
        let callbacks: Vec<(SubscriberId, Callback<E>)> = self
            .registry
            .entries()
            .iter()
            .map(|(id, callback)| (*id, Arc::clone(callback)))
            .collect();

        for (id, callback) in callbacks {
            if self.registry.contains(id) {
                callback(event);
            }
        }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registry.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Unblocks the registry if a callback panics mid-pass.
struct DispatchReset<'a, E>(&'a Registry<E>);

impl<E> Drop for DispatchReset<'_, E> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut dispatch = self.0.dispatch();
            dispatch.running = false;
            dispatch.pending.clear();
        }
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.registry.entries().len())
            .finish()
    }
}

// =============================================================================
// Subscription Guard
// =============================================================================

/// Keeps one callback registered for as long as it lives.
///
/// Holds only a weak reference to the registry: a subscription never keeps
/// a store alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriberId,
    registry: Weak<dyn Unsubscribe>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Returns true while the registry this subscription belongs to is
    /// alive. A live guard is always registered, so this turns false only
    /// once the store has been dropped.
    pub fn is_active(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Unsubscribes now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.unsubscribe(self.id) {
                trace!(subscriber = self.id, "subscriber released");
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&u32) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move |_: &u32| {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_notify_reaches_every_subscriber() {
        let subscribers = Subscribers::<u32>::new();
        let (a, on_a) = counter();
        let (b, on_b) = counter();
        let _sa = subscribers.subscribe(on_a);
        let _sb = subscribers.subscribe(on_b);

        subscribers.notify(&7);

        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let subscribers = Subscribers::<u32>::new();
        let (count, on_event) = counter();
        let subscription = subscribers.subscribe(on_event);
        assert_eq!(subscribers.len(), 1);

        drop(subscription);
        subscribers.notify(&1);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn test_drop_releases_captured_state() {
        let subscribers = Subscribers::<u32>::new();
        let captured = Arc::new(());
        let held = Arc::clone(&captured);
        let subscription = subscribers.subscribe(move |_| drop(Arc::clone(&held)));
        assert_eq!(Arc::strong_count(&captured), 2);

        subscription.unsubscribe();
        assert_eq!(Arc::strong_count(&captured), 1);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let subscribers = Subscribers::<u32>::new();
        let (_count, on_event) = counter();
        let subscription = subscribers.subscribe(on_event);

        assert!(subscription.is_active());

        drop(subscribers);
        assert!(!subscription.is_active());
        drop(subscription);
    }

    #[test]
    fn test_subscriber_removed_mid_pass_is_skipped() {
        let subscribers = Arc::new(Subscribers::<u32>::new());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let (late, on_late) = counter();

        let slot_for_first = Arc::clone(&slot);
        let _first = subscribers.subscribe(move |_| {
            slot_for_first.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(subscribers.subscribe(on_late));

        subscribers.notify(&1);

        assert_eq!(late.load(Ordering::SeqCst), 0);
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn test_nested_notify_is_delivered_after_current_pass() {
        let subscribers = Arc::new(Subscribers::<u32>::new());
        let seen: Arc<Mutex<Vec<(char, u32)>>> = Arc::new(Mutex::new(Vec::new()));

        let nested = Arc::downgrade(&subscribers);
        let seen_a = Arc::clone(&seen);
        let _a = subscribers.subscribe(move |event: &u32| {
            seen_a.lock().unwrap().push(('a', *event));
            if *event == 1 {
                if let Some(subscribers) = nested.upgrade() {
                    subscribers.notify(&2);
                }
            }
        });
        let seen_b = Arc::clone(&seen);
        let _b = subscribers.subscribe(move |event: &u32| {
            seen_b.lock().unwrap().push(('b', *event));
        });

        subscribers.notify(&1);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![('a', 1), ('b', 1), ('a', 2), ('b', 2)]
        );
    }

    #[test]
    fn test_panicking_callback_does_not_block_later_notifications() {
        let subscribers = Subscribers::<u32>::new();
        let (count, on_event) = counter();
        let _panics = subscribers.subscribe(|event: &u32| {
            if *event == 0 {
                panic!("render failed");
            }
        });
        let _counts = subscribers.subscribe(on_event);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            subscribers.notify(&0);
        }));
        assert!(result.is_err());

        subscribers.notify(&1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
