//! Synchronous fan-out of stats updates.
//!
//! Listeners are called in subscription order, once per published update,
//! on the publishing thread. The listener list is copied out before any
//! listener runs, so a listener may subscribe, unsubscribe, or trigger
//! another publish without deadlocking. Changes made during a delivery round
//! take effect from the next round.

use crate::store::ComponentStat;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback receiving the full stats list after each change.
pub type Listener = Arc<dyn Fn(&[ComponentStat]) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// List of stats listeners with removal by handle.
#[derive(Default)]
pub struct SubscriptionBus {
    registry: Arc<Mutex<Registry>>,
}

impl SubscriptionBus {
    /// Create a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registering the same closure twice delivers twice.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[ComponentStat]) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `stats` to every current listener.
    pub fn publish(&self, stats: &[ComponentStat]) {
        let listeners: Vec<Listener> = self
            .registry
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &listeners {
            listener(stats);
        }
    }

    /// Drop every listener. Outstanding handles become no-ops.
    pub fn clear(&self) {
        self.registry.lock().listeners.clear();
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().listeners.is_empty()
    }
}

impl fmt::Debug for SubscriptionBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionBus")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by [`SubscriptionBus::subscribe`].
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
#[must_use = "the listener stays registered until `unsubscribe` is called"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the listener. Safe after the bus was cleared or dropped.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }

    /// Identifier of the listener within its bus.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&[ComponentStat]) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        (count, move |_: &[ComponentStat]| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_publish_reaches_every_listener() {
        let bus = SubscriptionBus::new();
        let (a, listener_a) = counter();
        let (b, listener_b) = counter();
        let _sub_a = bus.subscribe(listener_a);
        let _sub_b = bus.subscribe(listener_b);

        bus.publish(&[]);
        bus.publish(&[]);

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = SubscriptionBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let subs: Vec<_> = (0..3)
            .map(|i| {
                let order = Arc::clone(&order);
                bus.subscribe(move |_| order.lock().push(i))
            })
            .collect();

        bus.publish(&[]);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = SubscriptionBus::new();
        let (count, listener) = counter();
        let sub = bus.subscribe(listener);

        bus.publish(&[]);
        sub.unsubscribe();
        bus.publish(&[]);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_unsubscribe_removes_only_its_listener() {
        let bus = SubscriptionBus::new();
        let (a, listener_a) = counter();
        let (b, listener_b) = counter();
        let sub_a = bus.subscribe(listener_a);
        let _sub_b = bus.subscribe(listener_b);

        sub_a.unsubscribe();
        bus.publish(&[]);

        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_clear_and_drop() {
        let bus = SubscriptionBus::new();
        let (_, listener) = counter();
        let first = bus.subscribe(listener);
        bus.clear();
        first.unsubscribe();

        let (_, listener) = counter();
        let second = bus.subscribe(listener);
        drop(bus);
        second.unsubscribe();
    }

    #[test]
    fn test_duplicate_subscriptions_are_independent() {
        let bus = SubscriptionBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let make = || {
            let count = Arc::clone(&count);
            move |_: &[ComponentStat]| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };
        let first = bus.subscribe(make());
        let second = bus.subscribe(make());
        assert_ne!(first.id(), second.id());

        bus.publish(&[]);
        first.unsubscribe();
        bus.publish(&[]);

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_listener_may_subscribe_during_delivery() {
        let bus = Arc::new(SubscriptionBus::new());
        let inner_bus = Arc::clone(&bus);
        let _sub = bus.subscribe(move |_| {
            let _nested = inner_bus.subscribe(|_| {});
        });

        bus.publish(&[]);
        assert_eq!(bus.len(), 2);
    }
}
