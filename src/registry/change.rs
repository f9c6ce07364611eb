//! Change notification plumbing shared by registry implementations.
//!
//! # Design Decisions
//! - Coarse-grained signal: "something changed", never a diff
//! - Subscriptions are RAII; dropping the handle unsubscribes
//! - Callbacks are cloned out of the subscriber map before invocation, so a
//!   callback may subscribe or unsubscribe without deadlocking on a shard

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Callback invoked after a registry publishes a new snapshot.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Dispatches coarse change signals to registered subscribers.
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Arc<DashMap<u64, ChangeCallback>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it fires on every change until the returned
    /// handle is dropped.
    pub fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, callback);
        SubscriptionHandle {
            id,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Invoke every current subscriber once.
    pub fn notify(&self) {
        let callbacks: Vec<ChangeCallback> = self
            .subscribers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// RAII change subscription; dropping it unsubscribes.
pub struct SubscriptionHandle {
    id: u64,
    subscribers: Arc<DashMap<u64, ChangeCallback>>,
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_reaches_subscribers() {
        let notifier = ChangeNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));

        let callback: ChangeCallback = {
            let count = count.clone();
            Arc::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _subscription = notifier.subscribe(callback);

        notifier.notify();
        notifier.notify();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let notifier = ChangeNotifier::new();
        let count = Arc::new(AtomicUsize::new(0));

        let callback: ChangeCallback = {
            let count = count.clone();
            Arc::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let subscription = notifier.subscribe(callback);
        assert_eq!(notifier.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(notifier.subscriber_count(), 0);

        notifier.notify();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_independent_subscriptions() {
        let notifier = ChangeNotifier::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let keep: ChangeCallback = {
            let first = first.clone();
            Arc::new(move || {
                first.fetch_add(1, Ordering::SeqCst);
            })
        };
        let dropped: ChangeCallback = {
            let second = second.clone();
            Arc::new(move || {
                second.fetch_add(1, Ordering::SeqCst);
            })
        };

        let _keep = notifier.subscribe(keep);
        let handle = notifier.subscribe(dropped);
        drop(handle);

        notifier.notify();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }
}
