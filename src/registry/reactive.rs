//! Snapshot-publishing registry.
//!
//! Contributions are folded one at a time into a new immutable snapshot,
//! which replaces the previous one and is published to every subscriber.
//!
//! ```text
//! register(item) ──► fold(prev, item) ──► Arc<State> ──► watch channel ──► Subscription
//! ```
//!
//! The channel keeps only the latest snapshot. A new subscriber receives it
//! immediately; an existing subscriber that falls behind skips straight to
//! the newest snapshot, never to an older one.

use crate::registry::error::RegistryResult;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// The single extension point of a [`ReactiveRegistry`]: how a contribution
/// turns the previous snapshot into the next one.
pub trait RegistryFold: Send + Sync {
    /// A contribution passed to [`ReactiveRegistry::register`].
    type Item;
    /// The published snapshot type.
    type State: Send + Sync;

    /// Produce the next snapshot. An error rejects the contribution and
    /// leaves the current snapshot in place.
    fn fold(&self, previous: &Self::State, item: Self::Item) -> RegistryResult<Self::State>;
}

/// Append-only registry publishing immutable snapshots.
pub struct ReactiveRegistry<F: RegistryFold> {
    fold: F,
    sender: watch::Sender<Arc<F::State>>,
}

impl<F: RegistryFold> ReactiveRegistry<F> {
    /// Create a registry whose first snapshot is `initial`.
    pub fn new(fold: F, initial: F::State) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self { fold, sender }
    }

    /// Fold a contribution into the registry.
    ///
    /// Works with or without subscribers. On error, the contribution is
    /// dropped and the error returned; subscribers see nothing.
    pub fn register(&self, item: F::Item) -> RegistryResult<()> {
        let mut outcome = Ok(());
        let fold = &self.fold;
        self.sender.send_if_modified(|state| match fold.fold(state, item) {
            Ok(next) => {
                *state = Arc::new(next);
                true
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });

        if let Err(e) = &outcome {
            tracing::warn!("Registry contribution rejected: {}", e);
        }
        outcome
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<F::State> {
        self.sender.borrow().clone()
    }

    /// Resolve with the latest snapshot.
    pub async fn state(&self) -> Arc<F::State> {
        let mut subscription = self.subscribe();
        match subscription.next().await {
            Some(state) => state,
            None => self.snapshot(),
        }
    }

    /// Subscribe to snapshots, starting with the current one.
    pub fn subscribe(&self) -> Subscription<F::State> {
        Subscription {
            receiver: self.sender.subscribe(),
            primed: false,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn fold(&self) -> &F {
        &self.fold
    }
}

impl<F: RegistryFold> fmt::Debug for ReactiveRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveRegistry")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A stream of registry snapshots.
///
/// The first call to [`Subscription::next`] resolves immediately with the
/// snapshot current at that time. Dropping the subscription unsubscribes.
pub struct Subscription<S> {
    receiver: watch::Receiver<Arc<S>>,
    primed: bool,
}

impl<S> Subscription<S> {
    /// Wait for the next snapshot. Returns `None` once the registry is dropped.
    pub async fn next(&mut self) -> Option<Arc<S>> {
        if !self.primed {
            self.primed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// The latest snapshot, marking it as seen.
    pub fn latest(&mut self) -> Arc<S> {
        self.primed = true;
        self.receiver.borrow_and_update().clone()
    }

    /// Whether a snapshot newer than the last one seen is available.
    pub fn has_pending(&self) -> bool {
        !self.primed || self.receiver.has_changed().unwrap_or(false)
    }
}

impl<S> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("primed", &self.primed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::error::RegistryError;

    /// Collects strings; rejects empty ones.
    struct ListFold;

    impl RegistryFold for ListFold {
        type Item = String;
        type State = Vec<String>;

        fn fold(&self, previous: &Vec<String>, item: String) -> RegistryResult<Vec<String>> {
            if item.is_empty() {
                return Err(RegistryError::Rejected {
                    source_id: "test".to_string(),
                    reason: "empty".to_string(),
                });
            }
            let mut next = previous.clone();
            next.push(item);
            Ok(next)
        }
    }

    fn registry() -> ReactiveRegistry<ListFold> {
        ReactiveRegistry::new(ListFold, Vec::new())
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_prior_registrations() {
        let registry = registry();
        registry.register("a".to_string()).unwrap();
        registry.register("b".to_string()).unwrap();

        let mut sub = registry.subscribe();
        let snapshot = sub.next().await.unwrap();
        assert_eq!(*snapshot, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_subscriber_receives_new_snapshots() {
        let registry = registry();
        let mut sub = registry.subscribe();
        assert!(sub.next().await.unwrap().is_empty());
        assert!(!sub.has_pending());

        registry.register("a".to_string()).unwrap();
        assert!(sub.has_pending());
        assert_eq!(*sub.next().await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_rejected_contribution_keeps_snapshot() {
        let registry = registry();
        registry.register("a".to_string()).unwrap();
        let before = registry.snapshot();

        assert!(registry.register(String::new()).is_err());
        let after = registry.state().await;
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_affect_others() {
        let registry = registry();
        let first = registry.subscribe();
        let mut second = registry.subscribe();
        assert_eq!(registry.subscriber_count(), 2);

        drop(first);
        registry.register("a".to_string()).unwrap();
        assert_eq!(registry.subscriber_count(), 1);
        assert_eq!(*second.next().await.unwrap(), vec!["a"]);
    }

    #[test]
    fn test_register_without_subscribers() {
        let registry = registry();
        assert_eq!(registry.subscriber_count(), 0);
        registry.register("a".to_string()).unwrap();
        assert_eq!(*registry.snapshot(), vec!["a"]);
    }
}
