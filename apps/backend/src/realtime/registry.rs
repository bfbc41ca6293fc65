//! Observer registry - the set of live snapshot subscribers

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::models::domain::Snapshot;

/// Single-slot mailbox holding the newest snapshot addressed to one observer
pub(crate) type Mailbox = Arc<watch::Sender<Option<Arc<Snapshot>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Connecting,
    Connected,
    Disconnected,
}

/// Connection-side handle of a registered observer
#[derive(Debug)]
pub struct Observer {
    id: ObserverId,
    state: ObserverState,
    snapshots: watch::Receiver<Option<Arc<Snapshot>>>,
}

impl Observer {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// Wait for the next snapshot newer than the last one seen.
    /// Returns `None` once the observer has been removed from the registry.
    pub async fn next_snapshot(&mut self) -> Option<Arc<Snapshot>> {
        if self.state == ObserverState::Disconnected {
            return None;
        }
        loop {
            if self.snapshots.changed().await.is_err() {
                self.state = ObserverState::Disconnected;
                return None;
            }
            if let Some(snapshot) = self.snapshots.borrow_and_update().clone() {
                return Some(snapshot);
            }
        }
    }

    /// Latest snapshot delivered to this observer, if any
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.snapshots.borrow().clone()
    }
}

/// Tracks connected observers. Owned by the broadcaster; nothing else mutates it.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: AtomicU64,
    observers: RwLock<HashMap<ObserverId, Mailbox>>,
}

impl ObserverRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a new observer and move it to `Connected`
    pub(crate) async fn register(&self) -> Observer {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let (tx, rx) = watch::channel(None);
        let mut observer = Observer {
            id,
            state: ObserverState::Connecting,
            snapshots: rx,
        };

        self.observers.write().await.insert(id, Arc::new(tx));
        observer.state = ObserverState::Connected;

        log::debug!("Observer {} registered", id);
        observer
    }

    /// Remove an observer. Returns false if it was already gone.
    pub(crate) async fn remove(&self, id: ObserverId) -> bool {
        let removed = self.observers.write().await.remove(&id).is_some();
        if removed {
            log::debug!("Observer {} removed", id);
        }
        removed
    }

    /// Copy of the current observer set, safe to iterate without holding the lock
    pub(crate) async fn mailboxes(&self) -> Vec<(ObserverId, Mailbox)> {
        self.observers
            .read()
            .await
            .iter()
            .map(|(id, mailbox)| (*id, mailbox.clone()))
            .collect()
    }

    pub(crate) async fn mailbox(&self, id: ObserverId) -> Option<Mailbox> {
        self.observers.read().await.get(&id).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn contains(&self, id: ObserverId) -> bool {
        self.observers.read().await.contains_key(&id)
    }

    pub(crate) async fn len(&self) -> usize {
        self.observers.read().await.len()
    }
}
