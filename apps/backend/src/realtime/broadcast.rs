//! Broadcast channel - the only write path from the server to observers

use std::sync::Arc;

use super::registry::{Mailbox, Observer, ObserverId, ObserverRegistry};
use crate::errors::DeliveryError;
use crate::models::domain::Snapshot;

/// Result of handing one snapshot to one observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The observer already holds the same or a newer snapshot
    Stale,
}

/// Per-broadcast tally
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub stale: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct Broadcaster {
    registry: ObserverRegistry,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            registry: ObserverRegistry::new(),
        }
    }

    /// Register a new observer for all future snapshots
    pub async fn connect(&self) -> Observer {
        let observer = self.registry.register().await;
        log::info!(
            "Observer {} connected ({} total)",
            observer.id(),
            self.registry.len().await
        );
        observer
    }

    /// Stop all deliveries to an observer. Safe to call more than once.
    pub async fn disconnect(&self, id: ObserverId) -> bool {
        let removed = self.registry.remove(id).await;
        if removed {
            log::info!(
                "Observer {} disconnected ({} remaining)",
                id,
                self.registry.len().await
            );
        }
        removed
    }

    pub async fn observer_count(&self) -> usize {
        self.registry.len().await
    }

    /// Deliver a snapshot to every observer registered when the call starts.
    /// A failed delivery prunes that observer and does not affect the others.
    pub async fn broadcast(&self, snapshot: Arc<Snapshot>) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (id, mailbox) in self.registry.mailboxes().await {
            match deliver(id, &mailbox, &snapshot) {
                Ok(Delivery::Delivered) => report.delivered += 1,
                Ok(Delivery::Stale) => report.stale += 1,
                Err(e) => {
                    log::warn!("Snapshot {} not delivered: {}", snapshot.sequence, e);
                    report.failed += 1;
                    self.registry.remove(id).await;
                }
            }
        }

        log::debug!(
            "Broadcast snapshot {} ({} tasks): {:?}",
            snapshot.sequence,
            snapshot.tasks.len(),
            report
        );
        report
    }

    /// Deliver a snapshot to a single observer
    pub async fn send_to(
        &self,
        id: ObserverId,
        snapshot: Arc<Snapshot>,
    ) -> Result<Delivery, DeliveryError> {
        let mailbox = self
            .registry
            .mailbox(id)
            .await
            .ok_or(DeliveryError::UnknownObserver { observer_id: id })?;

        let result = deliver(id, &mailbox, &snapshot);
        if result.is_err() {
            self.registry.remove(id).await;
        }
        result
    }
}

/// Put `snapshot` in the mailbox unless it already holds something at least as new
fn deliver(
    id: ObserverId,
    mailbox: &Mailbox,
    snapshot: &Arc<Snapshot>,
) -> Result<Delivery, DeliveryError> {
    if mailbox.is_closed() {
        return Err(DeliveryError::ObserverClosed { observer_id: id });
    }

    let replaced = mailbox.send_if_modified(|slot| {
        let stale = slot
            .as_ref()
            .is_some_and(|current| current.sequence >= snapshot.sequence);
        if !stale {
            *slot = Some(snapshot.clone());
        }
        !stale
    });

    Ok(if replaced {
        Delivery::Delivered
    } else {
        Delivery::Stale
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::ObserverState;

    fn snapshot(sequence: u64) -> Arc<Snapshot> {
        Arc::new(Snapshot::new(sequence, vec![]))
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_observer() {
        let broadcaster = Broadcaster::new();
        let mut a = broadcaster.connect().await;
        let mut b = broadcaster.connect().await;

        let report = broadcaster.broadcast(snapshot(1)).await;
        assert_eq!(report.delivered, 2);

        assert_eq!(a.next_snapshot().await.unwrap().sequence, 1);
        assert_eq!(b.next_snapshot().await.unwrap().sequence, 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_dropped() {
        let broadcaster = Broadcaster::new();
        let mut observer = broadcaster.connect().await;

        broadcaster.broadcast(snapshot(5)).await;
        let report = broadcaster.broadcast(snapshot(3)).await;

        assert_eq!(report.stale, 1);
        assert_eq!(observer.next_snapshot().await.unwrap().sequence, 5);
        assert_eq!(observer.latest().unwrap().sequence, 5);
    }

    #[tokio::test]
    async fn test_slow_observer_only_sees_latest() {
        let broadcaster = Broadcaster::new();
        let mut observer = broadcaster.connect().await;

        for sequence in 1..=4 {
            broadcaster.broadcast(snapshot(sequence)).await;
        }

        assert_eq!(observer.next_snapshot().await.unwrap().sequence, 4);
    }

    #[tokio::test]
    async fn test_closed_observer_is_pruned_without_affecting_others() {
        let broadcaster = Broadcaster::new();
        let closed = broadcaster.connect().await;
        let mut open = broadcaster.connect().await;
        drop(closed);

        let report = broadcaster.broadcast(snapshot(1)).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(broadcaster.observer_count().await, 1);
        assert_eq!(open.next_snapshot().await.unwrap().sequence, 1);
    }

    #[tokio::test]
    async fn test_disconnect_stops_deliveries() {
        let broadcaster = Broadcaster::new();
        let mut observer = broadcaster.connect().await;

        assert!(broadcaster.disconnect(observer.id()).await);
        assert!(!broadcaster.disconnect(observer.id()).await);

        let report = broadcaster.broadcast(snapshot(1)).await;
        assert_eq!(report, DeliveryReport::default());
        assert!(observer.next_snapshot().await.is_none());
        assert_eq!(observer.state(), ObserverState::Disconnected);
    }

    #[tokio::test]
    async fn test_send_to_unknown_observer() {
        let broadcaster = Broadcaster::new();
        let observer = broadcaster.connect().await;
        let id = observer.id();
        broadcaster.disconnect(id).await;

        let result = broadcaster.send_to(id, snapshot(1)).await;
        assert_eq!(
            result,
            Err(DeliveryError::UnknownObserver { observer_id: id })
        );
    }
}
