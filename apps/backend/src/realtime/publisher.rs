//! Snapshot publisher - turns "the task collection changed" into a delivered snapshot

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::broadcast::{Broadcaster, Delivery, DeliveryReport};
use super::registry::ObserverId;
use crate::db::TaskStore;
use crate::errors::{DeliveryError, Result};
use crate::models::domain::Snapshot;

pub struct SnapshotPublisher {
    store: Arc<dyn TaskStore>,
    broadcaster: Arc<Broadcaster>,
    /// Last sequence handed out. Held across the store read so sequence order matches read order.
    sequence: Mutex<u64>,
}

impl SnapshotPublisher {
    pub fn new(store: Arc<dyn TaskStore>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            store,
            broadcaster,
            sequence: Mutex::new(0),
        }
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// Read every task and stamp the result with the next sequence number
    async fn take_snapshot(&self) -> Result<Arc<Snapshot>> {
        let mut sequence = self.sequence.lock().await;
        let tasks = self.store.find_tasks(None).await?;
        *sequence += 1;
        Ok(Arc::new(Snapshot::new(*sequence, tasks)))
    }

    /// Publish the current task collection to every observer.
    /// If the store read fails nothing is sent.
    pub async fn publish(&self) -> Result<DeliveryReport> {
        let snapshot = self.take_snapshot().await?;
        Ok(self.broadcaster.broadcast(snapshot).await)
    }

    /// Publish the current task collection to one observer (used when it joins)
    pub async fn publish_to(
        &self,
        id: ObserverId,
    ) -> Result<std::result::Result<Delivery, DeliveryError>> {
        let snapshot = self.take_snapshot().await?;
        Ok(self.broadcaster.send_to(id, snapshot).await)
    }

    /// Publish on a background task. Failures are logged and never reach the caller.
    pub fn spawn_publish(self: &Arc<Self>, reason: &'static str) -> JoinHandle<()> {
        let publisher = Arc::clone(self);
        tokio::spawn(async move {
            match publisher.publish().await {
                Ok(report) => {
                    log::debug!("Published snapshot after {}: {:?}", reason, report);
                }
                Err(e) => {
                    log::error!("Failed to publish snapshot after {}: {}", reason, e);
                }
            }
        })
    }
}
