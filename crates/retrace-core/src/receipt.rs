//! Receipt tracking: acknowledging consumption of transient storage
//! entries exactly once per task.

use crate::bus::{BusMessage, MessageBus};
use crate::types::Receipt;

/// Tracks the storage keys claimed by one pipeline run and relinquishes
/// them back to the storage layer at most once.
///
/// The key set is captured as an immutable snapshot and cleared before the
/// send resolves, so a repeated call sends nothing.
#[derive(Debug, Default)]
pub struct ReceiptTracker {
    pending: Option<Receipt>,
}

impl ReceiptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the storage keys for this task. Called right after the image
    /// request is issued, before any further work, so any later failure
    /// still triggers cleanup.
    pub fn record(&mut self, task_id: &str, image_id: &str) {
        self.pending = Some(Receipt {
            storage_ids: vec![task_id.to_string(), image_id.to_string()],
        });
    }

    /// Fire the receipt, relinquishing the storage entries for eviction.
    ///
    /// Delivery is fire-and-forget; a bus failure is logged and the keys
    /// stay cleared, matching the idempotent contract seen by the caller.
    pub async fn send(&mut self, bus: &dyn MessageBus) {
        let Some(receipt) = self.pending.take() else {
            return;
        };
        let message = BusMessage::StorageReceipt {
            storage_ids: receipt.storage_ids,
        };
        if let Err(err) = bus.send(message).await {
            tracing::warn!("failed to send storage receipt: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingBus {
        sent: Mutex<Vec<BusMessage>>,
    }

    #[async_trait]
    impl MessageBus for RecordingBus {
        async fn request(&self, _message: BusMessage) -> Result<Option<serde_json::Value>> {
            Ok(None)
        }

        async fn send(&self, message: BusMessage) -> Result<()> {
            self.sent.lock().await.push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn sends_exactly_the_recorded_keys() {
        let bus = RecordingBus::default();
        let mut tracker = ReceiptTracker::new();
        tracker.record("t1", "i1");

        tracker.send(&bus).await;

        let sent = bus.sent.lock().await;
        assert_eq!(
            *sent,
            vec![BusMessage::StorageReceipt {
                storage_ids: vec!["t1".to_string(), "i1".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn repeated_send_is_a_no_op() {
        let bus = RecordingBus::default();
        let mut tracker = ReceiptTracker::new();
        tracker.record("t1", "i1");

        tracker.send(&bus).await;
        tracker.send(&bus).await;

        assert_eq!(bus.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn send_without_record_sends_nothing() {
        let bus = RecordingBus::default();
        let mut tracker = ReceiptTracker::new();

        tracker.send(&bus).await;

        assert!(bus.sent.lock().await.is_empty());
    }
}
