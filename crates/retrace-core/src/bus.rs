//! Injected host channels: the inter-process message bus and the
//! large-payload transfer path.
//!
//! The pipeline never talks to the browser directly. It is handed three
//! narrow collaborators - a request/response bus, a transfer channel for
//! records with large binary payloads, and a gate that resolves once the
//! hosting document has finished loading - so tests substitute in-memory
//! fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::ImageRecord;

/// Messages exchanged with the coordinating process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BusMessage {
    /// Request a transient storage entry by key.
    StorageRequest { storage_id: String },
    /// Acknowledge consumption of transient storage entries for eviction.
    StorageReceipt { storage_ids: Vec<String> },
    /// User-facing notification event.
    Notification {
        message: String,
        #[serde(rename = "type")]
        kind: String,
    },
}

/// Request/response and fire-and-forget delivery to the coordinating
/// process.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Single in-flight round trip. `None` means the peer had nothing for
    /// this key.
    async fn request(&self, message: BusMessage) -> Result<Option<serde_json::Value>>;

    /// Fire-and-forget delivery.
    async fn send(&self, message: BusMessage) -> Result<()>;
}

/// Response-transferring channel for image records.
///
/// Records may contain large binary payloads and must be delivered via a
/// large-message-safe path rather than the standard bus.
#[async_trait]
pub trait TransferChannel: Send + Sync {
    async fn request_image(&self, message: BusMessage) -> Result<Option<ImageRecord>>;
}

/// Resolves once the hosting document has finished loading. The pipeline
/// itself performs no polling.
#[async_trait]
pub trait LoadGate: Send + Sync {
    async fn wait_ready(&self);
}

/// Gate for contexts that are already loaded (headless runs and tests).
pub struct ReadyGate;

#[async_trait]
impl LoadGate for ReadyGate {
    async fn wait_ready(&self) {}
}
