//! Task and image data structures flowing through the search pipeline.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A queued unit of search work linking a session, a search specification,
/// and a target image.
///
/// Created by the upstream queuing process, identified by an opaque task id,
/// consumed exactly once by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTask {
    /// Opaque session data captured when the task was queued.
    pub session: serde_json::Value,
    pub search: SearchSpec,
    /// Transient storage key of the associated image record.
    pub image_id: String,
}

/// What to search for: the asset kind plus provider-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSpec {
    /// `"image"` assets go through size adaptation; other kinds bypass it.
    pub asset_type: String,
    /// Provider-specific parameters, passed through untouched.
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// An image held in transient storage, claimed by the orchestrator for the
/// duration of one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub data_url: String,
    /// Raw bytes, materialized from `data_url` on demand. Never sent over
    /// the standard bus; the transfer channel carries it when present.
    #[serde(skip)]
    pub blob: Option<Bytes>,
    pub filename: String,
    pub mime_type: String,
    pub byte_size: u64,
}

/// One engine-normalized result. Order within a result sequence is the
/// provider's relevance order; nothing re-sorts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub page_url: String,
    pub image_url: String,
    pub text: String,
}

/// Immutable snapshot of the transient storage keys consumed by one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Exactly `[task_id, image_id]` for the task that captured it.
    pub storage_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_task_uses_wire_field_names() {
        let task: SearchTask = serde_json::from_value(json!({
            "session": {"tabId": 7},
            "search": {"assetType": "image", "mustGetResult": false},
            "imageId": "i1"
        }))
        .unwrap();

        assert_eq!(task.image_id, "i1");
        assert_eq!(task.search.asset_type, "image");
        assert_eq!(task.search.params["mustGetResult"], json!(false));
    }

    #[test]
    fn image_record_blob_is_not_serialized() {
        let record = ImageRecord {
            data_url: "data:image/png;base64,AAAA".to_string(),
            blob: Some(Bytes::from_static(b"\x89PNG")),
            filename: "image.png".to_string(),
            mime_type: "image/png".to_string(),
            byte_size: 4,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("blob").is_none());
        assert_eq!(value["dataUrl"], json!("data:image/png;base64,AAAA"));
        assert_eq!(value["byteSize"], json!(4));
    }
}
