//! Search engine contract and the built-in engine catalog.
//!
//! Every engine client implements the same interface: session + search +
//! image in, ordered hits out, or a failure. The request shape and response
//! parsing are provider-specific; everything else about a client is
//! stateless and side-effect-free beyond the network call.

pub mod pinterest;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::EngineError;
use crate::types::{ImageRecord, SearchHit, SearchSpec};

/// Input handed to every engine client for one search.
#[derive(Debug, Clone)]
pub struct SearchInput {
    /// Opaque session data from the task.
    pub session: serde_json::Value,
    pub search: SearchSpec,
    /// The (possibly adapted) image to upload.
    pub image: ImageRecord,
    /// Transient storage keys backing this task.
    pub storage_ids: Vec<String>,
}

/// One search provider: builds a provider-specific upload request from an
/// image and returns normalized results in the provider's relevance order.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, input: &SearchInput) -> Result<Vec<SearchHit>, EngineError>;

    /// Engine identifier (e.g. "pinterest").
    fn engine_id(&self) -> &'static str;
}

/// Upload constraints and display data for one engine.
#[derive(Debug, Clone)]
pub struct EngineSpec {
    pub id: String,
    /// Display fallback when the catalog has no localized name.
    pub name: String,
    /// Engine-wide upload ceiling in bytes, `None` when unconstrained.
    pub max_upload_size: Option<u64>,
    /// Per-sub-target ceilings overriding `max_upload_size`.
    pub target_limits: HashMap<String, u64>,
}

impl EngineSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_upload_size: Option<u64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_upload_size,
            target_limits: HashMap::new(),
        }
    }

    /// Spec for an engine the catalog does not know: no upload ceiling.
    pub fn unconstrained(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = id.clone();
        Self::new(id, name, None)
    }

    /// Resolve the upload ceiling for an optional sub-target. A sub-target
    /// limit overrides the engine-wide one.
    pub fn upload_limit(&self, target: Option<&str>) -> Option<u64> {
        target
            .and_then(|t| self.target_limits.get(t).copied())
            .or(self.max_upload_size)
    }
}

/// Built-in engine catalog.
pub fn builtin_engines() -> Vec<EngineSpec> {
    vec![EngineSpec::new(
        "pinterest",
        "Pinterest",
        Some(10 * 1024 * 1024),
    )]
}

/// Look up a built-in engine by id.
pub fn engine_spec(id: &str) -> Option<EngineSpec> {
    builtin_engines().into_iter().find(|engine| engine.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_limit_overrides_engine_limit() {
        let mut spec = EngineSpec::new("pinterest", "Pinterest", Some(10 * 1024 * 1024));
        spec.target_limits.insert("board".to_string(), 1024);

        assert_eq!(spec.upload_limit(None), Some(10 * 1024 * 1024));
        assert_eq!(spec.upload_limit(Some("board")), Some(1024));
        assert_eq!(spec.upload_limit(Some("missing")), Some(10 * 1024 * 1024));
    }

    #[test]
    fn unconstrained_engine_has_no_limit() {
        let spec = EngineSpec::unconstrained("someEngine");
        assert_eq!(spec.upload_limit(None), None);
        assert_eq!(spec.upload_limit(Some("anything")), None);
    }

    #[test]
    fn builtin_catalog_contains_the_reference_engine() {
        let spec = engine_spec("pinterest").unwrap();
        assert_eq!(spec.name, "Pinterest");
        assert!(spec.max_upload_size.is_some());
        assert!(engine_spec("nope").is_none());
    }
}
