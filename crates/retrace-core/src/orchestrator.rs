//! Top-level search pipeline: fetch task, fetch image, adapt, invoke the
//! engine, classify the outcome, acknowledge, notify.
//!
//! One logical task per `run` invocation, strictly sequential awaits, no
//! retries. A missing task or image is an expected outcome, not an error;
//! every failure path sends the storage receipt and exactly one
//! notification before the error is returned to the caller.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::{prepare_image_for_upload, AdaptOptions, ImageCodec};
use crate::bus::{BusMessage, LoadGate, MessageBus, TransferChannel};
use crate::engine::{EngineSpec, SearchEngine, SearchInput};
use crate::error::EngineError;
use crate::notify::{classify, show_engine_error, EngineNotice, MessageCatalog, ERROR_SESSION_EXPIRED};
use crate::receipt::ReceiptTracker;
use crate::types::{ImageRecord, SearchHit, SearchTask};

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The engine resolved with results, in provider order. Display is the
    /// caller's job.
    Completed(Vec<SearchHit>),
    /// The task or its image was gone from transient storage.
    Expired,
}

/// Executes queued search tasks against an engine client.
///
/// Collaborators are injected: the request/response bus, the large-payload
/// transfer channel, the document-load gate, the image codec, and the
/// localization catalog.
pub struct SearchOrchestrator {
    bus: Arc<dyn MessageBus>,
    transfer: Arc<dyn TransferChannel>,
    load_gate: Arc<dyn LoadGate>,
    codec: Arc<dyn ImageCodec>,
    catalog: Arc<dyn MessageCatalog>,
    engines: Vec<EngineSpec>,
}

impl SearchOrchestrator {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        transfer: Arc<dyn TransferChannel>,
        load_gate: Arc<dyn LoadGate>,
        codec: Arc<dyn ImageCodec>,
        catalog: Arc<dyn MessageCatalog>,
    ) -> Self {
        Self {
            bus,
            transfer,
            load_gate,
            codec,
            catalog,
            engines: crate::engine::builtin_engines(),
        }
    }

    /// Replace the built-in engine catalog (upload ceilings, sub-targets).
    pub fn with_engines(mut self, engines: Vec<EngineSpec>) -> Self {
        self.engines = engines;
        self
    }

    /// Execute one queued search task end to end.
    ///
    /// A missing task or image ends the run as [`SearchOutcome::Expired`]
    /// after a session-expired notification. Adaptation and engine failures
    /// send the receipt, emit one classified notification, and come back as
    /// the error so the caller can log or escalate. On success no receipt is
    /// sent here: success-path eviction belongs to the task issuer.
    pub async fn run(
        &self,
        engine: &dyn SearchEngine,
        engine_id: &str,
        task_id: &str,
    ) -> Result<SearchOutcome, EngineError> {
        self.load_gate.wait_ready().await;

        let task = match self.fetch_task(task_id).await {
            Ok(task) => task,
            Err(err) => return self.fail(engine_id, &mut ReceiptTracker::new(), err).await,
        };
        let Some(task) = task else {
            debug!(task_id, "task gone from storage, session expired");
            self.notify_session_expired(engine_id).await;
            return Ok(SearchOutcome::Expired);
        };

        // Keys are captured before the image response is examined so any
        // later failure still triggers cleanup.
        let image_id = task.image_id.clone();
        let mut receipt = ReceiptTracker::new();
        receipt.record(task_id, &image_id);

        let image = match self.fetch_image(&image_id).await {
            Ok(image) => image,
            Err(err) => return self.fail(engine_id, &mut receipt, err).await,
        };
        let Some(image) = image else {
            debug!(task_id, image_id, "image gone from storage, session expired");
            receipt.send(self.bus.as_ref()).await;
            self.notify_session_expired(engine_id).await;
            return Ok(SearchOutcome::Expired);
        };

        let image = if task.search.asset_type == "image" {
            let spec = self.engine_spec(engine_id);
            let opts = AdaptOptions {
                set_blob: true,
                ..Default::default()
            };
            match prepare_image_for_upload(
                image,
                &spec,
                &opts,
                self.codec.as_ref(),
                self.catalog.as_ref(),
            )
            .await
            {
                Ok(image) => image,
                Err(err) => return self.fail(engine_id, &mut receipt, err).await,
            }
        } else {
            image
        };

        let input = SearchInput {
            session: task.session,
            search: task.search,
            image,
            storage_ids: vec![task_id.to_string(), image_id],
        };
        match engine.search(&input).await {
            Ok(hits) => {
                debug!(engine = engine_id, hits = hits.len(), "search completed");
                Ok(SearchOutcome::Completed(hits))
            }
            Err(err) => self.fail(engine_id, &mut receipt, err).await,
        }
    }

    /// Failure path: receipt, classification, one notification, rethrow.
    async fn fail(
        &self,
        engine_id: &str,
        receipt: &mut ReceiptTracker,
        error: EngineError,
    ) -> Result<SearchOutcome, EngineError> {
        receipt.send(self.bus.as_ref()).await;
        show_engine_error(
            self.bus.as_ref(),
            self.catalog.as_ref(),
            classify(&error),
            engine_id,
        )
        .await;
        Err(error)
    }

    async fn notify_session_expired(&self, engine_id: &str) {
        show_engine_error(
            self.bus.as_ref(),
            self.catalog.as_ref(),
            EngineNotice::for_error_id(ERROR_SESSION_EXPIRED),
            engine_id,
        )
        .await;
    }

    async fn fetch_task(&self, task_id: &str) -> Result<Option<SearchTask>, EngineError> {
        let response = self
            .bus
            .request(BusMessage::StorageRequest {
                storage_id: task_id.to_string(),
            })
            .await
            .map_err(EngineError::generic)?;
        match response {
            Some(value) => {
                let task = serde_json::from_value(value).map_err(EngineError::generic)?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    async fn fetch_image(&self, image_id: &str) -> Result<Option<ImageRecord>, EngineError> {
        self.transfer
            .request_image(BusMessage::StorageRequest {
                storage_id: image_id.to_string(),
            })
            .await
            .map_err(EngineError::generic)
    }

    fn engine_spec(&self, engine_id: &str) -> EngineSpec {
        self.engines
            .iter()
            .find(|engine| engine.id == engine_id)
            .cloned()
            .unwrap_or_else(|| EngineSpec::unconstrained(engine_id))
    }
}
