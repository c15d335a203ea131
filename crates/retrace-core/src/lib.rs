//! Retrace Core - Search-task execution pipeline for reverse image search
//!
//! This crate contains the client-side orchestration for the Retrace
//! extension, including:
//! - Task/image retrieval from transient storage (exactly-once consumption)
//! - Size-constrained image adaptation ahead of an engine upload
//! - Engine clients (Pinterest as the reference provider)
//! - Error classification and user-facing notifications
//!
//! Host-side collaborators (the message bus, the image re-encoding engine,
//! the localization catalog) are injected as trait objects so the pipeline
//! runs against in-memory fakes in tests.

pub mod adapter;
pub mod bus;
pub mod engine;
pub mod error;
pub mod inject;
pub mod notify;
pub mod orchestrator;
pub mod receipt;
pub mod types;

pub use adapter::{prepare_image_for_upload, AdaptOptions, ImageCodec};
pub use bus::{BusMessage, LoadGate, MessageBus, ReadyGate, TransferChannel};
pub use engine::pinterest::PinterestClient;
pub use engine::{builtin_engines, EngineSpec, SearchEngine, SearchInput};
pub use error::EngineError;
pub use notify::{classify, show_engine_error, EngineNotice, EnglishCatalog, MessageCatalog};
pub use orchestrator::{SearchOrchestrator, SearchOutcome};
pub use receipt::ReceiptTracker;
pub use types::{ImageRecord, Receipt, SearchHit, SearchSpec, SearchTask};
