//! Engine failure types for the search pipeline.
//!
//! The variant is decided at the raise site: adaptation failures and local
//! protocol violations carry a user-facing message, anything unexpected
//! carries only a catalog error id. The notification layer never sees the
//! technical detail of a generic failure.

use thiserror::Error;

/// Catalog key for the generic "search failed" text.
pub const ERROR_ENGINE: &str = "error_engine";

/// A failed engine interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Failure with a user-facing message, shown verbatim.
    #[error("{message}")]
    Typed { message: String },
    /// Unexpected failure; only generic catalog text reaches the user.
    #[error("engine failure ({error_id})")]
    Generic { error_id: String },
}

impl EngineError {
    /// A failure whose message is shown to the user as-is.
    pub fn typed(message: impl Into<String>) -> Self {
        Self::Typed {
            message: message.into(),
        }
    }

    /// Wrap an unexpected failure. The technical detail is logged here for
    /// diagnostics and never transmitted to the notification layer.
    pub fn generic(detail: impl std::fmt::Display) -> Self {
        tracing::error!("engine failure: {detail}");
        Self::Generic {
            error_id: ERROR_ENGINE.to_string(),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        Self::generic(err)
    }
}
