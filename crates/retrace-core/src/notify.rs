//! Error classification and user-facing notifications.
//!
//! Failures are classified before display: a `Typed` failure supplies its
//! message verbatim, anything else resolves generic text from the localized
//! catalog. The technical detail of a generic failure is logged locally and
//! never shown.

use crate::bus::{BusMessage, MessageBus};
use crate::error::{EngineError, ERROR_ENGINE};

/// Catalog key for the session-expired text.
pub const ERROR_SESSION_EXPIRED: &str = "error_session_expired";

/// Localized message lookup, keyed like the extension's message catalog.
/// Substitutions are positional: `$1`, `$2`, ...
pub trait MessageCatalog: Send + Sync {
    fn message(&self, key: &str, substitutions: &[&str]) -> Option<String>;

    /// Display name for an engine, from the `engine_<id>` catalog entry.
    /// Falls back to the raw id for engines the catalog does not know.
    fn engine_name(&self, engine_id: &str) -> String {
        self.message(&format!("engine_{engine_id}"), &[])
            .unwrap_or_else(|| engine_id.to_string())
    }
}

/// Built-in English catalog, used when the host supplies no localization.
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn message(&self, key: &str, substitutions: &[&str]) -> Option<String> {
        let template = match key {
            "engine_pinterest" => "Pinterest",
            ERROR_ENGINE => "$1 encountered an error while searching. Try again later.",
            ERROR_SESSION_EXPIRED => "The $1 search session has expired. Please search again.",
            "error_image_size" => "$1 only supports image files up to $2",
            _ => return None,
        };

        let mut message = template.to_string();
        for (index, value) in substitutions.iter().enumerate() {
            message = message.replace(&format!("${}", index + 1), value);
        }
        Some(message)
    }
}

/// Notification payload derived from a failure.
///
/// Exactly one of `message` and `error_id` is set: Typed failures pass their
/// message through, everything else gets catalog text for the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineNotice {
    pub message: Option<String>,
    pub error_id: Option<String>,
}

impl EngineNotice {
    /// Notice resolving generic catalog text for `error_id`.
    pub fn for_error_id(error_id: impl Into<String>) -> Self {
        Self {
            message: None,
            error_id: Some(error_id.into()),
        }
    }
}

/// Map a failure to its notification payload.
pub fn classify(error: &EngineError) -> EngineNotice {
    match error {
        EngineError::Typed { message } => EngineNotice {
            message: Some(message.clone()),
            error_id: None,
        },
        EngineError::Generic { error_id } => EngineNotice::for_error_id(error_id.clone()),
    }
}

/// Deliver a fire-and-forget error notification for `engine_id`.
///
/// Without a literal message, the text comes from the catalog entry for the
/// notice's error id, interpolating the engine's display name.
pub async fn show_engine_error(
    bus: &dyn MessageBus,
    catalog: &dyn MessageCatalog,
    notice: EngineNotice,
    engine_id: &str,
) {
    let message = match notice.message {
        Some(message) => message,
        None => {
            let key = notice.error_id.as_deref().unwrap_or(ERROR_ENGINE);
            let engine_name = catalog.engine_name(engine_id);
            catalog
                .message(key, &[&engine_name])
                .unwrap_or_else(|| format!("Search with {engine_name} failed"))
        }
    };

    let notification = BusMessage::Notification {
        message,
        kind: format!("{engine_id}Error"),
    };
    if let Err(err) = bus.send(notification).await {
        tracing::warn!("failed to deliver notification: {err}");
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

    #[test]
    fn typed_failures_pass_their_message_through() {
        let notice = classify(&EngineError::typed("too large"));
        assert_eq!(notice.message.as_deref(), Some("too large"));
        assert!(notice.error_id.is_none());
    }

    #[test]
    fn generic_failures_carry_only_the_error_id() {
        let notice = classify(&EngineError::Generic {
            error_id: ERROR_ENGINE.to_string(),
        });
        assert!(notice.message.is_none());
        assert_eq!(notice.error_id.as_deref(), Some(ERROR_ENGINE));
    }

    #[test]
    fn catalog_interpolates_positional_substitutions() {
        let message = EnglishCatalog
            .message("error_image_size", &["Pinterest", "1 MB"])
            .unwrap();
        assert_eq!(message, "Pinterest only supports image files up to 1 MB");
    }

    #[test]
    fn engine_name_falls_back_to_the_raw_id() {
        assert_eq!(EnglishCatalog.engine_name("pinterest"), "Pinterest");
        assert_eq!(EnglishCatalog.engine_name("unknownEngine"), "unknownEngine");
    }

    #[tokio::test]
    async fn literal_message_is_delivered_verbatim() {
        let bus = RecordingBus::default();
        let notice = classify(&EngineError::typed("custom text"));

        show_engine_error(&bus, &EnglishCatalog, notice, "pinterest").await;

        let sent = bus.sent.lock().await;
        assert_eq!(
            *sent,
            vec![BusMessage::Notification {
                message: "custom text".to_string(),
                kind: "pinterestError".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn generic_notice_resolves_catalog_text_with_engine_name() {
        let bus = RecordingBus::default();
        let notice = EngineNotice::for_error_id(ERROR_ENGINE);

        show_engine_error(&bus, &EnglishCatalog, notice, "pinterest").await;

        let sent = bus.sent.lock().await;
        assert_eq!(
            *sent,
            vec![BusMessage::Notification {
                message: "Pinterest encountered an error while searching. Try again later."
                    .to_string(),
                kind: "pinterestError".to_string(),
            }]
        );
    }
}
