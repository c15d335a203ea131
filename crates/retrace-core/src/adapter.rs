//! Size-constrained image adaptation ahead of an engine upload.
//!
//! Decides whether an image must be re-encoded to satisfy an engine's byte
//! ceiling and requests the conversion from the external codec. An image
//! that cannot be brought under the ceiling fails with a typed,
//! user-facing error - never a silent drop.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::engine::EngineSpec;
use crate::error::EngineError;
use crate::notify::MessageCatalog;
use crate::types::ImageRecord;

/// External re-encoding/resizing engine plus data-URL utilities.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Decode a data URL into raw bytes.
    fn decode_data_url(&self, data_url: &str) -> Result<Bytes>;

    /// Re-encode `image` so the result fits in `max_bytes`, converting to
    /// `new_type` when given. `None` when no encoding under the ceiling
    /// could be produced.
    async fn shrink(
        &self,
        image: &ImageRecord,
        max_bytes: u64,
        new_type: Option<&str>,
    ) -> Result<Option<ImageRecord>>;
}

/// Options for [`prepare_image_for_upload`].
#[derive(Debug, Clone, Default)]
pub struct AdaptOptions {
    /// Engine sub-target whose upload ceiling overrides the engine-wide one.
    pub target: Option<String>,
    /// Output format for a forced re-encode (e.g. `image/jpeg`).
    pub new_type: Option<String>,
    /// Materialize `blob` from the data URL when not already present.
    pub set_blob: bool,
}

/// Adapt `image` to the engine's upload constraints.
///
/// Under the ceiling (or with no ceiling configured) the image comes back
/// unchanged aside from optional blob materialization - no quality loss is
/// applied when none is required.
pub async fn prepare_image_for_upload(
    mut image: ImageRecord,
    engine: &EngineSpec,
    opts: &AdaptOptions,
    codec: &dyn ImageCodec,
    catalog: &dyn MessageCatalog,
) -> Result<ImageRecord, EngineError> {
    let Some(limit) = engine.upload_limit(opts.target.as_deref()) else {
        materialize_blob(&mut image, opts, codec)?;
        return Ok(image);
    };

    if image.byte_size > limit {
        debug!(
            engine = %engine.id,
            size = image.byte_size,
            limit,
            "image over upload ceiling, converting"
        );
        let converted = codec
            .shrink(&image, limit, opts.new_type.as_deref())
            .await
            .map_err(EngineError::generic)?;
        return match converted {
            Some(mut converted) if converted.byte_size <= limit => {
                materialize_blob(&mut converted, opts, codec)?;
                Ok(converted)
            }
            _ => Err(EngineError::typed(size_error_message(
                engine, limit, catalog,
            ))),
        };
    }

    materialize_blob(&mut image, opts, codec)?;
    Ok(image)
}

fn materialize_blob(
    image: &mut ImageRecord,
    opts: &AdaptOptions,
    codec: &dyn ImageCodec,
) -> Result<(), EngineError> {
    if opts.set_blob && image.blob.is_none() {
        let blob = codec
            .decode_data_url(&image.data_url)
            .map_err(EngineError::generic)?;
        image.blob = Some(blob);
    }
    Ok(())
}

/// Localized "image too large" text for the engine and its ceiling.
fn size_error_message(engine: &EngineSpec, limit: u64, catalog: &dyn MessageCatalog) -> String {
    let engine_name = catalog.engine_name(&engine.id);
    let limit_text = format_byte_limit(limit);
    catalog
        .message("error_image_size", &[&engine_name, &limit_text])
        .unwrap_or_else(|| format!("{engine_name} only supports image files up to {limit_text}"))
}

fn format_byte_limit(limit: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if limit >= MIB && limit % MIB == 0 {
        format!("{} MB", limit / MIB)
    } else if limit >= KIB && limit % KIB == 0 {
        format!("{} KB", limit / KIB)
    } else {
        format!("{limit} bytes")
    }
}
