//! File-input population plans for page-side upload forms.
//!
//! Some engines are driven through their own upload form instead of an API.
//! The content layer either constructs the file object directly and assigns
//! it to the input, or, when direct assignment is blocked, dispatches a
//! page-context event carrying the image as a data URL for a page-side
//! script to consume.

use bytes::Bytes;
use serde::Serialize;

use crate::types::ImageRecord;

/// How a page form's file input gets populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FileInputPlan {
    /// Construct the file object from the blob and assign it directly.
    Direct {
        filename: String,
        mime_type: String,
        #[serde(skip)]
        blob: Bytes,
    },
    /// Dispatch a page-context event carrying the image as a data URL.
    PageEvent {
        data_url: String,
        filename: String,
        mime_type: String,
    },
}

/// Pick the injection route for an image. Direct assignment needs a
/// materialized blob and a page that allows it; everything else falls back
/// to the page-event route.
pub fn plan_file_input(image: &ImageRecord, direct_allowed: bool) -> FileInputPlan {
    match (&image.blob, direct_allowed) {
        (Some(blob), true) => FileInputPlan::Direct {
            filename: image.filename.clone(),
            mime_type: image.mime_type.clone(),
            blob: blob.clone(),
        },
        _ => FileInputPlan::PageEvent {
            data_url: image.data_url.clone(),
            filename: image.filename.clone(),
            mime_type: image.mime_type.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(blob: Option<Bytes>) -> ImageRecord {
        ImageRecord {
            data_url: "data:image/png;base64,AAAA".to_string(),
            blob,
            filename: "image.png".to_string(),
            mime_type: "image/png".to_string(),
            byte_size: 4,
        }
    }

    #[test]
    fn direct_route_when_blob_present_and_allowed() {
        let plan = plan_file_input(&image(Some(Bytes::from_static(b"\x89PNG"))), true);
        assert!(matches!(plan, FileInputPlan::Direct { .. }));
    }

    #[test]
    fn page_event_when_direct_assignment_is_blocked() {
        let plan = plan_file_input(&image(Some(Bytes::from_static(b"\x89PNG"))), false);
        assert_eq!(
            plan,
            FileInputPlan::PageEvent {
                data_url: "data:image/png;base64,AAAA".to_string(),
                filename: "image.png".to_string(),
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn page_event_when_no_blob_is_materialized() {
        let plan = plan_file_input(&image(None), true);
        assert!(matches!(plan, FileInputPlan::PageEvent { .. }));
    }
}
