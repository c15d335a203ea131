//! Pinterest visual search client, the reference provider.
//!
//! Uploads the image blob as a multipart PUT to Pinterest's visual search
//! endpoint with fixed crop coordinates spanning the full image, and maps
//! the JSON response to normalized hits.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::{SearchEngine, SearchInput};
use crate::error::EngineError;
use crate::types::SearchHit;

const PINTEREST_SEARCH_URL: &str = "https://api.pinterest.com/v3/visual_search/extension/image/";

pub struct PinterestClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PinterestClient {
    pub fn new() -> Self {
        Self::with_endpoint(PINTEREST_SEARCH_URL)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for PinterestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for PinterestClient {
    async fn search(&self, input: &SearchInput) -> Result<Vec<SearchHit>, EngineError> {
        let blob = input
            .image
            .blob
            .as_ref()
            .ok_or_else(|| EngineError::generic("image blob not materialized before upload"))?;

        let image = Part::bytes(blob.to_vec())
            .file_name(input.image.filename.clone())
            .mime_str(&input.image.mime_type)?;

        // Crop spanning the whole image.
        let form = Form::new()
            .part("image", image)
            .text("x", "0")
            .text("y", "0")
            .text("w", "1")
            .text("h", "1")
            .text("base_scheme", "https");

        let response = self
            .client
            .put(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(EngineError::generic(format!(
                "pinterest returned HTTP {status}"
            )));
        }

        let body: PinterestResponse = response.json().await?;
        if body.status.as_deref() != Some("success") {
            return Err(EngineError::generic(format!(
                "pinterest reported status {:?}",
                body.status
            )));
        }

        let pins = body.data.unwrap_or_default();
        if pins.is_empty() {
            return Err(EngineError::generic("pinterest returned no results"));
        }

        debug!(hits = pins.len(), "pinterest visual search resolved");
        Ok(pins
            .into_iter()
            .map(|pin| SearchHit {
                page_url: format!("https://www.pinterest.com/pin/{}/", pin.id),
                image_url: pin.image_large_url.unwrap_or_default(),
                text: pin.description.unwrap_or_default(),
            })
            .collect())
    }

    fn engine_id(&self) -> &'static str {
        "pinterest"
    }
}

#[derive(Debug, Deserialize)]
struct PinterestResponse {
    status: Option<String>,
    data: Option<Vec<Pin>>,
}

#[derive(Debug, Deserialize)]
struct Pin {
    id: String,
    image_large_url: Option<String>,
    description: Option<String>,
}
