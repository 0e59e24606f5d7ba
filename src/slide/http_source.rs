//! HTTP-backed slide source.
//!
//! Pages are sliced client-side out of a bulk JSON resource
//! (`{ "slides": [...] }`). If that resource is missing, returns a
//! non-success status or cannot be decoded, placeholder slides are
//! synthesized instead, so page fetches never fail. Single slides are read
//! from `<api-base>/slides/{id}` and do report failures.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;

use super::source::{placeholder_slides, SlideDataSource};
use super::types::{Slide, SlideId, SlidePayload};

/// Default path of the bulk slide-data resource.
pub const DEFAULT_DATA_PATH: &str = "/mock-data.json";

/// Default path prefix of the slide API.
pub const DEFAULT_API_PATH: &str = "/api";

/// HTTP implementation of [`SlideDataSource`].
///
/// # Example
///
/// ```ignore
/// use slide_carousel::slide::HttpSlideSource;
///
/// let source = HttpSlideSource::new("http://127.0.0.1:3000", "/mock-data.json", "/api")?;
/// let page = source.fetch_page(0, 5).await?;
/// ```
#[derive(Clone)]
pub struct HttpSlideSource {
    client: Client,
    data_url: Url,
    api_base: Url,
}

impl HttpSlideSource {
    /// Create a source for the server at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Server origin, e.g. `http://127.0.0.1:3000`
    /// * `data_path` - Path of the bulk slide-data resource
    /// * `api_path` - Path prefix of the slide API
    pub fn new(base_url: &str, data_path: &str, api_path: &str) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), base_url, data_path, api_path)
    }

    /// Create a source using a preconfigured HTTP client.
    pub fn with_client(
        client: Client,
        base_url: &str,
        data_path: &str,
        api_path: &str,
    ) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            client,
            data_url: base.join(data_path)?,
            api_base: base.join(api_path)?,
        })
    }

    /// URL of the bulk slide-data resource.
    pub fn data_url(&self) -> &Url {
        &self.data_url
    }

    /// URL of a single slide.
    pub fn slide_url(&self, id: SlideId) -> String {
        format!("{}/slides/{}", self.api_base.as_str().trim_end_matches('/'), id)
    }

    /// Download and decode the whole slide-data resource.
    async fn fetch_catalog(&self) -> Result<Vec<Slide>, FetchError> {
        let body = self.get_bytes(self.data_url.as_str()).await?;
        let payload: SlidePayload =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(payload.slides)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl SlideDataSource for HttpSlideSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Slide>, FetchError> {
        match self.fetch_catalog().await {
            Ok(slides) => {
                debug!(offset, limit, total = slides.len(), "Slicing slide-data resource");
                Ok(slides.into_iter().skip(offset).take(limit).collect())
            }
            Err(e) => {
                warn!("Using placeholder slides: {}", e);
                Ok(placeholder_slides(offset, limit))
            }
        }
    }

    async fn fetch_by_id(&self, id: SlideId) -> Result<Slide, FetchError> {
        let url = self.slide_url(id);
        let body = self.get_bytes(&url).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
