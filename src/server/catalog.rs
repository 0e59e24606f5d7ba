//! In-memory slide catalog served by the mock data server.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::CatalogError;
use crate::slide::{placeholder_slides, Slide, SlideId, SlidePayload};

/// Ordered set of slides with an id index.
#[derive(Debug, Clone, Default)]
pub struct SlideCatalog {
    slides: Vec<Slide>,
    by_id: HashMap<SlideId, usize>,
}

impl SlideCatalog {
    /// Build a catalog from slides in display order.
    ///
    /// If two slides share an id, lookups return the last one.
    pub fn new(slides: Vec<Slide>) -> Self {
        let by_id = slides
            .iter()
            .enumerate()
            .map(|(position, slide)| (slide.id, position))
            .collect();
        Self { slides, by_id }
    }

    /// A catalog of `count` generated slides with ids `1..=count`.
    pub fn generated(count: usize) -> Self {
        Self::new(placeholder_slides(0, count))
    }

    /// Parse a `{ "slides": [...] }` document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let payload: SlidePayload = serde_json::from_slice(bytes)?;
        Ok(Self::new(payload.slides))
    }

    /// Read and parse a catalog file.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&bytes)?;
        info!(path = %path.display(), slides = catalog.len(), "Loaded slide catalog");
        Ok(catalog)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn get(&self, id: SlideId) -> Option<&Slide> {
        self.by_id.get(&id).map(|&position| &self.slides[position])
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// The whole catalog as a response payload.
    pub fn payload(&self) -> SlidePayload {
        SlidePayload {
            slides: self.slides.clone(),
        }
    }
}
