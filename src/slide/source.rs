//! The `SlideDataSource` trait and placeholder slide generation.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::FetchError;

use super::types::{Slide, SlideId};

/// Trait for fetching slide records from a remote or local backend.
///
/// This abstraction lets the repository work with HTTP endpoints, in-memory
/// catalogs or test doubles without being tied to one implementation.
#[async_trait]
pub trait SlideDataSource: Send + Sync {
    /// Fetch the slides in `[offset, offset + limit)`.
    ///
    /// An empty result means there are no slides past `offset`.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Slide>, FetchError>;

    /// Fetch a single slide by id.
    async fn fetch_by_id(&self, id: SlideId) -> Result<Slide, FetchError>;
}

/// Synthesize `limit` placeholder slides with ids starting at `offset + 1`.
///
/// Used when the slide-data resource is unavailable or malformed, so the
/// carousel always has something to show.
pub fn placeholder_slides(offset: usize, limit: usize) -> Vec<Slide> {
    let created_at = Utc::now();
    (offset..offset + limit)
        .map(|i| {
            let n = i + 1;
            Slide {
                id: n as SlideId,
                title: format!("Slide {}", n),
                description: format!(
                    "This is demo slide number {}. Any information you want to show users can go here.",
                    n
                ),
                image: format!("https://picsum.photos/600/300?random={}", n),
                created_at,
            }
        })
        .collect()
}
