//! Slide records and the payloads built around them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique, stable identifier of a slide.
pub type SlideId = u64;

/// Ordered, append-only list of slides shared between the coordinator, the
/// navigation state and event subscribers.
pub type SlideList = Arc<[Slide]>;

/// A single content record shown by the carousel.
///
/// Slides are immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Unique, stable identifier
    pub id: SlideId,

    /// Headline shown over the image
    pub title: String,

    /// Body text
    #[serde(default)]
    pub description: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Body of the bulk slide-data resource: `{ "slides": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlidePayload {
    pub slides: Vec<Slide>,
}

/// Notification emitted whenever a slide is upserted into the lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDataChanged {
    /// Id of the upserted slide
    pub slide_id: SlideId,

    /// The slide as now stored
    pub slide_data: Slide,

    /// `true` if the id was not known before, `false` if it replaced a record
    pub is_new: bool,
}

/// Append `more` to `current`, producing a new shared list.
pub fn append_slides(current: &[Slide], more: &[Slide]) -> SlideList {
    current.iter().chain(more.iter()).cloned().collect()
}
