//! Slide data layer.
//!
//! This module provides the slide record type and everything needed to
//! acquire slides page by page.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            SliderCoordinator            │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            SlideRepository              │
//! │  (page cache, id lookup, observers)     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │         SlideDataSource Trait           │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │ HttpSlideSource │    │  test / in-memory   │
//! │ (+ placeholders)│    │      sources        │
//! └─────────────────┘    └─────────────────────┘
//! ```

mod http_source;
mod repository;
mod source;
mod types;

pub use http_source::{HttpSlideSource, DEFAULT_API_PATH, DEFAULT_DATA_PATH};
pub use repository::{page_cache_key, SlideObserver, SlideRepository};
pub use source::{placeholder_slides, SlideDataSource};
pub use types::{append_slides, Slide, SlideDataChanged, SlideId, SlideList, SlidePayload};
