//! # Slide Carousel
//!
//! The data and navigation core of a paginated slide carousel.
//!
//! Slides are fetched lazily in pages from a remote source, cached, and
//! navigated with a bounded cursor. A coordinator ties everything together
//! behind an event-driven API that a UI layer can subscribe to.
//!
//! ## Features
//!
//! - **Paged loading**: pages are requested at `offset = current length`, so
//!   the list never has gaps
//! - **Graceful degradation**: an unreachable catalog yields placeholder slides
//! - **Bounded caching**: recently used pages are kept in an LRU cache
//! - **Serialized navigation**: index updates run one at a time with a timeout
//!   and a backpressure valve
//! - **Look-ahead prefetch**: the next page loads in the background near the end
//!
//! ## Architecture
//!
//! - [`cache`] - Bounded LRU cache for pages
//! - [`slide`] - Slide model, data sources and the slide repository
//! - [`navigation`] - Operation queue and navigation state
//! - [`slider`] - Slider coordinator and its builder
//! - [`template`] - Named slide renderers
//! - [`events`] - Observer registry shared by all event channels
//! - [`server`] - Axum mock server exposing the slide endpoints
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use slide_carousel::{HttpSlideSource, SliderBuilder, DEFAULT_API_PATH, DEFAULT_DATA_PATH};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSlideSource::new("http://127.0.0.1:3000", DEFAULT_DATA_PATH, DEFAULT_API_PATH)?;
//!     let slider = SliderBuilder::new().source(source).build()?;
//!
//!     let _ = slider.subscribe_to_index(|index| println!("now at {index}"));
//!     slider.initialize().await?;
//!     slider.next_slide().await;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod navigation;
pub mod server;
pub mod slide;
pub mod slider;
pub mod template;

// Re-export commonly used types
pub use cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
pub use config::{BrowseConfig, Cli, Command, ServeConfig};
pub use error::{CatalogError, FetchError, QueueError, SliderError};
pub use events::{Subscribers, Subscription};
pub use navigation::{clamp_index, IndexChange, NavigationState, OperationQueue, QueueOptions};
pub use server::{create_router, AppState, RouterConfig, SlideCatalog};
pub use slide::{
    placeholder_slides, HttpSlideSource, Slide, SlideDataChanged, SlideDataSource, SlideId,
    SlideList, SlideObserver, SlidePayload, SlideRepository, DEFAULT_API_PATH, DEFAULT_DATA_PATH,
};
pub use slider::{
    NextSlide, SliderBuilder, SliderCoordinator, SliderOptions, SliderPhase, TemplateRegistered,
};
pub use template::{default_template, RenderFn, TemplateRegistry};
