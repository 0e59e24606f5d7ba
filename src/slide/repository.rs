//! Slide repository: cache-checked page loading and per-slide observation.
//!
//! The repository provides:
//! - A bounded page cache keyed by `slides_{offset}_{limit}`
//! - An id-keyed lookup table of every slide seen so far (never evicted)
//! - A `slideDataChanged` channel fired on every lookup-table upsert
//! - Per-id observers that receive the current value on subscribe
//!
//! # Example
//!
//! ```ignore
//! use slide_carousel::slide::{HttpSlideSource, SlideRepository};
//!
//! let source = HttpSlideSource::new("http://127.0.0.1:3000", "/mock-data.json", "/api")?;
//! let repository = SlideRepository::new(source);
//!
//! // First call goes to the source, the second is served from the page cache
//! let page = repository.load_page(0, 5).await?;
//! let again = repository.load_page(0, 5).await?;
//!
//! // Watch one slide
//! let subscription = repository.observe(3).subscribe(|slide| println!("{}", slide.title));
//! ```

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error};

use crate::cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
use crate::error::FetchError;
use crate::events::{panic_message, Subscribers, Subscription};

use super::source::SlideDataSource;
use super::types::{Slide, SlideDataChanged, SlideId, SlideList};

type LookupTable = Arc<RwLock<HashMap<SlideId, Slide>>>;

/// Cache key for one page of slides.
pub fn page_cache_key(offset: usize, limit: usize) -> String {
    format!("slides_{}_{}", offset, limit)
}

/// Repository combining a [`SlideDataSource`] with a page cache and an
/// id-keyed lookup table.
pub struct SlideRepository<S: SlideDataSource> {
    /// Where pages and single slides come from
    source: S,

    /// Pages indexed by `slides_{offset}_{limit}`
    pages: BoundedCache<String, SlideList>,

    /// Every slide seen so far, by id
    slides: LookupTable,

    /// `slideDataChanged` channel
    changes: Arc<Subscribers<SlideDataChanged>>,
}

impl<S: SlideDataSource> SlideRepository<S> {
    /// Create a repository with the default page cache capacity.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a repository whose page cache holds `cache_capacity` pages.
    pub fn with_capacity(source: S, cache_capacity: usize) -> Self {
        Self {
            source,
            pages: BoundedCache::with_capacity(cache_capacity),
            slides: Arc::new(RwLock::new(HashMap::new())),
            changes: Arc::new(Subscribers::new("slideDataChanged")),
        }
    }

    /// Load the page `[offset, offset + limit)`, consulting the cache first.
    ///
    /// On a miss, the page is fetched from the source, cached, and every
    /// slide in it is upserted into the lookup table.
    pub async fn load_page(&self, offset: usize, limit: usize) -> Result<SlideList, FetchError> {
        let key = page_cache_key(offset, limit);

        if let Some(page) = self.pages.get(&key).await {
            debug!(%key, "Page cache hit");
            return Ok(page);
        }

        debug!(%key, "Page cache miss");
        let page: SlideList = self.source.fetch_page(offset, limit).await?.into();

        for slide in page.iter() {
            self.set_slide_data(slide.clone());
        }
        self.pages.set(key, page.clone()).await;

        Ok(page)
    }

    /// Get a known slide from the lookup table.
    pub fn get_by_id(&self, id: SlideId) -> Option<Slide> {
        self.slides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Get a slide, fetching it from the source if it is not known yet.
    ///
    /// Fetch errors are returned to the caller unchanged.
    pub async fn fetch_by_id(&self, id: SlideId) -> Result<Slide, FetchError> {
        if let Some(slide) = self.get_by_id(id) {
            return Ok(slide);
        }

        let slide = self.source.fetch_by_id(id).await?;
        self.set_slide_data(slide.clone());
        Ok(slide)
    }

    /// Upsert a slide into the lookup table and notify observers.
    pub fn set_slide_data(&self, slide: Slide) {
        let slide_id = slide.id;
        let is_new = self
            .slides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slide_id, slide.clone())
            .is_none();

        self.changes.emit(&SlideDataChanged {
            slide_id,
            slide_data: slide,
            is_new,
        });
    }

    /// Observe a single slide by id.
    pub fn observe(&self, id: SlideId) -> SlideObserver {
        SlideObserver {
            id,
            slides: Arc::clone(&self.slides),
            changes: Arc::clone(&self.changes),
        }
    }

    /// Subscribe to every lookup-table upsert.
    pub fn subscribe_changes<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SlideDataChanged) + Send + Sync + 'static,
    {
        self.changes.subscribe(callback)
    }

    /// Number of slides in the lookup table.
    pub fn known_slides(&self) -> usize {
        self.slides.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of cached pages.
    pub async fn cached_pages(&self) -> usize {
        self.pages.size().await
    }

    /// Drop every cached page. The lookup table is kept.
    pub async fn clear_cache(&self) {
        self.pages.clear().await;
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Subscription factory for one slide id, returned by
/// [`SlideRepository::observe`].
pub struct SlideObserver {
    id: SlideId,
    slides: LookupTable,
    changes: Arc<Subscribers<SlideDataChanged>>,
}

impl SlideObserver {
    /// The observed id.
    pub fn id(&self) -> SlideId {
        self.id
    }

    /// Register `callback` for future updates of this slide.
    ///
    /// If the slide is already known, its current value is delivered
    /// asynchronously right after subscribing, so observers never need to
    /// special-case the first value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Slide) + Send + Sync + 'static,
    {
        let id = self.id;
        let callback = Arc::new(callback);

        let on_change = Arc::clone(&callback);
        let subscription = self.changes.subscribe(move |change: &SlideDataChanged| {
            if change.slide_id == id {
                on_change(&change.slide_data);
            }
        });

        let current = self
            .slides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();

        if let Some(current) = current {
            let slides = Arc::clone(&self.slides);
            let deliver = move || {
                let still_known = slides
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .contains_key(&id);
                if still_known {
                    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(&current))) {
                        error!(slide_id = id, "Error in slide observer: {}", panic_message(panic.as_ref()));
                    }
                }
            };

            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move { deliver() });
                }
                Err(_) => deliver(),
            }
        }

        subscription
    }
}
