//! Slider coordinator.
//!
//! Combines a [`SlideRepository`] and a [`NavigationState`] into the carousel
//! controller consumed by a UI: retrying initialization, look-ahead
//! prefetching, "go to slide N" with automatic load-more, and one event
//! channel per observable state change.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize()──► Initializing ──first page──► Ready
//!                                   │    ▲
//!                           failure │    │ retry (1s * n)
//!                                   ▼    │
//!                                 (retries left?) ──no──► Error
//! ```
//!
//! Navigation calls are not mutually exclusive with each other. Only the
//! index mutation inside [`NavigationState`] is serialized, so two
//! concurrent calls may interleave around an awaited page load.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::error::{FetchError, SliderError};
use crate::events::{Subscribers, Subscription};
use crate::navigation::NavigationState;
use crate::slide::{
    append_slides, Slide, SlideDataChanged, SlideDataSource, SlideId, SlideList, SlideObserver,
    SlideRepository,
};
use crate::template::{RenderFn, TemplateRegistry};

use super::options::SliderOptions;
use super::pending::{OperationKind, PendingId, PendingOperations};

/// Lifecycle phase of a [`SliderCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderPhase {
    Uninitialized,
    Initializing,
    Ready,
    Error,
}

/// Result of [`SliderCoordinator::next_slide`].
///
/// `slides` is `None` when the list did not change and only the cursor
/// moved, so a UI only needs to re-render the list when it is `Some`.
#[derive(Debug, Clone, PartialEq)]
pub struct NextSlide {
    pub slides: Option<SlideList>,
    pub index: usize,
}

/// Payload of the `templateRegistered` event.
#[derive(Clone)]
pub struct TemplateRegistered {
    pub name: String,
    pub template: RenderFn,
}

impl fmt::Debug for TemplateRegistered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistered")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

struct SliderEvents {
    slides: Subscribers<SlideList>,
    index: Subscribers<usize>,
    loading: Subscribers<bool>,
    has_more: Subscribers<bool>,
    templates: Subscribers<TemplateRegistered>,
    initialization_error: Subscribers<SliderError>,
}

impl SliderEvents {
    fn new() -> Self {
        Self {
            slides: Subscribers::new("slidesChanged"),
            index: Subscribers::new("indexChanged"),
            loading: Subscribers::new("loading"),
            has_more: Subscribers::new("hasMoreChanged"),
            templates: Subscribers::new("templateRegistered"),
            initialization_error: Subscribers::new("initializationError"),
        }
    }
}

struct Status {
    phase: SliderPhase,
    has_more: bool,
    pending: PendingOperations,
}

struct Shared<S: SlideDataSource> {
    repository: Arc<SlideRepository<S>>,
    navigation: NavigationState,
    templates: Arc<TemplateRegistry>,
    options: SliderOptions,
    events: SliderEvents,
    status: Mutex<Status>,
    init_lock: tokio::sync::Mutex<()>,
}

/// Token held for the duration of one tracked operation.
///
/// Dropping it removes the token. When the last load token goes away the
/// `loading(false)` event is emitted.
struct PendingGuard<S: SlideDataSource> {
    shared: Arc<Shared<S>>,
    id: PendingId,
}

impl<S: SlideDataSource> Drop for PendingGuard<S> {
    fn drop(&mut self) {
        let drained = {
            let mut status = self.shared.status();
            status.pending.remove(self.id);
            self.id.kind() == OperationKind::Load && !status.pending.is_loading()
        };
        if drained {
            self.shared.events.loading.emit(&false);
        }
    }
}

impl<S: SlideDataSource> Shared<S> {
    fn status(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: SlideDataSource + 'static> Shared<S> {
    fn track_navigation(self: &Arc<Self>) -> PendingGuard<S> {
        let id = self.status().pending.insert(OperationKind::Navigation);
        PendingGuard {
            shared: Arc::clone(self),
            id,
        }
    }

    /// Start a load if neither guard forbids it.
    ///
    /// Returns `None` when a load is already in flight or the source is
    /// exhausted. The guard check and the token insert happen under the same
    /// lock, so two callers can never both start a load.
    fn begin_load(self: &Arc<Self>) -> Option<PendingGuard<S>> {
        let id = {
            let mut status = self.status();
            if status.pending.is_loading() || !status.has_more {
                return None;
            }
            status.pending.insert(OperationKind::Load)
        };
        self.events.loading.emit(&true);
        Some(PendingGuard {
            shared: Arc::clone(self),
            id,
        })
    }

    /// Fetch the page following `current`, retrying with linear backoff.
    ///
    /// Returns `current` extended with the new page, or `current` unchanged
    /// when every attempt failed or the page was empty.
    async fn run_load(&self, ticket: PendingGuard<S>, current: SlideList, limit: usize) -> SlideList {
        let offset = current.len();
        let mut retries = 0u32;

        let page = loop {
            match self.repository.load_page(offset, limit).await {
                Ok(page) => break Some(page),
                Err(e) => {
                    retries += 1;
                    if retries > self.options.max_retries {
                        error!(offset, limit, "Failed to load more slides after {} retries: {}", retries - 1, e);
                        break None;
                    }
                    let delay = self.options.backoff(retries);
                    warn!(
                        offset,
                        limit,
                        "Load more failed, retry {}/{} in {:?}: {}",
                        retries,
                        self.options.max_retries,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        };

        let merged = match page {
            Some(page) if page.is_empty() => {
                self.mark_exhausted();
                current
            }
            Some(page) => {
                debug!(offset, loaded = page.len(), "Loaded more slides");
                append_slides(&current, &page)
            }
            None => current,
        };

        drop(ticket);
        merged
    }

    fn mark_exhausted(&self) {
        let changed = {
            let mut status = self.status();
            std::mem::replace(&mut status.has_more, false)
        };
        if changed {
            info!("Slide source exhausted, no more pages");
            self.events.has_more.emit(&false);
        }
    }

    async fn load_more(self: &Arc<Self>, current: SlideList, limit: usize) -> SlideList {
        match self.begin_load() {
            Some(ticket) => self.run_load(ticket, current, limit).await,
            None => current,
        }
    }

    /// Replace the navigation list and announce it.
    fn publish_slides(&self, slides: SlideList) {
        self.navigation.set_slides(slides.clone());
        self.events.slides.emit(&slides);
    }

    async fn move_to(&self, index: usize) -> usize {
        let target = i64::try_from(index).unwrap_or(i64::MAX);
        self.navigation.set_index(target).await;
        let resolved = self.navigation.get_index();
        self.events.index.emit(&resolved);
        resolved
    }

    /// Fire-and-forget page load used to hide latency ahead of the cursor.
    fn spawn_prefetch(self: &Arc<Self>, slides: SlideList) {
        let Some(ticket) = self.begin_load() else {
            return;
        };
        let shared = Arc::clone(self);
        let limit = self.options.page_size;

        tokio::spawn(async move {
            let before = slides.len();
            let merged = shared.run_load(ticket, slides, limit).await;
            if merged.len() > before {
                debug!(total = merged.len(), "Prefetched slides");
                shared.publish_slides(merged);
            }
        });
    }
}

/// Carousel controller over a slide repository and navigation state.
///
/// Cloning yields another handle to the same coordinator.
pub struct SliderCoordinator<S: SlideDataSource> {
    shared: Arc<Shared<S>>,
}

impl<S: SlideDataSource> Clone for SliderCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: SlideDataSource + 'static> SliderCoordinator<S> {
    /// Assemble a coordinator from its collaborators.
    ///
    /// See [`SliderBuilder`](super::SliderBuilder) for a builder that
    /// creates missing collaborators from options.
    pub fn new(
        repository: Arc<SlideRepository<S>>,
        navigation: NavigationState,
        templates: Arc<TemplateRegistry>,
        options: SliderOptions,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                repository,
                navigation,
                templates,
                options,
                events: SliderEvents::new(),
                status: Mutex::new(Status {
                    phase: SliderPhase::Uninitialized,
                    has_more: true,
                    pending: PendingOperations::new(),
                }),
                init_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Load the first page and move to index 0.
    ///
    /// Failed attempts are retried up to `max_retries` times, waiting
    /// `retry_delay * n` before retry `n`. When every attempt fails the
    /// coordinator enters [`SliderPhase::Error`], emits
    /// `initializationError` and returns the same error. Calling this on a
    /// ready coordinator does nothing; concurrent calls run one at a time.
    pub async fn initialize(&self) -> Result<(), SliderError> {
        let shared = &self.shared;
        let _init = shared.init_lock.lock().await;

        {
            let mut status = shared.status();
            if status.phase == SliderPhase::Ready {
                return Ok(());
            }
            status.phase = SliderPhase::Initializing;
        }

        let limit = shared.options.initial_page_size;
        let mut retries = 0u32;

        loop {
            match shared.repository.load_page(0, limit).await {
                Ok(slides) => {
                    shared.navigation.set_slides(slides.clone());
                    shared.navigation.set_index(0).await;
                    shared.status().phase = SliderPhase::Ready;

                    info!(slides = slides.len(), "Slider initialized");
                    shared.events.slides.emit(&slides);
                    shared.events.index.emit(&0);
                    return Ok(());
                }
                Err(e) => {
                    retries += 1;
                    if retries <= shared.options.max_retries {
                        let delay = shared.options.backoff(retries);
                        warn!(
                            "Initialization failed, retry {}/{} in {:?}: {}",
                            retries, shared.options.max_retries, delay, e
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    shared.status().phase = SliderPhase::Error;
                    let err = SliderError::Initialization {
                        attempts: retries,
                        source: e,
                    };
                    error!("Slider initialization failed: {}", err);
                    shared.events.initialization_error.emit(&err);
                    return Err(err);
                }
            }
        }
    }

    pub fn phase(&self) -> SliderPhase {
        self.shared.status().phase
    }

    pub fn get_slides(&self) -> SlideList {
        self.shared.navigation.get_slides()
    }

    pub fn get_current_index(&self) -> usize {
        self.shared.navigation.get_index()
    }

    /// Move to slide `index`, loading one more page if it lies past the end.
    ///
    /// Returns `false` for negative indices, when no page can be loaded, or
    /// when the index is still out of range after loading. In the last case
    /// the cursor moves to the last slide.
    pub async fn go_to_slide(&self, index: i64) -> bool {
        let shared = &self.shared;
        let _token = shared.track_navigation();

        let Ok(target) = usize::try_from(index) else {
            debug!(index, "Ignoring negative slide index");
            return false;
        };

        let slides = shared.navigation.get_slides();
        if target < slides.len() {
            shared.move_to(target).await;
            return true;
        }

        let Some(ticket) = shared.begin_load() else {
            debug!(index, "Slide index out of range and no page can be loaded");
            return false;
        };
        let merged = shared.run_load(ticket, slides, shared.options.page_size).await;
        shared.publish_slides(merged.clone());

        if target < merged.len() {
            shared.move_to(target).await;
            true
        } else {
            if let Some(last) = merged.len().checked_sub(1) {
                shared.move_to(last).await;
            }
            false
        }
    }

    /// Advance by one slide.
    ///
    /// When the next slide is already loaded the cursor moves and the
    /// result carries no list. Near the end of the list a background
    /// prefetch is started. Past the end, one page is loaded first and the
    /// merged list is returned along with the resolved index.
    pub async fn next_slide(&self) -> NextSlide {
        let shared = &self.shared;
        let _token = shared.track_navigation();

        let slides = shared.navigation.get_slides();
        let next = shared.navigation.get_index() + 1;

        if next < slides.len() {
            if next + shared.options.prefetch_distance >= slides.len() {
                shared.spawn_prefetch(slides);
            }
            let index = shared.move_to(next).await;
            return NextSlide {
                slides: None,
                index,
            };
        }

        let Some(ticket) = shared.begin_load() else {
            return NextSlide {
                slides: Some(slides),
                index: shared.navigation.get_index(),
            };
        };

        let merged = shared.run_load(ticket, slides, shared.options.page_size).await;
        shared.publish_slides(merged.clone());

        let index = if next < merged.len() {
            shared.move_to(next).await
        } else {
            shared.navigation.get_index()
        };

        NextSlide {
            slides: Some(merged),
            index,
        }
    }

    /// Step back one slide. Returns whether the cursor moved.
    pub async fn prev_slide(&self) -> bool {
        let shared = &self.shared;
        let _token = shared.track_navigation();

        let current = shared.navigation.get_index();
        if current == 0 {
            return false;
        }
        shared.move_to(current - 1).await;
        true
    }

    /// Load the next `limit` slides and merge them into the list.
    ///
    /// A no-op returning the current list while a load is in flight or once
    /// the source is exhausted. `slidesChanged` is emitted only when the
    /// list grew.
    pub async fn load_more_slides(&self, limit: usize) -> SlideList {
        let shared = &self.shared;
        let current = shared.navigation.get_slides();
        let merged = shared.load_more(current.clone(), limit).await;
        if merged.len() > current.len() {
            shared.publish_slides(merged.clone());
        }
        merged
    }

    pub fn has_more_slides(&self) -> bool {
        self.shared.status().has_more
    }

    pub fn is_loading_state(&self) -> bool {
        self.shared.status().pending.is_loading()
    }

    /// Whether any load or navigation call is still in flight.
    pub fn has_pending_operations(&self) -> bool {
        !self.shared.status().pending.is_empty()
    }

    pub fn can_go_prev(&self) -> bool {
        self.shared.navigation.can_go_prev()
    }

    pub fn can_go_next(&self) -> bool {
        self.shared.navigation.can_go_next(self.has_more_slides())
    }

    /// Register a renderer and emit `templateRegistered`.
    pub fn register_template(&self, name: impl Into<String>, template: RenderFn) {
        let name = name.into();
        self.shared.templates.register(name.clone(), Arc::clone(&template));
        debug!(%name, "Template registered");
        self.shared
            .events
            .templates
            .emit(&TemplateRegistered { name, template });
    }

    /// Get the renderer registered under `name`, or the default one.
    pub fn get_template(&self, name: &str) -> RenderFn {
        self.shared.templates.get(name)
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.shared.templates
    }

    /// Get a known slide without touching the network.
    pub fn get_slide_data(&self, id: SlideId) -> Option<Slide> {
        self.shared.repository.get_by_id(id)
    }

    /// Get a slide by id, fetching it if it has not been seen yet.
    pub async fn fetch_slide_by_id(&self, id: SlideId) -> Result<Slide, FetchError> {
        self.shared.repository.fetch_by_id(id).await
    }

    pub fn observe_slide(&self, id: SlideId) -> SlideObserver {
        self.shared.repository.observe(id)
    }

    pub fn repository(&self) -> &Arc<SlideRepository<S>> {
        &self.shared.repository
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.shared.navigation
    }

    pub fn options(&self) -> &SliderOptions {
        &self.shared.options
    }

    // =========================================================================
    // Event subscriptions
    // =========================================================================

    pub fn subscribe_to_slides<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SlideList) + Send + Sync + 'static,
    {
        self.shared.events.slides.subscribe(callback)
    }

    pub fn subscribe_to_index<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&usize) + Send + Sync + 'static,
    {
        self.shared.events.index.subscribe(callback)
    }

    pub fn subscribe_to_loading<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.shared.events.loading.subscribe(callback)
    }

    pub fn subscribe_to_has_more<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.shared.events.has_more.subscribe(callback)
    }

    pub fn subscribe_to_templates<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TemplateRegistered) + Send + Sync + 'static,
    {
        self.shared.events.templates.subscribe(callback)
    }

    pub fn subscribe_to_initialization_error<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SliderError) + Send + Sync + 'static,
    {
        self.shared.events.initialization_error.subscribe(callback)
    }

    pub fn subscribe_to_slide_data<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SlideDataChanged) + Send + Sync + 'static,
    {
        self.shared.repository.subscribe_changes(callback)
    }
}
