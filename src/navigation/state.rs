//! Navigation state: the ordered slide list and the current index.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::QueueError;
use crate::events::{Subscribers, Subscription};
use crate::slide::SlideList;

use super::queue::{OperationQueue, QueueOptions};

/// Payload of an index change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexChange {
    pub new_index: usize,
    pub old_index: usize,
}

/// Clamp a requested index into `[0, len - 1]`, or `0` for an empty list.
pub fn clamp_index(target: i64, len: usize) -> usize {
    if len == 0 || target <= 0 {
        return 0;
    }
    usize::try_from(target).map_or(len - 1, |t| t.min(len - 1))
}

struct Cursor {
    slides: SlideList,
    index: usize,
}

/// Owner of the slide list and navigation cursor.
///
/// Index mutations go through a single-worker [`OperationQueue`], so at most
/// one index update is in progress at any time. Cloning yields another
/// handle to the same state.
#[derive(Clone)]
pub struct NavigationState {
    cursor: Arc<Mutex<Cursor>>,
    listeners: Arc<Subscribers<IndexChange>>,
    queue: OperationQueue,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::with_queue_options(QueueOptions::default())
    }

    pub fn with_queue_options(options: QueueOptions) -> Self {
        Self {
            cursor: Arc::new(Mutex::new(Cursor {
                slides: SlideList::from(Vec::new()),
                index: 0,
            })),
            listeners: Arc::new(Subscribers::new("navigationStateChange")),
            queue: OperationQueue::with_options(options),
        }
    }

    pub fn get_index(&self) -> usize {
        self.lock().index
    }

    pub fn get_slides(&self) -> SlideList {
        Arc::clone(&self.lock().slides)
    }

    pub fn len(&self) -> usize {
        self.lock().slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the slide list.
    ///
    /// If the new list is shorter than the current index, the index is
    /// pulled back into range without notifying listeners.
    pub fn set_slides(&self, slides: SlideList) {
        let mut cursor = self.lock();
        cursor.index = clamp_index(cursor.index as i64, slides.len());
        cursor.slides = slides;
    }

    pub fn can_go_prev(&self) -> bool {
        self.lock().index > 0
    }

    /// Whether forward navigation is possible, either within the list or by
    /// loading more when `has_more` is set.
    pub fn can_go_next(&self, has_more: bool) -> bool {
        let cursor = self.lock();
        cursor.index + 1 < cursor.slides.len() || has_more
    }

    /// Move the cursor to `target`, clamped into the list bounds.
    ///
    /// The update is serialized through the operation queue and every
    /// listener is called with the new and old index. Listener panics are
    /// logged and never fail the update. Always resolves to `true`.
    pub async fn set_index(&self, target: i64) -> bool {
        let cursor = Arc::clone(&self.cursor);
        let listeners = Arc::clone(&self.listeners);

        let outcome = self
            .queue
            .enqueue(move || async move {
                let change = {
                    let mut cursor = cursor.lock().unwrap_or_else(PoisonError::into_inner);
                    let old_index = cursor.index;
                    cursor.index = clamp_index(target, cursor.slides.len());
                    IndexChange {
                        new_index: cursor.index,
                        old_index,
                    }
                };
                listeners.emit(&change);
                change
            })
            .await;

        match outcome {
            Ok(change) => debug!(
                target,
                new_index = change.new_index,
                old_index = change.old_index,
                "Navigation index updated"
            ),
            Err(e) => warn!(target, "Navigation index update not applied: {}", e),
        }
        true
    }

    /// Subscribe to index changes.
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&IndexChange) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Run an arbitrary operation through the navigation queue.
    pub async fn enqueue<F, Fut, T>(&self, operation: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.queue.enqueue(operation).await
    }

    /// Drop every operation still waiting in the navigation queue.
    pub fn clear_queue(&self) {
        self.queue.clear();
    }

    pub fn queue(&self) -> &OperationQueue {
        &self.queue
    }

    fn lock(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}
