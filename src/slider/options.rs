use std::time::Duration;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::navigation::QueueOptions;

/// Slides requested by `initialize`.
pub const DEFAULT_INITIAL_PAGE_SIZE: usize = 5;

/// Slides requested per load-more.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Retries after the first failed attempt, for init and load-more alike.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base retry delay. Attempt `n` waits `n * DEFAULT_RETRY_DELAY`.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Prefetch starts when the next index is within this many slides of the end.
pub const DEFAULT_PREFETCH_DISTANCE: usize = 2;

/// Tuning knobs for a [`SliderCoordinator`](super::SliderCoordinator).
#[derive(Debug, Clone)]
pub struct SliderOptions {
    pub initial_page_size: usize,
    pub page_size: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub prefetch_distance: usize,
    pub cache_capacity: usize,
    pub queue: QueueOptions,
}

impl SliderOptions {
    /// Delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            initial_page_size: DEFAULT_INITIAL_PAGE_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            queue: QueueOptions::default(),
        }
    }
}
