//! Navigation layer.
//!
//! - [`NavigationState`]: owns the slide list and the current index, clamps
//!   every index request into bounds and notifies listeners
//! - [`OperationQueue`]: single-worker queue serializing index updates, with
//!   a per-operation timeout and a backpressure valve

mod queue;
mod state;

pub use queue::{
    OperationQueue, PendingResult, QueueOptions, DEFAULT_OPERATION_SPACING,
    DEFAULT_OPERATION_TIMEOUT, DEFAULT_OVERFLOW_RETAIN, DEFAULT_OVERFLOW_THRESHOLD,
};
pub use state::{clamp_index, IndexChange, NavigationState};
