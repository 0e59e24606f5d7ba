//! Slider coordination layer.
//!
//! [`SliderCoordinator`] is the entry point a UI talks to. It is assembled
//! by [`SliderBuilder`] from a slide data source, navigation state and a
//! template registry.

mod builder;
mod coordinator;
mod options;
mod pending;

pub use builder::SliderBuilder;
pub use coordinator::{NextSlide, SliderCoordinator, SliderPhase, TemplateRegistered};
pub use options::{
    SliderOptions, DEFAULT_INITIAL_PAGE_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE,
    DEFAULT_PREFETCH_DISTANCE, DEFAULT_RETRY_DELAY,
};
pub use pending::{OperationKind, PendingId, PendingOperations};
