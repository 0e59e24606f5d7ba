use std::time::Duration;

use thiserror::Error;

/// Errors from fetching slide data over the network.
///
/// Page fetches from [`crate::slide::HttpSlideSource`] never surface these;
/// they fall back to placeholder slides. Fetching a single slide by id does.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP error! status: {status} ({url})")]
    Status { status: u16, url: String },

    /// Network or connection error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not a valid slide payload
    #[error("Decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status code, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outcome of an operation submitted to the navigation queue that did not
/// produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The operation did not settle within the queue timeout
    #[error("Operation timeout after {0:?}")]
    Timeout(Duration),

    /// The operation was discarded before it ran (backpressure or clear)
    #[error("Operation dropped from the navigation queue")]
    Dropped,

    /// The operation panicked while running
    #[error("Operation failed: {0}")]
    Failed(String),
}

/// Errors surfaced by the slider coordinator.
#[derive(Debug, Clone, Error)]
pub enum SliderError {
    /// The first page could not be loaded after all retries
    #[error("Initialization failed after {attempts} attempt(s): {source}")]
    Initialization {
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// A required collaborator was not supplied at construction time
    #[error("Slider dependency not available: {0}")]
    DependencyUnavailable(&'static str),

    /// A direct fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors from loading the slide catalog served by the mock server.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a valid `{ "slides": [...] }` document
    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
