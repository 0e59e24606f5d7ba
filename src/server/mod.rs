//! HTTP server layer serving slide data.
//!
//! This is the backend a [`HttpSlideSource`](crate::slide::HttpSlideSource)
//! talks to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │       GET /mock-data.json        GET /api/slides/{id}           │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │   catalog   │  │        routes           │  │
//! │  │ (requests)  │  │  (slides)   │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod handlers;
pub mod routes;

pub use catalog::SlideCatalog;
pub use handlers::{
    health_handler, mock_data_handler, slide_handler, AppState, ErrorResponse, HealthResponse,
};
pub use routes::{create_router, RouterConfig};
