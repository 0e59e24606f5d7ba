//! HTTP request handlers for the mock slide-data server.
//!
//! # Endpoints
//!
//! - `GET /mock-data.json` - The whole catalog as `{ "slides": [...] }`
//! - `GET /api/slides/{id}` - One slide, or 404
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::slide::{SlideId, SlidePayload};

use super::catalog::SlideCatalog;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the slide catalog.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SlideCatalog>,
}

impl AppState {
    pub fn new(catalog: SlideCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Number of slides in the catalog
    pub slides: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle requests for the whole catalog.
///
/// Clients page through it themselves by slicing `[offset, offset + limit)`.
pub async fn mock_data_handler(State(state): State<AppState>) -> Json<SlidePayload> {
    debug!(slides = state.catalog.len(), "Serving slide catalog");
    Json(state.catalog.payload())
}

/// Handle single-slide requests.
///
/// # Endpoint
///
/// `GET /api/slides/{id}`
///
/// # Response
///
/// The slide as JSON, or a 404 [`ErrorResponse`] if the id is unknown.
pub async fn slide_handler(
    State(state): State<AppState>,
    Path(id): Path<SlideId>,
) -> Response {
    match state.catalog.get(id) {
        Some(slide) => Json(slide.clone()).into_response(),
        None => {
            warn!(slide_id = id, "Slide not found");
            ErrorResponse::with_status(
                "not_found",
                format!("Slide not found: {}", id),
                StatusCode::NOT_FOUND,
            )
            .into_response()
        }
    }
}

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        slides: state.catalog.len(),
    })
}
