//! Router configuration for the mock slide-data server.
//!
//! # Route Structure
//!
//! ```text
//! /health                 - Health check
//! /mock-data.json         - Whole catalog (path configurable)
//! /api/slides/{id}        - Single slide (prefix configurable)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use slide_carousel::server::{create_router, RouterConfig, SlideCatalog};
//!
//! let router = create_router(SlideCatalog::generated(20), RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::catalog::SlideCatalog;
use super::handlers::{health_handler, mock_data_handler, slide_handler, AppState};
use crate::slide::{DEFAULT_API_PATH, DEFAULT_DATA_PATH};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Path of the whole-catalog resource
    pub data_path: String,

    /// Prefix of the single-slide API
    pub api_path: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Default paths, any CORS origin, tracing enabled.
    pub fn new() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            cors_origins: None,
            enable_tracing: true,
        }
    }

    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Route of the single-slide endpoint, e.g. `/api/slides/{id}`.
    pub fn slide_route(&self) -> String {
        format!("{}/slides/{{id}}", normalize_path(&self.api_path).trim_end_matches('/'))
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router serving `catalog`.
pub fn create_router(catalog: SlideCatalog, config: RouterConfig) -> Router {
    let app_state = AppState::new(catalog);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(&normalize_path(&config.data_path), get(mock_data_handler))
        .route(&config.slide_route(), get(slide_handler))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
