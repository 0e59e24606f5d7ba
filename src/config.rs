//! Configuration management for the slide carousel.
//!
//! Two commands share one binary:
//!
//! - `serve`  - run the mock slide-data server
//! - `browse` - drive a slider coordinator from the terminal against a server
//!
//! Every option can be given on the command line or through an environment
//! variable with the `CAROUSEL_` prefix:
//!
//! - `CAROUSEL_HOST` - Server bind address (default: 0.0.0.0)
//! - `CAROUSEL_PORT` - Server port (default: 3000)
//! - `CAROUSEL_DATA` - JSON catalog file served by `serve`
//! - `CAROUSEL_GENERATE` - Generated catalog size when no file is given (default: 20)
//! - `CAROUSEL_CORS_ORIGINS` - Allowed CORS origins, comma-separated
//! - `CAROUSEL_BASE_URL` - Server that `browse` reads from (default: http://127.0.0.1:3000)
//! - `CAROUSEL_CACHE_CAPACITY` - Page cache capacity (default: 50)
//! - `CAROUSEL_PAGE_SIZE` - Slides per page (default: 5)
//! - `CAROUSEL_MAX_RETRIES` - Load retries (default: 3)
//! - `CAROUSEL_RETRY_DELAY_MS` - Base retry delay (default: 1000)
//! - `CAROUSEL_TEMPLATE` - Template used by `browse` (default: text)

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::slide::{DEFAULT_API_PATH, DEFAULT_DATA_PATH};
use crate::slider::{SliderOptions, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default size of the generated catalog.
pub const DEFAULT_GENERATED_SLIDES: usize = 20;

/// Default server the browser connects to.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Default base retry delay in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Default template used by `browse`.
pub const DEFAULT_TEMPLATE: &str = "text";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Slide carousel - paginated slide data with a navigation core.
#[derive(Parser, Debug, Clone)]
#[command(name = "slide-carousel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve slide data over HTTP.
    Serve(ServeConfig),

    /// Browse slides from a running server in the terminal.
    Browse(BrowseConfig),
}

/// Options of the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "CAROUSEL_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "CAROUSEL_PORT")]
    pub port: u16,

    // =========================================================================
    // Catalog Configuration
    // =========================================================================
    /// JSON file of the form `{ "slides": [...] }` to serve.
    ///
    /// If not specified, a catalog of `--generate` slides is generated.
    #[arg(long, env = "CAROUSEL_DATA")]
    pub data: Option<PathBuf>,

    /// Number of slides to generate when no data file is given.
    #[arg(long, default_value_t = DEFAULT_GENERATED_SLIDES, env = "CAROUSEL_GENERATE")]
    pub generate: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CAROUSEL_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if self.data.is_none() && self.generate == 0 {
            return Err(
                "No slides to serve. Set --data or CAROUSEL_DATA, or --generate above 0"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Options of the `browse` command.
#[derive(Args, Debug, Clone)]
pub struct BrowseConfig {
    // =========================================================================
    // Source Configuration
    // =========================================================================
    /// Base URL of the slide-data server.
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "CAROUSEL_BASE_URL")]
    pub base_url: String,

    /// Path of the full slide catalog on the server.
    #[arg(long, default_value = DEFAULT_DATA_PATH, env = "CAROUSEL_DATA_PATH")]
    pub data_path: String,

    /// Path prefix of the single-slide API.
    #[arg(long, default_value = DEFAULT_API_PATH, env = "CAROUSEL_API_PATH")]
    pub api_path: String,

    // =========================================================================
    // Slider Configuration
    // =========================================================================
    /// Maximum number of pages to keep in cache.
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY, env = "CAROUSEL_CACHE_CAPACITY")]
    pub cache_capacity: usize,

    /// Slides requested per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, env = "CAROUSEL_PAGE_SIZE")]
    pub page_size: usize,

    /// Retries after a failed page load.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, env = "CAROUSEL_MAX_RETRIES")]
    pub max_retries: u32,

    /// Base retry delay in milliseconds; retry n waits n times this.
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_MS, env = "CAROUSEL_RETRY_DELAY_MS")]
    pub retry_delay_ms: u64,

    /// Template used to print slides (`text` or `html`).
    ///
    /// Unknown names fall back to the built-in HTML template.
    #[arg(long, default_value = DEFAULT_TEMPLATE, env = "CAROUSEL_TEMPLATE")]
    pub template: String,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl BrowseConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.base_url).map_err(|e| format!("Invalid base URL '{}': {}", self.base_url, e))?;

        if self.data_path.is_empty() {
            return Err("data_path must not be empty".to_string());
        }
        if self.api_path.is_empty() {
            return Err("api_path must not be empty".to_string());
        }

        if self.cache_capacity == 0 {
            return Err("cache_capacity must be greater than 0".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Slider options derived from this configuration.
    pub fn slider_options(&self) -> SliderOptions {
        SliderOptions {
            initial_page_size: self.page_size,
            page_size: self.page_size,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            cache_capacity: self.cache_capacity,
            ..SliderOptions::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
