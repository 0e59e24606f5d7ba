//! Slide Carousel - mock slide-data server and terminal slide browser.
//!
//! This binary wires the library components for the `serve` and `browse`
//! commands.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_carousel::{
    config::{BrowseConfig, Cli, Command, ServeConfig},
    default_template,
    server::{create_router, RouterConfig, SlideCatalog},
    HttpSlideSource, Slide, SliderBuilder, SliderCoordinator,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Browse(config) => run_browse(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    print_banner();

    let catalog = match &config.data {
        Some(path) => match SlideCatalog::load(path).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SlideCatalog::generated(config.generate),
    };

    info!("Configuration:");
    match &config.data {
        Some(path) => info!("  Catalog: {} ({} slides)", path.display(), catalog.len()),
        None => info!("  Catalog: generated ({} slides)", catalog.len()),
    }
    if catalog.is_empty() {
        warn!("  Catalog is empty - clients will fall back to placeholder slides");
    }

    let router_config = build_router_config(&config);
    let router = create_router(catalog, router_config);

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/mock-data.json", addr);
    info!("    curl http://{}/api/slides/1", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Print the startup banner.
fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    info!("");
    info!("┌─┐┬  ┬┌┬┐┌─┐  ┌─┐┌─┐┬─┐┌─┐┬ ┬┌─┐┌─┐┬  ");
    info!("└─┐│  │ ││├┤   │  ├─┤├┬┘│ ││ │└─┐├┤ │  ");
    info!("└─┘┴─┘┴─┴┘└─┘  └─┘┴ ┴┴└─└─┘└─┘└─┘└─┘┴─┘");
    info!("                                 v{}", version);
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new();

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Browse Command
// =============================================================================

async fn run_browse(config: BrowseConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let source = match HttpSlideSource::new(&config.base_url, &config.data_path, &config.api_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: invalid source URL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let slider = match SliderBuilder::new()
        .source(source)
        .options(config.slider_options())
        .build()
    {
        Ok(slider) => slider,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    slider.register_template("text", Arc::new(render_text));
    slider.register_template("html", Arc::new(default_template));

    // Event subscriptions live for the whole session
    let _loading = slider.subscribe_to_loading(|loading| {
        if *loading {
            println!("  … loading more slides");
        }
    });
    let _has_more = slider.subscribe_to_has_more(|has_more| {
        if !*has_more {
            println!("  (no more slides on the server)");
        }
    });
    let _slides = slider.subscribe_to_slides(|slides| {
        println!("  {} slide(s) loaded", slides.len());
    });
    let _init_error = slider.subscribe_to_initialization_error(|e| {
        println!("  initialization failed: {}", e);
    });

    println!("Connecting to {} ...", config.base_url);
    if slider.initialize().await.is_err() {
        return ExitCode::FAILURE;
    }

    show_current(&slider, &config.template);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("next" | "n"), _) => {
                let before = slider.get_current_index();
                let result = slider.next_slide().await;
                if result.index == before {
                    println!("  already at the last slide");
                }
                show_current(&slider, &config.template);
            }
            (Some("prev" | "p"), _) => {
                if !slider.prev_slide().await {
                    println!("  already at the first slide");
                }
                show_current(&slider, &config.template);
            }
            (Some("goto" | "g"), Some(arg)) => match arg.parse::<i64>() {
                // Slides are numbered from 1 on screen
                Ok(number) => {
                    if !slider.go_to_slide(number - 1).await {
                        println!("  slide {} is not available", number);
                    }
                    show_current(&slider, &config.template);
                }
                Err(_) => println!("  not a slide number: {}", arg),
            },
            (Some("show" | "s"), _) => show_current(&slider, &config.template),
            (Some("quit" | "q" | "exit"), _) => break,
            _ => print_help(),
        }
    }

    ExitCode::SUCCESS
}

fn print_help() {
    println!();
    println!("Commands: next (n), prev (p), goto N (g N), show (s), quit (q)");
}

fn show_current<S>(slider: &SliderCoordinator<S>, template: &str)
where
    S: slide_carousel::SlideDataSource + 'static,
{
    let slides = slider.get_slides();
    let index = slider.get_current_index();
    let Some(slide) = slides.get(index) else {
        println!("  (no slides)");
        return;
    };

    let more = if slider.has_more_slides() { "+" } else { "" };
    println!();
    println!("[{}/{}{}]", index + 1, slides.len(), more);
    println!("{}", (slider.get_template(template))(slide));
}

/// Plain-text slide renderer for the terminal.
fn render_text(slide: &Slide) -> String {
    let mut out = format!("#{} {}", slide.id, slide.title);
    if !slide.description.is_empty() {
        out.push_str("\n    ");
        out.push_str(&slide.description);
    }
    if !slide.image.is_empty() {
        out.push_str("\n    ");
        out.push_str(&slide.image);
    }
    out.push_str(&format!("\n    created {}", slide.created_at.format("%Y-%m-%d %H:%M")));
    out
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so the browse output on stdout stays readable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "slide_carousel=debug,tower_http=debug"
    } else {
        "slide_carousel=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
