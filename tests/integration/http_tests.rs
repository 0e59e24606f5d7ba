//! End-to-end tests: the HTTP source against a live mock server.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use slide_carousel::{
    create_router, FetchError, HttpSlideSource, RouterConfig, SlideCatalog, SlideDataSource,
    SliderBuilder, DEFAULT_API_PATH, DEFAULT_DATA_PATH,
};

use super::test_utils::{ids, spawn_server};

async fn source_for(router: Router) -> HttpSlideSource {
    let addr = spawn_server(router).await;
    HttpSlideSource::new(&format!("http://{}", addr), DEFAULT_DATA_PATH, DEFAULT_API_PATH).unwrap()
}

fn catalog_router(count: usize) -> Router {
    create_router(SlideCatalog::generated(count), RouterConfig::new().with_tracing(false))
}

// =============================================================================
// Paged fetches
// =============================================================================

#[tokio::test]
async fn test_pages_are_sliced_from_catalog() {
    let source = source_for(catalog_router(12)).await;

    let page = source.fetch_page(0, 5).await.unwrap();
    assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);

    let page = source.fetch_page(10, 5).await.unwrap();
    assert_eq!(ids(&page), vec![11, 12]);

    let page = source.fetch_page(12, 5).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_server_error_falls_back_to_placeholders() {
    let router = Router::new().route(
        "/mock-data.json",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let source = source_for(router).await;

    let page = source.fetch_page(5, 3).await.unwrap();
    assert_eq!(ids(&page), vec![6, 7, 8]);
    assert_eq!(page[0].title, "Slide 6");
}

#[tokio::test]
async fn test_malformed_catalog_falls_back_to_placeholders() {
    let router = Router::new().route("/mock-data.json", get(|| async { "not json" }));
    let source = source_for(router).await;

    let page = source.fetch_page(0, 2).await.unwrap();
    assert_eq!(ids(&page), vec![1, 2]);
}

// =============================================================================
// By-id fetches
// =============================================================================

#[tokio::test]
async fn test_fetch_by_id_from_server() {
    let source = source_for(catalog_router(5)).await;

    let slide = source.fetch_by_id(4).await.unwrap();
    assert_eq!(slide.id, 4);

    let err = source.fetch_by_id(99).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_fetch_by_id_server_error_carries_status() {
    let router = Router::new().route(
        "/api/slides/{id}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let source = source_for(router).await;
    let slider = SliderBuilder::new().source(source).build().unwrap();

    let err = slider.fetch_slide_by_id(3).await.unwrap_err();

    match err {
        FetchError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/api/slides/3"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    assert!(slider.get_slide_data(3).is_none());
}

// =============================================================================
// Coordinator over HTTP
// =============================================================================

#[tokio::test]
async fn test_slider_over_http() {
    let source = source_for(catalog_router(8)).await;
    let slider = SliderBuilder::new().source(source).build().unwrap();

    slider.initialize().await.unwrap();
    assert_eq!(ids(&slider.get_slides()), vec![1, 2, 3, 4, 5]);

    // Past the end: one page is loaded, the catalog only has 8 slides
    assert!(!slider.go_to_slide(9).await);
    assert_eq!(slider.get_slides().len(), 8);
    assert_eq!(slider.get_current_index(), 7);
    assert!(slider.has_more_slides());

    // The next load finds nothing
    let result = slider.next_slide().await;
    assert_eq!(result.index, 7);
    assert!(!slider.has_more_slides());
}

#[tokio::test]
async fn test_slider_with_unavailable_catalog_uses_placeholders() {
    let router = Router::new().route("/health", get(|| async { "ok" }));
    let source = source_for(router).await;
    let slider = SliderBuilder::new().source(source).build().unwrap();

    slider.initialize().await.unwrap();

    let slides = slider.get_slides();
    assert_eq!(ids(&slides), vec![1, 2, 3, 4, 5]);
    assert!(slides[0].image.contains("random=1"));
}
