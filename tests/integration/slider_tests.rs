//! Coordinator tests: lifecycle, navigation contracts and paged loading.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slide_carousel::{
    FetchError, Slide, SlideDataChanged, SlideList, SliderError, SliderOptions, SliderPhase,
};

use super::test_utils::{ids, recorder, slider, slider_with, wait_until, MockSlideSource};

// =============================================================================
// Initialization
// =============================================================================

#[tokio::test]
async fn test_initialize_emits_slides_then_index() {
    let slider = slider(MockSlideSource::unbounded());

    let events = Arc::new(Mutex::new(Vec::new()));
    let e = events.clone();
    let _ = slider.subscribe_to_slides(move |slides: &SlideList| {
        e.lock().unwrap().push(format!("slidesChanged:{:?}", ids(slides)));
    });
    let e = events.clone();
    let _ = slider.subscribe_to_index(move |index| {
        e.lock().unwrap().push(format!("indexChanged:{}", index));
    });

    slider.initialize().await.unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec!["slidesChanged:[1, 2, 3, 4, 5]", "indexChanged:0"]
    );
    assert_eq!(slider.phase(), SliderPhase::Ready);
    assert_eq!(slider.get_current_index(), 0);
    assert!(slider.has_more_slides());
}

#[tokio::test(start_paused = true)]
async fn test_initialize_failure_is_emitted_and_returned() {
    let slider = slider(MockSlideSource::unbounded().failing(usize::MAX));
    let (errors, on_error) = recorder::<SliderError>();
    let _ = slider.subscribe_to_initialization_error(on_error);

    let started = tokio::time::Instant::now();
    let err = slider.initialize().await.unwrap_err();

    // 1 + 2 + 3 seconds of backoff between four attempts
    assert!(started.elapsed() >= Duration::from_secs(6));
    assert!(matches!(
        err,
        SliderError::Initialization {
            attempts: 4,
            source: FetchError::Transport(_)
        }
    ));
    assert_eq!(errors.lock().unwrap().len(), 1);
    assert_eq!(slider.phase(), SliderPhase::Error);
    assert!(slider.get_slides().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_initialize_can_be_retried_after_error() {
    let slider = slider(MockSlideSource::unbounded().failing(4));

    assert!(slider.initialize().await.is_err());
    slider.initialize().await.unwrap();

    assert_eq!(slider.phase(), SliderPhase::Ready);
    assert_eq!(ids(&slider.get_slides()), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_concurrent_initialize_loads_once() {
    let slider = slider(MockSlideSource::unbounded());

    let (a, b) = tokio::join!(slider.initialize(), slider.initialize());
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(slider.repository().source().page_calls(), 1);
}

// =============================================================================
// goToSlide
// =============================================================================

#[tokio::test]
async fn test_go_to_negative_index_is_rejected() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();
    slider.go_to_slide(2).await;

    let (indices, on_index) = recorder::<usize>();
    let _ = slider.subscribe_to_index(on_index);

    assert!(!slider.go_to_slide(-3).await);
    assert_eq!(slider.get_current_index(), 2);
    assert!(indices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_go_to_index_in_bounds() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    let (indices, on_index) = recorder::<usize>();
    let _ = slider.subscribe_to_index(on_index);

    assert!(slider.go_to_slide(3).await);
    assert_eq!(slider.get_current_index(), 3);
    assert_eq!(*indices.lock().unwrap(), vec![3]);
    assert_eq!(slider.repository().source().page_calls(), 1);
}

#[tokio::test]
async fn test_go_to_index_past_end_loads_one_page() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    let (lists, on_slides) = recorder::<SlideList>();
    let _ = slider.subscribe_to_slides(on_slides);

    assert!(slider.go_to_slide(7).await);
    assert_eq!(slider.get_current_index(), 7);
    assert_eq!(slider.get_slides().len(), 10);
    assert_eq!(lists.lock().unwrap().len(), 1);
    assert_eq!(slider.repository().source().page_requests(), vec![(0, 5), (5, 5)]);
}

#[tokio::test]
async fn test_go_to_index_beyond_next_page_falls_back_to_last() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    let (indices, on_index) = recorder::<usize>();
    let _ = slider.subscribe_to_index(on_index);

    assert!(!slider.go_to_slide(42).await);
    assert_eq!(slider.get_slides().len(), 10);
    assert_eq!(slider.get_current_index(), 9);
    assert_eq!(*indices.lock().unwrap(), vec![9]);
}

#[tokio::test]
async fn test_go_to_index_past_end_when_exhausted() {
    let slider = slider(MockSlideSource::with_total(5));
    slider.initialize().await.unwrap();

    // The first attempt discovers the end of the source
    assert!(!slider.go_to_slide(6).await);
    assert!(!slider.has_more_slides());
    assert_eq!(slider.get_current_index(), 4);

    let calls = slider.repository().source().page_calls();
    assert!(!slider.go_to_slide(6).await);
    assert_eq!(slider.repository().source().page_calls(), calls);
}

// =============================================================================
// nextSlide / prevSlide
// =============================================================================

#[tokio::test]
async fn test_next_slide_within_bounds_returns_no_list() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    let result = slider.next_slide().await;

    assert_eq!(result.slides, None);
    assert_eq!(result.index, 1);
    assert_eq!(slider.get_current_index(), 1);
}

#[tokio::test]
async fn test_next_slide_at_end_loads_more() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();
    assert!(slider.go_to_slide(4).await);

    let result = slider.next_slide().await;

    let slides = result.slides.expect("list should be returned after a load");
    assert_eq!(ids(&slides), (1..=10).collect::<Vec<_>>());
    assert_eq!(result.index, 5);
    assert_eq!(slider.get_current_index(), 5);
}

#[tokio::test]
async fn test_next_slide_past_end_of_exhausted_source() {
    let slider = slider(MockSlideSource::with_total(5));
    let (has_more, on_has_more) = recorder::<bool>();
    let _ = slider.subscribe_to_has_more(on_has_more);

    slider.initialize().await.unwrap();
    slider.go_to_slide(4).await;

    let result = slider.next_slide().await;
    assert_eq!(result.index, 4);
    assert_eq!(result.slides.map(|s| s.len()), Some(5));
    assert!(!slider.has_more_slides());
    assert_eq!(*has_more.lock().unwrap(), vec![false]);

    let result = slider.next_slide().await;
    assert_eq!(result.index, 4);
    assert!(!slider.can_go_next());
}

#[tokio::test]
async fn test_next_slide_prefetches_near_the_end() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    // index 0 -> 1 -> 2 stays clear of the end
    slider.next_slide().await;
    slider.next_slide().await;
    assert_eq!(slider.repository().source().page_calls(), 1);

    // index 3 is within two slides of the end of a 5-slide list
    let result = slider.next_slide().await;
    assert_eq!(result.slides, None);
    assert_eq!(result.index, 3);

    wait_until(|| slider.get_slides().len() == 10 && !slider.is_loading_state()).await;
    assert_eq!(slider.repository().source().page_requests(), vec![(0, 5), (5, 5)]);
    assert_eq!(slider.get_current_index(), 3);
}

#[tokio::test]
async fn test_prev_slide() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    assert!(!slider.prev_slide().await);
    assert_eq!(slider.get_current_index(), 0);

    slider.go_to_slide(2).await;
    assert!(slider.prev_slide().await);
    assert_eq!(slider.get_current_index(), 1);
    assert!(slider.can_go_prev());
}

// =============================================================================
// Paged loading
// =============================================================================

#[tokio::test]
async fn test_page_offsets_have_no_gaps() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    slider.load_more_slides(3).await;
    slider.load_more_slides(7).await;
    assert!(slider.go_to_slide(17).await);
    slider.load_more_slides(5).await;

    let requests = slider.repository().source().page_requests();
    assert_eq!(requests, vec![(0, 5), (5, 3), (8, 7), (15, 5), (20, 5)]);

    let slides = slider.get_slides();
    let unique: HashSet<_> = slides.iter().map(|s| s.id).collect();
    assert_eq!(unique.len(), slides.len());
    assert_eq!(ids(&slides), (1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_has_more_never_flips_back() {
    let slider = slider(MockSlideSource::with_total(8));
    slider.initialize().await.unwrap();

    assert_eq!(slider.load_more_slides(5).await.len(), 8);
    assert!(slider.has_more_slides());

    assert_eq!(slider.load_more_slides(5).await.len(), 8);
    assert!(!slider.has_more_slides());

    for _ in 0..3 {
        slider.load_more_slides(5).await;
        slider.next_slide().await;
        assert!(!slider.has_more_slides());
    }
    assert_eq!(slider.repository().source().page_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_load_more_retries_with_backoff() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();
    slider.repository().source().fail_next(2);

    let started = tokio::time::Instant::now();
    let slides = slider.load_more_slides(5).await;

    assert_eq!(slides.len(), 10);
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(
        slider.repository().source().page_requests(),
        vec![(0, 5), (5, 5), (5, 5), (5, 5)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_load_more_gives_up_and_keeps_list() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();
    slider.repository().source().fail_next(usize::MAX);

    let (loading, on_loading) = recorder::<bool>();
    let _ = slider.subscribe_to_loading(on_loading);

    let slides = slider.load_more_slides(5).await;

    assert_eq!(ids(&slides), vec![1, 2, 3, 4, 5]);
    assert!(slider.has_more_slides());
    assert!(!slider.is_loading_state());
    assert_eq!(*loading.lock().unwrap(), vec![true, false]);
    // first attempt plus three retries
    assert_eq!(slider.repository().source().page_calls(), 5);
}

#[tokio::test]
async fn test_overlapping_loads_share_one_request() {
    let (source, gate) = MockSlideSource::unbounded().gated();
    let slider = slider_with(source, SliderOptions::default());

    gate.add_permits(1);
    slider.initialize().await.unwrap();

    let (loading, on_loading) = recorder::<bool>();
    let _ = slider.subscribe_to_loading(on_loading);

    let first = tokio::spawn({
        let slider = slider.clone();
        async move { slider.load_more_slides(5).await }
    });
    wait_until(|| slider.is_loading_state()).await;

    // Rejected by the in-flight guard without touching the source
    let second = slider.load_more_slides(5).await;
    assert_eq!(second.len(), 5);
    assert!(slider.is_loading_state());

    gate.add_permits(1);
    assert_eq!(first.await.unwrap().len(), 10);

    assert!(!slider.is_loading_state());
    assert_eq!(*loading.lock().unwrap(), vec![true, false]);
    assert_eq!(slider.repository().source().page_calls(), 2);
}

#[tokio::test]
async fn test_navigation_is_pending_while_loading() {
    let (source, gate) = MockSlideSource::unbounded().gated();
    let slider = slider_with(source, SliderOptions::default());

    gate.add_permits(1);
    slider.initialize().await.unwrap();
    slider.go_to_slide(4).await;
    assert!(!slider.has_pending_operations());

    let next = tokio::spawn({
        let slider = slider.clone();
        async move { slider.next_slide().await }
    });
    wait_until(|| slider.is_loading_state()).await;
    assert!(slider.has_pending_operations());

    gate.add_permits(1);
    let result = next.await.unwrap();
    assert_eq!(result.index, 5);
    assert!(!slider.has_pending_operations());
    assert!(!slider.is_loading_state());
}

// =============================================================================
// Slide data
// =============================================================================

#[tokio::test]
async fn test_slide_data_events_during_initialize() {
    let slider = slider(MockSlideSource::unbounded());
    let (changes, on_change) = recorder::<SlideDataChanged>();
    let _ = slider.subscribe_to_slide_data(on_change);

    slider.initialize().await.unwrap();

    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 5);
    assert!(changes.iter().all(|c| c.is_new));
    assert_eq!(changes[0].slide_id, 1);
    assert_eq!(slider.get_slide_data(3).map(|s| s.id), Some(3));
    assert!(slider.get_slide_data(6).is_none());
}

#[tokio::test]
async fn test_fetch_slide_by_id_uses_lookup_first() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    let (changes, on_change) = recorder::<SlideDataChanged>();
    let _ = slider.subscribe_to_slide_data(on_change);

    // Known: no event, no source call
    assert_eq!(slider.fetch_slide_by_id(2).await.unwrap().id, 2);
    assert!(changes.lock().unwrap().is_empty());

    // Unknown: fetched and upserted
    assert_eq!(slider.fetch_slide_by_id(40).await.unwrap().title, "Slide 40");
    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].slide_id, 40);
    assert!(changes[0].is_new);
}

#[tokio::test]
async fn test_fetch_slide_by_id_propagates_status() {
    let slider = slider(MockSlideSource::unbounded().by_id_status(500));

    let err = slider.fetch_slide_by_id(3).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_observe_slide_delivers_current_value() {
    let slider = slider(MockSlideSource::unbounded());
    slider.initialize().await.unwrap();

    let (seen, on_slide) = recorder::<Slide>();
    let _ = slider.observe_slide(4).subscribe(on_slide);

    wait_until(|| !seen.lock().unwrap().is_empty()).await;
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, 4);
}

// =============================================================================
// Events and templates
// =============================================================================

#[tokio::test]
async fn test_unsubscribed_callback_is_not_called() {
    let slider = slider(MockSlideSource::unbounded());
    let (indices, on_index) = recorder::<usize>();
    let subscription = slider.subscribe_to_index(on_index);

    slider.initialize().await.unwrap();
    subscription.unsubscribe();
    slider.next_slide().await;

    assert_eq!(*indices.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn test_panicking_subscriber_does_not_break_navigation() {
    let slider = slider(MockSlideSource::unbounded());
    let _ = slider.subscribe_to_index(|_| panic!("ui blew up"));
    let (indices, on_index) = recorder::<usize>();
    let _ = slider.subscribe_to_index(on_index);

    slider.initialize().await.unwrap();
    assert!(slider.go_to_slide(2).await);

    assert_eq!(*indices.lock().unwrap(), vec![0, 2]);
}

#[tokio::test]
async fn test_template_registration() {
    let slider = slider(MockSlideSource::unbounded());
    let names = Arc::new(Mutex::new(Vec::new()));
    let n = names.clone();
    let _ = slider.subscribe_to_templates(move |event| n.lock().unwrap().push(event.name.clone()));

    slider.register_template("caption", Arc::new(|s: &Slide| s.title.to_uppercase()));
    slider.initialize().await.unwrap();

    let slides = slider.get_slides();
    assert_eq!((slider.get_template("caption"))(&slides[0]), "SLIDE 1");
    assert!((slider.get_template("unknown"))(&slides[0]).contains("slide-content"));
    assert_eq!(*names.lock().unwrap(), vec!["caption".to_string()]);
}
