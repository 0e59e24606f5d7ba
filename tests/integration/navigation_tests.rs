//! Navigation queue and navigation state tests through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slide_carousel::{
    placeholder_slides, IndexChange, NavigationState, OperationQueue, QueueError, QueueOptions,
};

// =============================================================================
// Operation Queue
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_navigation_storm_settles_every_operation() {
    let queue = OperationQueue::new();
    let completed = Arc::new(AtomicUsize::new(0));

    let pending: Vec<_> = (0..15)
        .map(|i| {
            let completed = Arc::clone(&completed);
            queue.submit(move || async move {
                completed.fetch_add(1, Ordering::SeqCst);
                i
            })
        })
        .collect();

    // Nothing has run yet, the overflow valve kept only the newest ones
    assert!(queue.len() <= 10);

    let mut resolved = Vec::new();
    let mut dropped = 0;
    for result in pending {
        match result.await {
            Ok(value) => resolved.push(value),
            Err(QueueError::Dropped) => dropped += 1,
            Err(other) => panic!("unexpected queue error: {other}"),
        }
    }

    assert_eq!(resolved.len() + dropped, 15);
    assert!(dropped > 0);
    assert_eq!(completed.load(Ordering::SeqCst), resolved.len());
    // Retained operations complete in submission order
    let mut sorted = resolved.clone();
    sorted.sort_unstable();
    assert_eq!(resolved, sorted);
    assert_eq!(resolved.last(), Some(&14));
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_rejects_caller_but_queue_continues() {
    let queue = OperationQueue::with_options(QueueOptions {
        timeout: Duration::from_millis(100),
        ..QueueOptions::default()
    });

    let slow = queue.submit(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "slow"
    });
    let fast = queue.submit(|| async { "fast" });

    assert_eq!(slow.await, Err(QueueError::Timeout(Duration::from_millis(100))));
    assert_eq!(fast.await, Ok("fast"));
}

// =============================================================================
// Navigation State
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_index_updates_from_many_tasks_are_serialized() {
    let navigation = NavigationState::new();
    navigation.set_slides(placeholder_slides(0, 20).into());

    let changes = Arc::new(Mutex::new(Vec::new()));
    let c = changes.clone();
    let _ = navigation.on_change(move |change: &IndexChange| c.lock().unwrap().push(*change));

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let navigation = navigation.clone();
            tokio::spawn(async move { navigation.set_index(i * 3).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    // Each change starts where the previous one ended
    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 5);
    for pair in changes.windows(2) {
        assert_eq!(pair[1].old_index, pair[0].new_index);
    }
    assert_eq!(changes.last().map(|c| c.new_index), Some(navigation.get_index()));
}

#[tokio::test]
async fn test_clear_queue_keeps_current_index() {
    let navigation = NavigationState::new();
    navigation.set_slides(placeholder_slides(0, 5).into());
    navigation.set_index(2).await;

    navigation.clear_queue();

    assert_eq!(navigation.get_index(), 2);
    assert!(navigation.queue().is_empty());
    assert!(navigation.set_index(4).await);
    assert_eq!(navigation.get_index(), 4);
}
