//! Serialized operation queue with per-operation timeout and backpressure.
//!
//! A single worker drains the queue, running at most one operation at a
//! time. Each operation races a timeout; on timeout the caller receives
//! [`QueueError::Timeout`] while the operation itself keeps running detached
//! and its late result is discarded. A short pause separates consecutive
//! operations. When more than `overflow_threshold` operations are waiting,
//! all but the newest `retain` are dropped and settle with
//! [`QueueError::Dropped`].

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use crate::error::QueueError;
use crate::events::panic_message;

/// Default time an operation may run before its caller is rejected.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between two drained operations.
pub const DEFAULT_OPERATION_SPACING: Duration = Duration::from_millis(10);

/// Waiting operations above which the oldest are dropped.
pub const DEFAULT_OVERFLOW_THRESHOLD: usize = 10;

/// Waiting operations kept when the overflow threshold is exceeded.
pub const DEFAULT_OVERFLOW_RETAIN: usize = 5;

/// Tunables for [`OperationQueue`].
#[derive(Debug, Clone)]
pub struct QueueOptions {
    pub timeout: Duration,
    pub spacing: Duration,
    pub overflow_threshold: usize,
    pub overflow_retain: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_OPERATION_TIMEOUT,
            spacing: DEFAULT_OPERATION_SPACING,
            overflow_threshold: DEFAULT_OVERFLOW_THRESHOLD,
            overflow_retain: DEFAULT_OVERFLOW_RETAIN,
        }
    }
}

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Job = Box<dyn FnOnce(Duration) -> JobFuture + Send>;

struct QueueState {
    pending: VecDeque<Job>,
    processing: bool,
}

/// Single-worker FIFO of async operations.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct OperationQueue {
    state: Arc<Mutex<QueueState>>,
    options: QueueOptions,
}

impl OperationQueue {
    /// Create a queue with default options.
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    /// Create a queue with custom options.
    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                pending: VecDeque::new(),
                processing: false,
            })),
            options,
        }
    }

    /// Queue an operation and return a handle to its result.
    ///
    /// The operation is placed in the queue immediately, before the handle
    /// is awaited. Must be called from within a tokio runtime.
    pub fn submit<F, Fut, T>(&self, operation: F) -> PendingResult<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let job: Job = Box::new(move |limit: Duration| -> JobFuture {
            Box::pin(async move {
                // Spawned so a timeout abandons the operation instead of cancelling it
                let handle = tokio::spawn(operation());
                let outcome = match tokio::time::timeout(limit, handle).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(join_error)) => {
                        let message = if join_error.is_panic() {
                            panic_message(join_error.into_panic().as_ref())
                        } else {
                            join_error.to_string()
                        };
                        Err(QueueError::Failed(message))
                    }
                    Err(_) => Err(QueueError::Timeout(limit)),
                };

                if let Err(ref e) = outcome {
                    error!("Error in navigation operation: {}", e);
                }
                let _ = tx.send(outcome);
            })
        });

        let start_worker = {
            let mut state = self.lock();
            if state.pending.len() > self.options.overflow_threshold {
                let excess = state
                    .pending
                    .len()
                    .saturating_sub(self.options.overflow_retain);
                warn!(
                    dropped = excess,
                    "Operation queue is too long, clearing oldest operations"
                );
                state.pending.drain(..excess);
            }
            state.pending.push_back(job);
            !std::mem::replace(&mut state.processing, true)
        };

        if start_worker {
            tokio::spawn(drain(Arc::clone(&self.state), self.options.clone()));
        }

        PendingResult { rx }
    }

    /// Queue an operation and wait for its result.
    pub async fn enqueue<F, Fut, T>(&self, operation: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.submit(operation).await
    }

    /// Drop every waiting operation. The running one, if any, is unaffected.
    pub fn clear(&self) {
        let dropped = {
            let mut state = self.lock();
            std::mem::take(&mut state.pending)
        };
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "Navigation queue cleared");
        }
    }

    /// Number of operations waiting to run.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Check whether no operation is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether a worker is currently draining the queue.
    pub fn is_processing(&self) -> bool {
        self.lock().processing
    }

    /// The options this queue was created with.
    pub fn options(&self) -> &QueueOptions {
        &self.options
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OperationQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker loop: run queued jobs one at a time until the queue is empty.
async fn drain(state: Arc<Mutex<QueueState>>, options: QueueOptions) {
    loop {
        let job = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            match state.pending.pop_front() {
                Some(job) => job,
                None => {
                    state.processing = false;
                    return;
                }
            }
        };

        job(options.timeout).await;
        tokio::time::sleep(options.spacing).await;
    }
}

/// Result handle returned by [`OperationQueue::submit`].
///
/// Resolves once the operation settles. Resolves to
/// [`QueueError::Dropped`] if the operation was discarded before running.
pub struct PendingResult<T> {
    rx: oneshot::Receiver<Result<T, QueueError>>,
}

impl<T> Future for PendingResult<T> {
    type Output = Result<T, QueueError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(QueueError::Dropped)))
    }
}
