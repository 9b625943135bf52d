//! Strictly sequential, rate-limited execution of per-item operations.
//!
//! Items run one at a time in input order. After each item the observer
//! hears about it, and before the next item the sequencer sleeps for a
//! fixed delay to stay under the Meta API's rate ceiling (roughly 200
//! calls per hour). The first failing item aborts the batch; there is no
//! retry.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{ApiError, BulkError};

/// Delay between generic bulk actions.
pub const DEFAULT_BULK_DELAY: Duration = Duration::from_millis(500);

/// Delay between duplication requests.
pub const DEFAULT_DUPLICATE_DELAY: Duration = Duration::from_millis(300);

/// Position reported after an item resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub current: usize,
    pub total: usize,
}

/// Callbacks invoked by [`Sequencer::run`] as items resolve.
pub trait SequenceObserver<T, R> {
    /// Called with an item's output as soon as it succeeds, before the
    /// progress update for that item.
    fn on_success(&mut self, item: &T, output: R);

    /// Called once per resolved item, success or failure.
    fn on_progress(&mut self, step: Step);
}

/// Runs a list of async operations one at a time with a fixed gap.
#[derive(Debug, Clone)]
pub struct Sequencer {
    delay: Duration,
    cancel: Option<CancellationToken>,
}

impl Sequencer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            cancel: None,
        }
    }

    /// Bind the sequencer to a cancellation scope. Cancellation is seen
    /// before each item and during the inter-item delay; an in-flight
    /// request always runs to completion.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Execute `op` for each item in order.
    ///
    /// Returns the number of items processed. On the first failure the
    /// remaining items are skipped and [`BulkError::ItemFailed`] is
    /// returned; rolling back is the caller's job.
    pub async fn run<T, R, F, Fut, O>(
        &self,
        items: &[T],
        mut op: F,
        observer: &mut O,
    ) -> Result<usize, BulkError>
    where
        T: Display,
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
        O: SequenceObserver<T, R>,
    {
        let total = items.len();

        for (index, item) in items.iter().enumerate() {
            if self.is_cancelled() {
                return Err(BulkError::Cancelled {
                    completed: index,
                    total,
                });
            }

            debug!(%item, step = index + 1, total, "sequencer step");
            let outcome = op(item).await;
            let step = Step {
                current: index + 1,
                total,
            };

            match outcome {
                Ok(output) => {
                    observer.on_success(item, output);
                    observer.on_progress(step);
                }
                Err(source) => {
                    observer.on_progress(step);
                    return Err(BulkError::ItemFailed {
                        item: item.to_string(),
                        completed: index,
                        total,
                        source,
                    });
                }
            }

            if step.current < total {
                self.pause(step.current, total).await?;
            }
        }

        Ok(total)
    }

    async fn pause(&self, completed: usize, total: usize) -> Result<(), BulkError> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => Err(BulkError::Cancelled { completed, total }),
                    _ = tokio::time::sleep(self.delay) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep(self.delay).await;
                Ok(())
            }
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(DEFAULT_BULK_DELAY)
    }
}
