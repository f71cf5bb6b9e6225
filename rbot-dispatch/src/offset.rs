//! Shared update offset: the next update id to request.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Monotonically non-decreasing offset, written by the acknowledge stage and read by the poller.
///
/// Cloning shares the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct OffsetTracker {
    value: Arc<AtomicI64>,
    changed: Arc<Notify>,
}

impl OffsetTracker {
    pub fn new(initial: i64) -> Self {
        Self {
            value: Arc::new(AtomicI64::new(initial)),
            changed: Arc::new(Notify::new()),
        }
    }

    pub fn current(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Acknowledges `sequence_id`: the offset becomes `sequence_id + 1` unless already past it.
    /// Returns the offset after the call.
    pub fn acknowledge(&self, sequence_id: i64) -> i64 {
        let next = sequence_id.saturating_add(1);
        let previous = self.value.fetch_max(next, Ordering::AcqRel);
        if next > previous {
            self.changed.notify_waiters();
        }
        previous.max(next)
    }

    /// Resolves once the offset has reached `target`.
    pub async fn reached(&self, target: i64) {
        loop {
            let notified = self.changed.notified();
            if self.current() >= target {
                return;
            }
            notified.await;
        }
    }
}
