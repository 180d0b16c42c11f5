//! Outstanding-work counter behind `Scraper::wait`
//!
//! Work is registered synchronously, before the submitting call returns, and
//! released when its guard drops at the end of the spawned task. A handler's
//! own guard is still held while it submits new URLs, so the count can only
//! reach zero once no task is left that could submit more.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub(crate) struct Outstanding {
    count: AtomicUsize,
    idle: Notify,
}

impl Outstanding {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of work; it stays outstanding until the guard drops
    pub(crate) fn register(self: &Arc<Self>) -> WorkGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            outstanding: Arc::clone(self),
        }
    }

    fn release(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Resolves once the count is zero
    pub(crate) async fn wait(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Subscribe before reading the count so a release in between
            // cannot be missed
            notified.as_mut().enable();

            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }

            notified.await;
        }
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Releases one unit of outstanding work on drop
#[derive(Debug)]
pub(crate) struct WorkGuard {
    outstanding: Arc<Outstanding>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.outstanding.release();
    }
}
