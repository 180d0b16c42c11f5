//! Crawl statistics
//!
//! Counters are updated lock-free from every task; a [`StatsSnapshot`] is a
//! plain copy taken at one moment.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by the engine and its tasks
#[derive(Debug, Default)]
pub struct CrawlStats {
    submitted: AtomicU64,
    duplicates: AtomicU64,
    unrouted: AtomicU64,
    dispatched: AtomicU64,
    fetched: AtomicU64,
    failed: AtomicU64,
    handled: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unrouted(&self) {
        self.unrouted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_handled(&self) {
        self.handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            unrouted: self.unrouted.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the crawl counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Every submission, including duplicates
    pub submitted: u64,
    /// Submissions the bucket had already seen
    pub duplicates: u64,
    /// New URLs no route matched
    pub unrouted: u64,
    /// URLs handed to a task
    pub dispatched: u64,
    /// Pages the retriever returned
    pub fetched: u64,
    /// Pages the retriever failed on
    pub failed: u64,
    /// Handler runs that returned
    pub handled: u64,
}

impl StatsSnapshot {
    /// Share of dispatched URLs that were fetched, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.dispatched > 0 {
            (self.fetched as f64 / self.dispatched as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crawl Statistics ===")?;
        writeln!(f)?;
        writeln!(f, "Submissions:")?;
        writeln!(f, "  Submitted: {}", self.submitted)?;
        writeln!(f, "  Already seen: {}", self.duplicates)?;
        writeln!(f, "  No route: {}", self.unrouted)?;
        writeln!(f, "  Dispatched: {}", self.dispatched)?;
        writeln!(f)?;
        writeln!(f, "Pages:")?;
        writeln!(f, "  Fetched: {}", self.fetched)?;
        writeln!(f, "  Failed: {}", self.failed)?;
        writeln!(f, "  Handled: {}", self.handled)?;
        writeln!(f)?;
        write!(
            f,
            "Success Rate: {:.1}% ({} / {} pages fetched)",
            self.success_rate(),
            self.fetched,
            self.dispatched
        )
    }
}
