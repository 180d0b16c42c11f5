//! Dedup gate for submitted URLs
//!
//! This module handles the "have we seen this URL" question for the engine:
//! - The [`Bucket`] trait the engine checks every submission against
//! - An in-memory bucket for single runs
//! - A SQLite bucket that survives restarts

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryBucket;
pub use sqlite::SqliteBucket;

use std::sync::Arc;

/// Check-and-record set of URLs
///
/// `check` returns `true` exactly once per URL key: the first call records the
/// URL and every later call returns `false`. Implementations must make the
/// check and the record one atomic step, since links found on different pages
/// are submitted from different tasks at the same time.
pub trait Bucket: Send + Sync {
    fn check(&self, url: &str) -> bool;
}

impl<B: Bucket + ?Sized> Bucket for Arc<B> {
    fn check(&self, url: &str) -> bool {
        (**self).check(url)
    }
}

impl<B: Bucket + ?Sized> Bucket for Box<B> {
    fn check(&self, url: &str) -> bool {
        (**self).check(url)
    }
}
