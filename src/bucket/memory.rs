use crate::bucket::Bucket;
use crate::url::bucket_key;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Bucket backed by a `HashSet`, forgotten when the process exits
#[derive(Debug, Default)]
pub struct MemoryBucket {
    seen: Mutex<HashSet<String>>,
}

impl MemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys recorded so far
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `url` has been recorded, without recording it
    pub fn contains(&self, url: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&bucket_key(url))
    }
}

impl Bucket for MemoryBucket {
    fn check(&self, url: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(bucket_key(url))
    }
}
