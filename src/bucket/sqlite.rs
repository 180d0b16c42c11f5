//! SQLite bucket implementation
//!
//! The check and the record are a single `INSERT OR IGNORE`, so concurrent
//! submitters race inside SQLite rather than in this process.

use crate::bucket::schema::initialize_schema;
use crate::bucket::Bucket;
use crate::url::bucket_key;
use crate::BucketResult;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Bucket persisted in a SQLite database
///
/// A crawl that reopens the same database skips every URL an earlier run
/// already admitted.
#[derive(Debug)]
pub struct SqliteBucket {
    conn: Mutex<Connection>,
}

impl SqliteBucket {
    /// Opens or creates the bucket database at `path`
    pub fn open(path: &Path) -> BucketResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a bucket that lives only as long as this value
    pub fn in_memory() -> BucketResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Records `url` if it is new, reporting whether it was
    pub fn try_check(&self, url: &str) -> BucketResult<bool> {
        let key = bucket_key(url);
        let now = Utc::now().to_rfc3339();

        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO seen_urls (url, first_seen) VALUES (?1, ?2)",
            params![key, now],
        )?;
        Ok(inserted == 1)
    }

    /// Whether `url` has been recorded, without recording it
    pub fn contains(&self, url: &str) -> BucketResult<bool> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let found = conn
            .query_row(
                "SELECT 1 FROM seen_urls WHERE url = ?1",
                params![bucket_key(url)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// When `url` was first admitted, as an RFC 3339 timestamp
    pub fn first_seen(&self, url: &str) -> BucketResult<Option<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let first_seen = conn
            .query_row(
                "SELECT first_seen FROM seen_urls WHERE url = ?1",
                params![bucket_key(url)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(first_seen)
    }

    /// Number of URLs recorded
    pub fn len(&self) -> BucketResult<u64> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM seen_urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn is_empty(&self) -> BucketResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Bucket for SqliteBucket {
    /// A database error counts as "seen", so a failing bucket never lets a
    /// URL through twice
    fn check(&self, url: &str) -> bool {
        match self.try_check(url) {
            Ok(new) => new,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Bucket check failed, skipping URL");
                false
            }
        }
    }
}
