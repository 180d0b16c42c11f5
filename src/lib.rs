//! Scrap: a route-dispatching concurrent crawl engine
//!
//! This crate fetches pages, dispatches each fetched URL to the first matching
//! route handler, and lets handlers select elements and queue the links they
//! find. Every URL passes a dedup gate before it is fetched, and the caller can
//! wait for the whole crawl to drain.

pub mod bucket;
pub mod config;
pub mod crawler;
pub mod document;
pub mod routes;
pub mod sink;
pub mod url;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid route pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Errors a retriever reports for a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Cannot fetch {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("No page for {url}")]
    NotFound { url: String },
}

/// Dedup bucket errors
#[derive(Debug, Error)]
pub enum BucketError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for bucket operations
pub type BucketResult<T> = std::result::Result<T, BucketError>;

// Re-export commonly used types
pub use bucket::{Bucket, MemoryBucket, SqliteBucket};
pub use crawler::{
    HttpRetriever, Request, RequestAuth, RequestQueue, Retriever, Scraper, ScraperConfig,
    StatsSnapshot, Submission,
};
pub use document::{Document, Node, NodeSet};
pub use routes::{Pattern, Route, RouteSet};
pub use sink::{CaptureBuffer, LogSink, Logger};
