//! Crawl engine and the request lifecycle
//!
//! This module contains the concurrent part of the crate:
//! - Requests and the queue they report back to
//! - Page retrieval behind the [`Retriever`] seam
//! - The [`Scraper`] engine with its dedup, routing, and fan-out
//! - Outstanding-work tracking for [`Scraper::wait`]
//! - Crawl statistics

mod outstanding;
mod request;
mod retriever;
mod scraper;
mod stats;

pub use request::{Request, RequestAuth, RequestQueue, Submission};
pub use retriever::{build_http_client, HttpOptions, HttpRetriever, Retriever};
pub use scraper::{Scraper, ScraperConfig};
pub use stats::{CrawlStats, StatsSnapshot};
