//! Configuration module for Scrap
//!
//! This module handles loading, parsing, and validating TOML crawl
//! configurations, and building engine parts from them.
//!
//! # Example
//!
//! ```no_run
//! use scrap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawl starts at: {:?}", config.crawl.start);
//! ```

mod assemble;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuthConfig, BucketConfig, BucketKind, Config, CrawlConfig, HttpConfig, LoggingConfig,
    PatternKind, RouteEntry,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use assemble::{build_pattern, build_route, open_bucket, open_sink, parse_selector};
