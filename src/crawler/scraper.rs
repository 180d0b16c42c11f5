//! The crawl engine
//!
//! [`Scraper`] ties the pieces together: every submitted URL passes the
//! bucket, then the route table, then gets its own task that fetches the page
//! and runs the matched handler. Handlers queue more URLs through the request
//! they were given, which lands back here.

use crate::bucket::Bucket;
use crate::crawler::outstanding::Outstanding;
use crate::crawler::stats::{CrawlStats, StatsSnapshot};
use crate::crawler::{Request, RequestAuth, RequestQueue, Retriever, Submission};
use crate::document::Node;
use crate::routes::{Pattern, Route, RouteSet};
use crate::sink::LogSink;
use crate::ConfigError;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tokio::runtime::Handle;

/// Everything a [`Scraper`] is built from
///
/// The retriever, bucket, and both log sinks are required; construction
/// fails if any is missing.
#[derive(Clone, Default)]
pub struct ScraperConfig {
    pub retriever: Option<Arc<dyn Retriever>>,
    pub bucket: Option<Arc<dyn Bucket>>,
    pub remarks: Option<LogSink>,
    pub debug: Option<LogSink>,
    pub auth: Option<RequestAuth>,
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retriever(mut self, retriever: impl Retriever + 'static) -> Self {
        self.retriever = Some(Arc::new(retriever));
        self
    }

    pub fn bucket(mut self, bucket: impl Bucket + 'static) -> Self {
        self.bucket = Some(Arc::new(bucket));
        self
    }

    pub fn remarks(mut self, sink: LogSink) -> Self {
        self.remarks = Some(sink);
        self
    }

    pub fn debug(mut self, sink: LogSink) -> Self {
        self.debug = Some(sink);
        self
    }

    pub fn auth(mut self, auth: RequestAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Checks that every required collaborator is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retriever.is_none() {
            return Err(ConfigError::Validation(
                "ScraperConfig not valid without a Retriever".to_string(),
            ));
        }
        if self.bucket.is_none() {
            return Err(ConfigError::Validation(
                "ScraperConfig not valid without a Bucket".to_string(),
            ));
        }
        if self.remarks.is_none() {
            return Err(ConfigError::Validation(
                "ScraperConfig not valid without a Remarks sink".to_string(),
            ));
        }
        if self.debug.is_none() {
            return Err(ConfigError::Validation(
                "ScraperConfig not valid without a Debug sink".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ScraperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScraperConfig")
            .field("retriever", &self.retriever.is_some())
            .field("bucket", &self.bucket.is_some())
            .field("remarks", &self.remarks.is_some())
            .field("debug", &self.debug.is_some())
            .field("auth", &self.auth)
            .finish()
    }
}

/// Engine state shared by the handle, its requests, and its tasks
struct Engine {
    me: Weak<Engine>,
    retriever: Arc<dyn Retriever>,
    bucket: Arc<dyn Bucket>,
    remarks: LogSink,
    debug: LogSink,
    auth: Option<RequestAuth>,
    routes: RwLock<RouteSet>,
    outstanding: Arc<Outstanding>,
    stats: Arc<CrawlStats>,
    runtime: Handle,
}

impl Engine {
    fn match_url(&self, url: &str) -> Option<Route> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.match_url(url).cloned()
    }

    /// Spawns the fetch-and-handle task for an admitted, routed request
    ///
    /// The work is registered before this returns, so a handler that queues
    /// links keeps the crawl alive until their tasks finish.
    fn spawn(&self, route: Route, request: Request) {
        let guard = self.outstanding.register();
        let retriever = Arc::clone(&self.retriever);
        let stats = Arc::clone(&self.stats);

        self.stats.record_dispatched();
        self.runtime.spawn(async move {
            let _guard = guard;

            let fetched = retriever.retrieve(&request).await;
            match fetched {
                Ok(document) => {
                    stats.record_fetched();
                    route.handle(&request, document.root(&request));
                    stats.record_handled();
                }
                Err(e) => {
                    stats.record_failed();
                    tracing::debug!(url = %request.url, error = %e, "Fetch failed");
                }
            }
        });
    }
}

impl RequestQueue for Engine {
    fn create_request(&self, url: &str) -> Request {
        let queue: Weak<dyn RequestQueue> = self.me.clone();
        Request::new(url, &self.remarks, &self.debug, self.auth.clone(), queue)
    }

    fn do_request(&self, request: Request) -> Submission {
        self.stats.record_submitted();

        if !self.bucket.check(&request.url) {
            self.stats.record_duplicate();
            tracing::trace!(url = %request.url, "Already seen");
            return Submission::Duplicate;
        }

        match self.match_url(&request.url) {
            Some(route) => {
                request.debug.println("Found a route");
                self.spawn(route, request);
                Submission::Dispatched
            }
            None => {
                request.debug.println("No route found");
                self.stats.record_unrouted();
                Submission::NoRoute
            }
        }
    }
}

/// A concurrent crawl engine
///
/// Cloning yields another handle to the same engine.
///
/// # Example
///
/// ```no_run
/// use scrap::{HttpRetriever, LogSink, MemoryBucket, Scraper, ScraperConfig};
/// use scrap::crawler::HttpOptions;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ScraperConfig::new()
///     .retriever(HttpRetriever::new(&HttpOptions::default())?)
///     .bucket(MemoryBucket::new())
///     .remarks(LogSink::stderr())
///     .debug(LogSink::discard());
/// let scraper = Scraper::new(config)?;
///
/// scraper.add_route("https://example.com/*", |_request, root| {
///     root.find("a").queue();
/// });
///
/// scraper.scrape("https://example.com/");
/// scraper.wait().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Scraper {
    engine: Arc<Engine>,
}

impl Scraper {
    /// Creates an engine from a validated config
    ///
    /// Must be called inside a tokio runtime; fetch tasks are spawned on it.
    pub fn new(config: ScraperConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let runtime = Handle::try_current().map_err(|e| {
            ConfigError::Validation(format!("Scraper needs a running tokio runtime: {}", e))
        })?;

        let (Some(retriever), Some(bucket), Some(remarks), Some(debug)) =
            (config.retriever, config.bucket, config.remarks, config.debug)
        else {
            return Err(ConfigError::Validation(
                "ScraperConfig is incomplete".to_string(),
            ));
        };
        let auth = config.auth;

        let engine = Arc::new_cyclic(|me| Engine {
            me: me.clone(),
            retriever,
            bucket,
            remarks,
            debug,
            auth,
            routes: RwLock::new(RouteSet::new()),
            outstanding: Outstanding::new(),
            stats: Arc::new(CrawlStats::new()),
            runtime,
        });

        Ok(Self { engine })
    }

    /// Registers a route after all routes registered so far
    ///
    /// Routes are meant to be registered before the first submission.
    pub fn add_route<F>(&self, pattern: impl Into<Pattern>, handler: F)
    where
        F: Fn(&Request, Node<'_>) + Send + Sync + 'static,
    {
        self.push_route(Route::new(pattern, handler));
    }

    pub fn push_route(&self, route: Route) {
        let mut routes = self
            .engine
            .routes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        routes.push(route);
    }

    /// Number of registered routes
    pub fn route_count(&self) -> usize {
        self.engine
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Creates a request bound to this engine
    pub fn create_request(&self, url: &str) -> Request {
        self.engine.create_request(url)
    }

    /// Submits a caller-built request
    pub fn do_request(&self, request: Request) -> Submission {
        self.engine.do_request(request)
    }

    /// Creates and submits a request for `url`
    pub fn scrape(&self, url: &str) -> Submission {
        self.do_request(self.create_request(url))
    }

    /// Waits until every dispatched task, and every task they caused, is done
    pub async fn wait(&self) {
        self.engine.outstanding.wait().await
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.engine.stats.snapshot()
    }

    /// This engine as the queue its requests report back to
    pub fn as_queue(&self) -> Arc<dyn RequestQueue> {
        self.engine.clone()
    }
}

impl fmt::Debug for Scraper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scraper")
            .field("routes", &self.route_count())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::MemoryBucket;
    use crate::document::Document;
    use crate::sink::CaptureBuffer;
    use crate::FetchError;
    use async_trait::async_trait;

    struct DummyRetriever;

    #[async_trait]
    impl Retriever for DummyRetriever {
        async fn retrieve(&self, _request: &Request) -> Result<Document, FetchError> {
            Ok(Document::parse("<html></html>"))
        }
    }

    fn full_config(remarks: &CaptureBuffer, debug: &CaptureBuffer) -> ScraperConfig {
        ScraperConfig::new()
            .retriever(DummyRetriever)
            .bucket(MemoryBucket::new())
            .remarks(remarks.sink())
            .debug(debug.sink())
    }

    #[test]
    fn test_validate_complete_config() {
        let buffer = CaptureBuffer::new();
        assert!(full_config(&buffer, &buffer).validate().is_ok());
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let buffer = CaptureBuffer::new();
        let cases = [
            (
                ScraperConfig {
                    retriever: None,
                    ..full_config(&buffer, &buffer)
                },
                "ScraperConfig not valid without a Retriever",
            ),
            (
                ScraperConfig {
                    bucket: None,
                    ..full_config(&buffer, &buffer)
                },
                "ScraperConfig not valid without a Bucket",
            ),
            (
                ScraperConfig {
                    remarks: None,
                    ..full_config(&buffer, &buffer)
                },
                "ScraperConfig not valid without a Remarks sink",
            ),
            (
                ScraperConfig {
                    debug: None,
                    ..full_config(&buffer, &buffer)
                },
                "ScraperConfig not valid without a Debug sink",
            ),
        ];

        for (config, expected) in cases {
            match config.validate() {
                Err(ConfigError::Validation(message)) => assert_eq!(message, expected),
                other => panic!("expected validation error '{}', got {:?}", expected, other),
            }
        }
    }

    #[tokio::test]
    async fn test_bad_config_refuses_construction() {
        assert!(Scraper::new(ScraperConfig::default()).is_err());
    }

    #[test]
    fn test_construction_requires_runtime() {
        let buffer = CaptureBuffer::new();
        let result = Scraper::new(full_config(&buffer, &buffer));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_request() {
        let remarks = CaptureBuffer::new();
        let debug = CaptureBuffer::new();
        let scraper = Scraper::new(full_config(&remarks, &debug)).unwrap();

        let request = scraper.create_request("/");
        assert_eq!(request.url, "/");
        assert!(request.belongs_to(&scraper.as_queue()));
        assert!(request.auth.is_none());

        request.remarks.println("This is a remark");
        request.debug.println("This is a debug note");

        assert_eq!(remarks.contents(), "/: This is a remark\n");
        assert_eq!(debug.contents(), "/: This is a debug note\n");
    }

    #[tokio::test]
    async fn test_create_request_carries_auth() {
        let buffer = CaptureBuffer::new();
        let auth = RequestAuth::new("user", "pass");
        let scraper = Scraper::new(full_config(&buffer, &buffer).auth(auth.clone())).unwrap();

        assert_eq!(scraper.create_request("/").auth, Some(auth));
    }

    #[tokio::test]
    async fn test_submission_outcomes() {
        let remarks = CaptureBuffer::new();
        let debug = CaptureBuffer::new();
        let scraper = Scraper::new(full_config(&remarks, &debug)).unwrap();
        scraper.add_route("/routed*", |_, _| {});

        assert_eq!(scraper.scrape("/routed"), Submission::Dispatched);
        assert_eq!(scraper.scrape("/routed"), Submission::Duplicate);
        assert_eq!(scraper.scrape("/elsewhere"), Submission::NoRoute);
        assert_eq!(scraper.scrape("/elsewhere"), Submission::Duplicate);
        scraper.wait().await;

        assert_eq!(
            debug.lines(),
            vec!["/routed: Found a route", "/elsewhere: No route found"]
        );
        assert_eq!(remarks.contents(), "");

        let stats = scraper.stats();
        assert_eq!(stats.submitted, 4);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(stats.unrouted, 1);
        assert_eq!(stats.dispatched, 1);
        assert_eq!(stats.fetched, 1);
        assert_eq!(stats.handled, 1);
    }

    #[tokio::test]
    async fn test_wait_without_work() {
        let buffer = CaptureBuffer::new();
        let scraper = Scraper::new(full_config(&buffer, &buffer)).unwrap();
        scraper.wait().await;
        assert_eq!(scraper.stats(), StatsSnapshot::default());
    }
}
