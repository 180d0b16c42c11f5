//! Turning a loaded [`Config`](crate::config::Config) into engine parts
//!
//! Each helper builds one collaborator: HTTP options, the bucket, log sinks,
//! and the routes with their follow and remark handlers.

use crate::bucket::{Bucket, MemoryBucket, SqliteBucket};
use crate::config::types::{AuthConfig, BucketConfig, BucketKind, HttpConfig, PatternKind, RouteEntry};
use crate::crawler::{HttpOptions, Request, RequestAuth};
use crate::document::{describe_selector_error, Node};
use crate::routes::{Pattern, Route};
use crate::sink::LogSink;
use crate::url::resolve_link;
use crate::{BucketResult, ConfigError, ConfigResult};
use scraper::Selector;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

impl From<&HttpConfig> for HttpOptions {
    fn from(config: &HttpConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            max_redirects: config.max_redirects,
        }
    }
}

impl From<&AuthConfig> for RequestAuth {
    fn from(config: &AuthConfig) -> Self {
        RequestAuth::new(config.username.clone(), config.password.clone())
    }
}

/// Compiles a route entry's pattern according to its kind
pub fn build_pattern(entry: &RouteEntry) -> ConfigResult<Pattern> {
    match entry.kind {
        PatternKind::Glob => Ok(Pattern::glob(entry.pattern.as_str())),
        PatternKind::Prefix => Ok(Pattern::prefix(entry.pattern.as_str())),
        PatternKind::Exact => Ok(Pattern::exact(entry.pattern.as_str())),
        PatternKind::Regex => Pattern::regex(&entry.pattern),
    }
}

pub fn parse_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(describe_selector_error(selector, &e)))
}

/// Builds a route whose handler remarks and follows what its selectors match
///
/// The remark selector runs first: the trimmed text of every match is written
/// to the request's remarks log. Then every `href` under each follow selector
/// is resolved against the page URL and queued on the request's engine.
pub fn build_route(entry: &RouteEntry) -> ConfigResult<Route> {
    let pattern = build_pattern(entry)?;
    let follow = entry
        .follow
        .iter()
        .map(|s| parse_selector(s))
        .collect::<ConfigResult<Vec<_>>>()?;
    let remark = entry.remark.as_deref().map(parse_selector).transpose()?;

    Ok(Route::new(pattern, move |request: &Request, root: Node<'_>| {
        if let Some(selector) = &remark {
            remark_text(request, root, selector);
        }
        if !follow.is_empty() {
            follow_links(request, root, &follow);
        }
    }))
}

fn remark_text(request: &Request, root: Node<'_>, selector: &Selector) {
    for node in root.select(selector).iter() {
        let text = node.text();
        let text = text.trim();
        if !text.is_empty() {
            request.remarks.println(text);
        }
    }
}

fn follow_links(request: &Request, root: Node<'_>, selectors: &[Selector]) {
    let base = match Url::parse(&request.url) {
        Ok(base) => base,
        Err(e) => {
            request
                .debug
                .println(format!("Cannot resolve links against page URL: {}", e));
            return;
        }
    };

    for selector in selectors {
        for node in root.select(selector).iter() {
            let Some(href) = node.attr("href") else {
                continue;
            };
            match resolve_link(href, &base) {
                Some(link) => {
                    request.enqueue(&link);
                }
                None => tracing::trace!(href = %href, "Skipping link"),
            }
        }
    }
}

/// Opens the bucket the config selects
pub fn open_bucket(config: &BucketConfig) -> BucketResult<Arc<dyn Bucket>> {
    match (config.kind, config.path.as_deref()) {
        (BucketKind::Sqlite, Some(path)) => Ok(Arc::new(SqliteBucket::open(Path::new(path))?)),
        (BucketKind::Sqlite, None) => Ok(Arc::new(SqliteBucket::in_memory()?)),
        (BucketKind::Memory, _) => Ok(Arc::new(MemoryBucket::new())),
    }
}

/// Opens a sink appending to `path`, or stderr when there is none
pub fn open_sink(path: Option<&str>) -> io::Result<LogSink> {
    match path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(LogSink::new(file))
        }
        None => Ok(LogSink::stderr()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{RequestQueue, Submission};
    use crate::document::Document;
    use crate::sink::CaptureBuffer;
    use std::sync::{Mutex, Weak};
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head><title> Docs home </title></head><body>
        <nav><a href="/guide">Guide</a><a href="mailto:team@example.com">Mail</a></nav>
        <main><a href="next">Next</a><a name="top">Top</a></main>
    </body></html>"#;

    struct TestQueue {
        me: Weak<TestQueue>,
        remarks: CaptureBuffer,
        queued: Mutex<Vec<String>>,
    }

    impl RequestQueue for TestQueue {
        fn create_request(&self, url: &str) -> Request {
            let queue: Weak<dyn RequestQueue> = self.me.clone();
            Request::new(url, &self.remarks.sink(), &LogSink::discard(), None, queue)
        }

        fn do_request(&self, request: Request) -> Submission {
            self.queued.lock().unwrap().push(request.url);
            Submission::Dispatched
        }
    }

    fn test_queue() -> Arc<TestQueue> {
        Arc::new_cyclic(|me| TestQueue {
            me: me.clone(),
            remarks: CaptureBuffer::new(),
            queued: Mutex::new(Vec::new()),
        })
    }

    fn entry(kind: PatternKind, pattern: &str) -> RouteEntry {
        RouteEntry {
            pattern: pattern.to_string(),
            kind,
            follow: vec![],
            remark: None,
        }
    }

    #[test]
    fn test_build_pattern_by_kind() {
        let url = "https://example.com/docs/1";

        assert!(build_pattern(&entry(PatternKind::Glob, "https://example.com/*"))
            .unwrap()
            .matches(url));
        assert!(build_pattern(&entry(PatternKind::Prefix, "https://example.com/docs"))
            .unwrap()
            .matches(url));
        assert!(!build_pattern(&entry(PatternKind::Exact, "https://example.com/docs"))
            .unwrap()
            .matches(url));
        assert!(build_pattern(&entry(PatternKind::Regex, r"/docs/\d+$"))
            .unwrap()
            .matches(url));
    }

    #[test]
    fn test_parse_selector_error() {
        assert!(parse_selector("a[href]").is_ok());
        assert!(matches!(
            parse_selector("a[").unwrap_err(),
            ConfigError::InvalidSelector(_)
        ));

        match parse_selector("*&{").unwrap_err() {
            ConfigError::InvalidSelector(message) => {
                assert!(message.starts_with("Invalid selector \"*&{\": "));
                assert!(!message.contains('\n'));
            }
            other => panic!("expected invalid selector, got {:?}", other),
        }
    }

    #[test]
    fn test_route_follows_resolved_links() {
        let queue = test_queue();
        let request = queue.create_request("https://example.com/docs/");
        let document = Document::parse(PAGE);

        let mut config = entry(PatternKind::Glob, "*");
        config.follow = vec!["nav a".to_string(), "main a".to_string()];
        let route = build_route(&config).unwrap();
        route.handle(&request, document.root(&request));

        assert_eq!(
            *queue.queued.lock().unwrap(),
            vec![
                "https://example.com/guide".to_string(),
                "https://example.com/docs/next".to_string(),
            ]
        );
        assert_eq!(queue.remarks.contents(), "");
    }

    #[test]
    fn test_route_remarks_trimmed_text() {
        let queue = test_queue();
        let request = queue.create_request("https://example.com/");
        let document = Document::parse(PAGE);

        let mut config = entry(PatternKind::Glob, "*");
        config.remark = Some("title".to_string());
        build_route(&config)
            .unwrap()
            .handle(&request, document.root(&request));

        assert_eq!(queue.remarks.contents(), "https://example.com/: Docs home\n");
        assert!(queue.queued.lock().unwrap().is_empty());
    }

    #[test]
    fn test_open_bucket_kinds() {
        let memory = open_bucket(&BucketConfig::default()).unwrap();
        assert!(memory.check("/a"));
        assert!(!memory.check("/a"));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seen.db");
        let sqlite = open_bucket(&BucketConfig {
            kind: BucketKind::Sqlite,
            path: Some(path.to_string_lossy().into_owned()),
        })
        .unwrap();
        assert!(sqlite.check("/a"));
        assert!(!sqlite.check("/a"));
        assert!(path.exists());
    }

    #[test]
    fn test_open_sink_appends_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("remarks.log");
        let path_str = path.to_string_lossy().into_owned();

        open_sink(Some(&path_str)).unwrap().write_line("first").unwrap();
        open_sink(Some(&path_str)).unwrap().write_line("second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
