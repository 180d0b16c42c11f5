//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use scrap::{
    CaptureBuffer, Document, FetchError, MemoryBucket, Request, Retriever, Scraper, ScraperConfig,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves canned HTML keyed by the exact request URL and counts fetches
#[derive(Default)]
pub struct FixtureRetriever {
    pages: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl FixtureRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Sleeps before every response so tasks overlap
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Retriever for FixtureRetriever {
    async fn retrieve(&self, request: &Request) -> Result<Document, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        *self
            .fetches
            .lock()
            .unwrap()
            .entry(request.url.clone())
            .or_insert(0) += 1;

        match self.pages.get(&request.url) {
            Some(html) => Ok(Document::parse(html)),
            None => {
                let error = FetchError::NotFound {
                    url: request.url.clone(),
                };
                request.remarks.println(&error);
                Err(error)
            }
        }
    }
}

/// An engine over `retriever` with a memory bucket and captured logs
pub struct Harness {
    pub scraper: Scraper,
    pub retriever: Arc<FixtureRetriever>,
    pub remarks: CaptureBuffer,
    pub debug: CaptureBuffer,
}

impl Harness {
    pub fn new(retriever: FixtureRetriever) -> Self {
        let retriever = Arc::new(retriever);
        let remarks = CaptureBuffer::new();
        let debug = CaptureBuffer::new();

        let config = ScraperConfig {
            retriever: Some(retriever.clone()),
            ..ScraperConfig::new()
        }
        .bucket(MemoryBucket::new())
        .remarks(remarks.sink())
        .debug(debug.sink());

        Self {
            scraper: Scraper::new(config).expect("complete config"),
            retriever,
            remarks,
            debug,
        }
    }
}

/// A page whose body is one anchor per href
pub fn links_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}
