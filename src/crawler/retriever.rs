//! Page retrieval
//!
//! This module defines the [`Retriever`] seam the engine fetches through, and
//! an HTTP implementation of it:
//! - Building HTTP clients with a user agent and timeouts
//! - Passing request credentials as basic auth
//! - Classifying status codes and content types
//! - Parsing the body into a [`Document`]

use crate::crawler::Request;
use crate::document::Document;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Fetches and parses the page behind a request
///
/// The engine calls this once per dispatched URL and never retries. Errors
/// end the work for that URL; reporting them is up to the implementation.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, request: &Request) -> Result<Document, FetchError>;
}

/// HTTP client settings for [`HttpRetriever`]
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("scrap/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use scrap::crawler::{build_http_client, HttpOptions};
///
/// let client = build_http_client(&HttpOptions::default()).unwrap();
/// ```
pub fn build_http_client(options: &HttpOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .redirect(Policy::limited(options.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves pages over HTTP(S) with `reqwest`
///
/// # Response Handling
///
/// | Condition | Result |
/// |-----------|--------|
/// | URL does not parse as absolute | `FetchError::InvalidUrl` |
/// | Connection / timeout / redirect failure | `FetchError::Http` |
/// | Non-2xx status | `FetchError::Status` |
/// | Content-Type present and not HTML | `FetchError::ContentMismatch` |
/// | Otherwise | body parsed into a `Document` |
///
/// Every failure is also written to the request's remarks log.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: Client,
}

impl HttpRetriever {
    pub fn new(options: &HttpOptions) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(options)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, request: &Request) -> Result<Document, FetchError> {
        let url = Url::parse(&request.url).map_err(|e| FetchError::InvalidUrl {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let mut builder = self.client.get(url);
        if let Some(auth) = &request.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = builder.send().await.map_err(|source| FetchError::Http {
            url: request.url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::ContentMismatch {
                    url: request.url.clone(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            url: request.url.clone(),
            source,
        })?;

        Ok(Document::parse(&body))
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, request: &Request) -> Result<Document, FetchError> {
        let result = self.fetch(request).await;
        if let Err(e) = &result {
            request.remarks.println(e);
        }
        result
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.eq_ignore_ascii_case("text/html") || mime.eq_ignore_ascii_case("application/xhtml+xml")
}
