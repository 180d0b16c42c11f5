//! Requests and the queue they report back to

use crate::sink::{Channel, LogSink, Logger};
use std::fmt;
use std::sync::{Arc, Weak};

/// Credentials passed through to the retriever unchanged
#[derive(Clone, PartialEq, Eq)]
pub struct RequestAuth {
    pub username: String,
    pub password: String,
}

impl RequestAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How a submission ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The bucket had already seen the URL
    Duplicate,
    /// The URL was new but no route matched it
    NoRoute,
    /// A task was spawned to fetch and handle the URL
    Dispatched,
}

impl Submission {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

/// Something requests can be created by and submitted to
///
/// [`Scraper`](crate::crawler::Scraper) is the production queue; tests can
/// substitute a recording one.
pub trait RequestQueue: Send + Sync {
    /// Builds a request for `url` bound to this queue
    fn create_request(&self, url: &str) -> Request;

    /// Submits a request; fire-and-forget apart from the returned outcome
    fn do_request(&self, request: Request) -> Submission;
}

/// One unit of crawl work
///
/// Holds a non-owning reference to the queue that created it, so nodes
/// found on its page can queue further URLs without the engine being
/// threaded through handler code.
#[derive(Clone)]
pub struct Request {
    pub url: String,
    pub remarks: Logger,
    pub debug: Logger,
    pub auth: Option<RequestAuth>,
    queue: Weak<dyn RequestQueue>,
}

impl Request {
    /// Creates a request whose log lines are prefixed with `"{url}: "`
    pub fn new(
        url: impl Into<String>,
        remarks: &LogSink,
        debug: &LogSink,
        auth: Option<RequestAuth>,
        queue: Weak<dyn RequestQueue>,
    ) -> Self {
        let url = url.into();
        let prefix = format!("{}: ", url);

        Self {
            remarks: Logger::new(remarks, prefix.clone(), Channel::Remarks),
            debug: Logger::new(debug, prefix, Channel::Debug),
            url,
            auth,
            queue,
        }
    }

    /// The owning queue, if it is still alive
    pub fn queue(&self) -> Option<Arc<dyn RequestQueue>> {
        self.queue.upgrade()
    }

    /// Whether this request reports back to `queue`
    pub fn belongs_to(&self, queue: &Arc<dyn RequestQueue>) -> bool {
        Weak::ptr_eq(&self.queue, &Arc::downgrade(queue))
    }

    /// Whether two requests report back to the same queue
    pub fn shares_queue_with(&self, other: &Request) -> bool {
        Weak::ptr_eq(&self.queue, &other.queue)
    }

    /// Creates a request for `url` on the owning queue and submits it
    ///
    /// Returns `None` when the queue has already been dropped.
    pub fn enqueue(&self, url: &str) -> Option<Submission> {
        match self.queue.upgrade() {
            Some(queue) => {
                let request = queue.create_request(url);
                Some(queue.do_request(request))
            }
            None => {
                tracing::debug!(url = %self.url, link = %url, "Request queue is gone");
                None
            }
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
