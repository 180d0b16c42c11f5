//! Route table: ordered `(pattern, handler)` pairs
//!
//! A fetched URL is dispatched to the first route, in registration order,
//! whose pattern matches it. Later routes are never consulted once one
//! matches, even if they would match too.

mod pattern;

pub use pattern::{matches_glob, Pattern};

use crate::crawler::Request;
use crate::document::Node;
use std::fmt;
use std::sync::Arc;

/// Route handler: receives the request and the root node of its page
pub type Handler = Arc<dyn Fn(&Request, Node<'_>) + Send + Sync>;

/// A pattern plus the handler it dispatches to
#[derive(Clone)]
pub struct Route {
    pattern: Pattern,
    handler: Handler,
}

impl Route {
    pub fn new<F>(pattern: impl Into<Pattern>, handler: F) -> Self
    where
        F: Fn(&Request, Node<'_>) + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.matches(url)
    }

    /// Runs the handler on a fetched page
    pub fn handle(&self, request: &Request, root: Node<'_>) {
        (self.handler)(request, root)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of routes; append-only
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route after every route registered so far
    pub fn add<F>(&mut self, pattern: impl Into<Pattern>, handler: F)
    where
        F: Fn(&Request, Node<'_>) + Send + Sync + 'static,
    {
        self.push(Route::new(pattern, handler));
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Returns the first route, in registration order, matching `url`
    pub fn match_url(&self, url: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(url))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
