use crate::crawler::{Request, Submission};
use crate::document::{describe_selector_error, NodeSet};
use scraper::{ElementRef, Selector};
use std::fmt;

/// One element of a parsed page, scoped to the request that fetched it
///
/// A node is a cheap, copyable view. It borrows both the element and the
/// request; it never owns either.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
    request: &'a Request,
}

impl<'a> Node<'a> {
    pub fn new(element: ElementRef<'a>, request: &'a Request) -> Self {
        Self { element, request }
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    pub fn request(&self) -> &'a Request {
        self.request
    }

    /// The element's local tag name, e.g. `"a"`
    pub fn name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Looks up an attribute by name
    ///
    /// The HTML parser keeps only the first of a repeated attribute, so an
    /// element has at most one value per name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// The concatenated text of this element and its descendants
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Finds this node and its descendants matching a CSS selector
    ///
    /// An unparseable selector is not an error for the caller: it yields an
    /// empty set and writes one line describing the problem to the request's
    /// debug log.
    pub fn find(&self, selector: &str) -> NodeSet<'a> {
        match Selector::parse(selector) {
            Ok(selector) => self.select(&selector),
            Err(e) => {
                self.request
                    .debug
                    .println(describe_selector_error(selector, &e));
                NodeSet::new()
            }
        }
    }

    /// Same as [`find`](Self::find) with a precompiled selector
    pub fn select(&self, selector: &Selector) -> NodeSet<'a> {
        let own = selector.matches(&self.element).then_some(self.element);

        NodeSet::wrap(
            own.into_iter().chain(self.element.select(selector)),
            self.request,
        )
    }

    /// Queues the node's `href` on the request's engine
    ///
    /// The href is submitted exactly as written. Nodes without an `href`, or
    /// with an empty one, are skipped and return `None`.
    pub fn queue(&self) -> Option<Submission> {
        match self.attr("href") {
            Some(href) if !href.is_empty() => self.request.enqueue(href),
            _ => None,
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("request", &self.request.url)
            .finish()
    }
}
