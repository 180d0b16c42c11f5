//! Parsed pages and the element views handlers work with
//!
//! A [`Document`] owns the parsed HTML tree of one fetched page. Handlers see
//! it through [`Node`]s: an element plus the [`Request`] that fetched it, so
//! that links found on the page can be queued back to the same engine.

mod node;
mod nodeset;

pub use node::Node;
pub use nodeset::NodeSet;

use crate::crawler::Request;
use scraper::error::SelectorErrorKind;
use scraper::Html;

/// One-line description of a selector parse failure
///
/// Built from the error's `Debug` form. The `Display` impl in `scraper` can
/// panic on some delimiter tokens and spreads its output over several lines.
pub(crate) fn describe_selector_error(selector: &str, error: &SelectorErrorKind<'_>) -> String {
    format!("Invalid selector {:?}: {:?}", selector, error)
}

/// A fetched and parsed HTML page
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document
    ///
    /// Parsing is lenient: malformed markup is repaired the way browsers do,
    /// so this never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use scrap::Document;
    ///
    /// let document = Document::parse("<html><body><p>Hello</p></body></html>");
    /// assert_eq!(document.title(), None);
    /// ```
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// The root `<html>` element, bound to `request`
    pub fn root<'a>(&'a self, request: &'a Request) -> Node<'a> {
        Node::new(self.html.root_element(), request)
    }

    /// The page title (from the first `<title>` tag), trimmed
    pub fn title(&self) -> Option<String> {
        let selector = scraper::Selector::parse("title").ok()?;

        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

impl From<Html> for Document {
    fn from(html: Html) -> Self {
        Self { html }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let document =
            Document::parse(r#"<html><head><title>  Test Page  </title></head><body></body></html>"#);
        assert_eq!(document.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let document = Document::parse(r#"<html><head></head><body></body></html>"#);
        assert_eq!(document.title(), None);
    }

    #[test]
    fn test_fragment_gets_wrapped_in_html() {
        let document = Document::parse("<p>loose</p>");
        assert_eq!(document.html().root_element().value().name(), "html");
    }
}
