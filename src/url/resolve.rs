use url::Url;

/// Resolves a link href against the page it was found on
///
/// Returns None if the link should not be followed:
/// - empty hrefs and fragment-only links (same page anchors)
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// Resolution is a convenience for handlers; queueing a node never resolves
/// its href.
///
/// # Examples
///
/// ```
/// use scrap::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(
///     resolve_link("next", &base),
///     Some("https://example.com/docs/next".to_string())
/// );
/// assert_eq!(resolve_link("mailto:a@example.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;

    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_absolute_link() {
        assert_eq!(
            resolve_link("https://other.com/page", &base_url()),
            Some("https://other.com/page".to_string())
        );
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            resolve_link("/other", &base_url()),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_path_relative_link() {
        assert_eq!(
            resolve_link("other", &base_url()),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_skip_special_schemes() {
        assert_eq!(resolve_link("javascript:void(0)", &base_url()), None);
        assert_eq!(resolve_link("mailto:test@example.com", &base_url()), None);
        assert_eq!(resolve_link("tel:+1234567890", &base_url()), None);
        assert_eq!(
            resolve_link("data:text/html,<h1>Test</h1>", &base_url()),
            None
        );
    }

    #[test]
    fn test_skip_fragment_only_and_empty() {
        assert_eq!(resolve_link("#section", &base_url()), None);
        assert_eq!(resolve_link("   ", &base_url()), None);
    }

    #[test]
    fn test_skip_non_http_after_resolution() {
        assert_eq!(resolve_link("ftp://example.com/file", &base_url()), None);
    }
}
