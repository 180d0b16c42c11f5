use url::Url;

/// List of tracking query parameters ignored when keying URLs
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Computes the dedup key a bucket records for a URL
///
/// # Normalization Steps
///
/// For absolute HTTP(S) URLs:
///
/// 1. Parse the URL (this lowercases the host and turns an empty path into `/`)
/// 2. Remove the fragment
/// 3. Remove tracking query parameters
/// 4. Sort remaining query parameters by key
/// 5. Remove an empty query string
///
/// Anything else (relative references, other schemes, unparseable input) is
/// trimmed and loses its fragment, nothing more. Two strings that produce the
/// same key are treated as the same page.
///
/// # Examples
///
/// ```
/// use scrap::url::bucket_key;
///
/// assert_eq!(
///     bucket_key("https://EXAMPLE.com/page?b=2&utm_source=x&a=1#top"),
///     "https://example.com/page?a=1&b=2"
/// );
/// assert_eq!(bucket_key(" /first#intro "), "/first");
/// ```
pub fn bucket_key(raw: &str) -> String {
    let trimmed = raw.trim();

    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => normalize(url),
        _ => strip_fragment(trimmed).to_string(),
    }
}

fn normalize(mut url: Url) -> String {
    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    url.into()
}

fn strip_fragment(raw: &str) -> &str {
    raw.split_once('#').map_or(raw, |(before, _)| before)
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Stable sort keeps repeated keys in their original order
    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
