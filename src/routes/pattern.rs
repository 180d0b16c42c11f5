use crate::ConfigError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A rule deciding whether a route applies to a URL
#[derive(Clone)]
pub enum Pattern {
    /// Matches one URL string exactly
    Exact(String),
    /// Matches every URL starting with the given string
    Prefix(String),
    /// `*` matches any run of characters; the rest must match literally
    Glob(String),
    /// Matches when the expression finds a match anywhere in the URL
    Regex(Regex),
    /// Arbitrary predicate
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Pattern {
    pub fn exact(url: impl Into<String>) -> Self {
        Self::Exact(url.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn glob(glob: impl Into<String>) -> Self {
        Self::Glob(glob.into())
    }

    /// Compiles a regular expression pattern
    pub fn regex(expr: &str) -> Result<Self, ConfigError> {
        Regex::new(expr)
            .map(Self::Regex)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", expr, e)))
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    /// Checks whether `url` satisfies this pattern
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(expected) => url == expected,
            Self::Prefix(prefix) => url.starts_with(prefix.as_str()),
            Self::Glob(glob) => matches_glob(glob, url),
            Self::Regex(regex) => regex.is_match(url),
            Self::Custom(predicate) => predicate(url),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            Self::Prefix(s) => f.debug_tuple("Prefix").field(s).finish(),
            Self::Glob(s) => f.debug_tuple("Glob").field(s).finish(),
            Self::Regex(r) => f.debug_tuple("Regex").field(&r.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for Pattern {
    fn from(glob: &str) -> Self {
        Self::Glob(glob.to_string())
    }
}

impl From<String> for Pattern {
    fn from(glob: String) -> Self {
        Self::Glob(glob)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// Checks if a URL matches a glob pattern
///
/// The pattern is anchored at both ends. Each `*` matches any run of
/// characters, including an empty one and including `/`.
///
/// # Examples
///
/// ```
/// use scrap::routes::matches_glob;
///
/// assert!(matches_glob("https://example.com/*", "https://example.com/a/b"));
/// assert!(matches_glob("*/item/*", "https://shop.example.com/item/42"));
/// assert!(!matches_glob("https://example.com/*", "https://example.org/"));
/// assert!(matches_glob("/about", "/about"));
/// ```
pub fn matches_glob(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    // Position of the last `*` seen and the candidate index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, c));
            p += 1;
        } else if p < pattern.len() && pattern[p] == candidate[c] {
            p += 1;
            c += 1;
        } else if let Some((star, tried)) = backtrack {
            // Let the last star swallow one more character
            p = star + 1;
            c = tried + 1;
            backtrack = Some((star, tried + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}
