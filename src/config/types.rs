use serde::Deserialize;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub bucket: BucketConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

/// Where the crawl starts
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// URLs submitted to the engine before waiting
    pub start: Vec<String>,
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_user_agent() -> String {
    format!("scrap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

/// Basic auth credentials attached to every request
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which dedup bucket to use
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BucketConfig {
    #[serde(default)]
    pub kind: BucketKind,

    /// Database file, required for `sqlite`
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    #[default]
    Memory,
    Sqlite,
}

/// Log sink destinations; a missing path means stderr
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
}

/// One `[[route]]` table
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub pattern: String,

    #[serde(default)]
    pub kind: PatternKind,

    /// Selectors whose `href` targets are resolved and queued
    #[serde(default)]
    pub follow: Vec<String>,

    /// Selector whose text is written to the remarks log
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    #[default]
    Glob,
    Prefix,
    Exact,
    Regex,
}
