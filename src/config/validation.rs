use crate::config::assemble::{build_pattern, parse_selector};
use crate::config::types::{BucketConfig, BucketKind, Config, CrawlConfig, HttpConfig, RouteEntry};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_http_config(&config.http)?;
    validate_bucket_config(&config.bucket)?;
    validate_routes(&config.routes)?;
    Ok(())
}

/// Validates the start URLs
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.start.is_empty() {
        return Err(ConfigError::Validation(
            "crawl.start must list at least one URL".to_string(),
        ));
    }

    for start in &config.start {
        Url::parse(start).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start, e))
        })?;
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates bucket selection
fn validate_bucket_config(config: &BucketConfig) -> Result<(), ConfigError> {
    if config.kind == BucketKind::Sqlite {
        match config.path.as_deref() {
            Some(path) if !path.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(
                    "bucket.path is required when bucket.kind = \"sqlite\"".to_string(),
                ))
            }
        }
    }

    Ok(())
}

/// Validates every route table
fn validate_routes(routes: &[RouteEntry]) -> Result<(), ConfigError> {
    for entry in routes {
        if entry.pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Route pattern cannot be empty".to_string(),
            ));
        }

        build_pattern(entry)?;

        for selector in entry.follow.iter().chain(entry.remark.iter()) {
            parse_selector(selector)?;
        }
    }

    Ok(())
}
