use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on the worker pool size
const MAX_WORKERS: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.rate_limit_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "rate-limit-interval-ms must be > 0".to_string(),
        ));
    }

    if config.frontier_capacity == 0 {
        return Err(ConfigError::Validation(
            "frontier-capacity must be >= 1".to_string(),
        ));
    }

    if config.results_capacity == 0 {
        return Err(ConfigError::Validation(
            "results-capacity must be >= 1".to_string(),
        ));
    }

    if config.run_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "run-timeout-secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP transport configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs and connect-timeout-secs must be > 0, got {} and {}",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.summary_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "summary-path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
