//! Configuration validation rules.
//!
//! Checks `ClientConfig` values after they have been loaded from environment,
//! files, or defaults.

use crate::config::ClientConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl ClientConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `base_url` or `search_base_url` is empty or not http(s)
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("base_url", &self.base_url)?;
        validate_base_url("search_base_url", &self.search_base_url)?;

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must be at least 100ms".into(),
                });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must not be empty".into() });
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must start with http:// or https://".into() });
    }
    if !value.ends_with('/') {
        tracing::warn!(field, value, "base URL has no trailing slash; target URLs are appended verbatim");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let config = ClientConfig { base_url: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "base_url"));
    }

    #[test]
    fn test_validate_search_base_url_scheme() {
        let config = ClientConfig { search_base_url: "s.contextforce.com/".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search_base_url"));
    }

    #[test]
    fn test_validate_missing_trailing_slash_is_allowed() {
        let config = ClientConfig { base_url: "http://127.0.0.1:9000".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = ClientConfig { timeout_ms: Some(50), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = ClientConfig { timeout_ms: Some(301_000), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_bounds_inclusive() {
        for timeout_ms in [100, 300_000] {
            let config = ClientConfig { timeout_ms: Some(timeout_ms), ..Default::default() };
            assert!(config.validate().is_ok(), "timeout {timeout_ms} should be valid");
        }
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = ClientConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
