//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `num_results` is 0
    /// - `navigation_timeout_ms` is less than 1s or exceeds 5 minutes
    /// - `settle_ms` exceeds 30s
    /// - `user_agent` or `proxy` is set but empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_results == 0 {
            return Err(ConfigError::Invalid { field: "num_results".into(), reason: "must be at least 1".into() });
        }
        if self.num_results > crate::config::MAX_RESULTS {
            tracing::warn!(
                requested = self.num_results,
                max = crate::config::MAX_RESULTS,
                "num_results exceeds the maximum and will be clamped"
            );
        }

        if self.navigation_timeout_ms < 1_000 {
            return Err(ConfigError::Invalid {
                field: "navigation_timeout_ms".into(),
                reason: "must be at least 1000ms".into(),
            });
        }
        if self.navigation_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "navigation_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.settle_ms > 30_000 {
            return Err(ConfigError::Invalid { field: "settle_ms".into(), reason: "must not exceed 30000ms".into() });
        }

        if self.user_agent.as_deref().is_some_and(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.proxy.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "proxy".into(), reason: "must not be empty".into() });
        }

        if let Some(path) = &self.chrome_executable
            && !path.exists()
        {
            return Err(ConfigError::Missing {
                field: "chrome_executable".into(),
                hint: format!("{} does not exist", path.display()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_num_results_zero() {
        let config = AppConfig { num_results: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "num_results"));
    }

    #[test]
    fn test_validate_num_results_above_max_is_allowed() {
        let config = AppConfig { num_results: 1_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { navigation_timeout_ms: 999, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "navigation_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { navigation_timeout_ms: 300_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "navigation_timeout_ms"));
    }

    #[test]
    fn test_validate_settle_too_long() {
        let config = AppConfig { settle_ms: 30_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "settle_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: Some(String::new()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_empty_proxy() {
        let config = AppConfig { proxy: Some("  ".into()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "proxy"));
    }

    #[test]
    fn test_validate_missing_chrome_executable() {
        let config =
            AppConfig { chrome_executable: Some(PathBuf::from("/nonexistent/chrome-binary")), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "chrome_executable"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { navigation_timeout_ms: 1_000, settle_ms: 0, num_results: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config = AppConfig { navigation_timeout_ms: 300_000, settle_ms: 30_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
