use std::time::Duration;

use kogebog_batch::{BatchConfigError, BatchExecutor};
use kogebog_client::{ApiError, HttpLinkApi};

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BATCH_DELAY_MS: i64 = 150;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected} (got '{value}')")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("BATCH_DELAY_MS is invalid: {0}")]
    BatchDelay(#[from] BatchConfigError),
}

/// Link API and batch configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LinksConfig {
    /// Link API root URL.
    pub api_url: String,
    /// Bearer token for the link API, if it requires one.
    pub api_token: Option<String>,
    /// Per-request HTTP timeout. The batch executor imposes none of its own.
    pub request_timeout: Duration,
    /// Executor configured with the validated inter-item delay.
    pub executor: BatchExecutor,
}

impl LinksConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `LINK_API_URL`          | `http://localhost:3000/api/v1` |
    /// | `LINK_API_TOKEN`        | unset                          |
    /// | `LINK_API_TIMEOUT_SECS` | `30`                           |
    /// | `BATCH_DELAY_MS`        | `150`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("LINK_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());

        let api_token = lookup("LINK_API_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let timeout_secs: u64 = match lookup("LINK_API_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    var: "LINK_API_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let delay_ms: i64 = match lookup("BATCH_DELAY_MS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "BATCH_DELAY_MS",
                expected: "a whole number of milliseconds",
                value,
            })?,
            None => DEFAULT_BATCH_DELAY_MS,
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_secs(timeout_secs),
            executor: BatchExecutor::from_millis(delay_ms)?,
        })
    }

    /// Build the HTTP link API client described by this configuration.
    pub fn http_api(&self) -> Result<HttpLinkApi, ApiError> {
        let api = HttpLinkApi::new(&self.api_url, self.request_timeout)?;
        Ok(match &self.api_token {
            Some(token) => api.with_token(token.clone()),
            None => api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<LinksConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LinksConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_token.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.executor.delay(), Duration::from_millis(150));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = load(&[
            ("LINK_API_URL", "https://links.example.com/api"),
            ("LINK_API_TOKEN", " secret "),
            ("LINK_API_TIMEOUT_SECS", "5"),
            ("BATCH_DELAY_MS", "200"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://links.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.executor.delay(), Duration::from_millis(200));
    }

    #[test]
    fn negative_batch_delay_is_a_config_error() {
        assert_matches!(
            load(&[("BATCH_DELAY_MS", "-100")]),
            Err(ConfigError::BatchDelay(BatchConfigError::NegativeDelay(-100)))
        );
    }

    #[test]
    fn non_numeric_batch_delay_is_rejected() {
        assert_matches!(
            load(&[("BATCH_DELAY_MS", "fast")]),
            Err(ConfigError::Invalid { var: "BATCH_DELAY_MS", .. })
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert_matches!(
            load(&[("LINK_API_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid { var: "LINK_API_TIMEOUT_SECS", .. })
        );
    }

    #[test]
    fn http_api_uses_configured_url() {
        let config = load(&[("LINK_API_URL", "http://api.local:8080/v2")]).unwrap();
        let api = config.http_api().unwrap();
        assert_eq!(api.base_url().as_str(), "http://api.local:8080/v2");
    }
}
