//! Startup configuration for the dispatcher.
//!
//! Values are read once from the environment and never re-read.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `OPENDOTA_API_BASE` | `https://api.opendota.com/api` | Upstream base URL |
//! | `OPENDOTA_API_KEY` | unset | Credential sent as the `api_key` parameter |
//! | `OPENDOTA_RATE_LIMIT` | `60` | Calls allowed per 60 second window |
//! | `OPENDOTA_CACHE_TTL_SECS` | `300` | Response freshness in seconds |

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.opendota.com/api";
pub const API_KEY_PARAM: &str = "api_key";

/// Sliding-window quota applied to outbound calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatePolicy {
    pub quota_limit: u32,
    pub quota_window: Duration,
    /// Added to every computed wait so the window has rolled by the time the caller wakes.
    pub boundary_buffer: Duration,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            quota_limit: 60,
            quota_window: Duration::from_secs(60),
            boundary_buffer: Duration::from_millis(100),
        }
    }
}

/// Immutable inputs to a [`crate::Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub rate_policy: RatePolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: None,
            user_agent: format!("dotastat/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
            rate_policy: RatePolicy::default(),
        }
    }
}

impl DispatcherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("OPENDOTA_API_BASE") {
            let base_url = base_url.trim().trim_end_matches('/');
            if base_url.is_empty() {
                return Err(ConfigError::EmptyBaseUrl);
            }
            config.base_url = base_url.to_owned();
        }

        config.api_key = lookup("OPENDOTA_API_KEY")
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        if let Some(raw) = lookup("OPENDOTA_RATE_LIMIT") {
            config.rate_policy.quota_limit =
                u32::try_from(parse_positive("OPENDOTA_RATE_LIMIT", &raw)?).map_err(|_| {
                    ConfigError::InvalidNumber {
                        name: "OPENDOTA_RATE_LIMIT",
                        value: raw.clone(),
                    }
                })?;
        }

        if let Some(raw) = lookup("OPENDOTA_CACHE_TTL_SECS") {
            config.cache_ttl =
                Duration::from_secs(parse_positive("OPENDOTA_CACHE_TTL_SECS", &raw)?);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn with_rate_policy(mut self, rate_policy: RatePolicy) -> Self {
        self.rate_policy = rate_policy;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: raw.to_owned(),
        })?;
    if value == 0 {
        return Err(ConfigError::Zero { name });
    }
    Ok(value)
}
