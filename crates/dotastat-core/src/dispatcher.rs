//! The single entry point every query operation goes through.
//!
//! ```text
//! fetch(endpoint, params)
//!   ├─ cache hit ──────────────────────────────▶ payload
//!   └─ miss ─▶ rate limiter ─▶ HTTP GET ─┬─ ok ─▶ cache put ─▶ payload
//!                                        └─ err ─▶ classify ─▶ ClassifiedError
//! ```
//!
//! The cache is consulted before the rate limiter, so hits never spend quota.
//! Failures are never cached and never retried here.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::{cache_key, CacheMode, ResponseCache};
use crate::classify::{classify, Failure};
use crate::config::{DispatcherConfig, API_KEY_PARAM};
use crate::error::{ClassifiedError, ErrorKind};
use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::janitor::{spawn_janitor, JanitorHandle};
use crate::queries::Query;
use crate::rate_limiter::RateLimiter;

/// Name/value query parameters. Ordered by name.
pub type QueryParams = BTreeMap<String, String>;

/// Shared request orchestrator. Cloning is cheap and every clone shares the
/// same cache and rate-limit log.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<DispatcherConfig>,
    http_client: Arc<dyn HttpClient>,
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    default_params: Arc<QueryParams>,
}

impl Dispatcher {
    /// Dispatcher backed by the production reqwest transport.
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: DispatcherConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let mut default_params = QueryParams::new();
        if let Some(api_key) = &config.api_key {
            default_params.insert(String::from(API_KEY_PARAM), api_key.clone());
        }

        Self {
            cache: Arc::new(ResponseCache::new(config.cache_ttl)),
            limiter: Arc::new(RateLimiter::new(config.rate_policy.clone())),
            config: Arc::new(config),
            http_client,
            default_params: Arc::new(default_params),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Starts the background sweep for this dispatcher's cache, once per TTL.
    pub fn spawn_janitor(&self) -> JanitorHandle {
        spawn_janitor(Arc::clone(&self.cache), self.config.cache_ttl)
    }

    /// Key under which `fetch(endpoint, params)` is cached, credential included.
    pub fn cache_key(&self, endpoint: &str, params: &QueryParams) -> String {
        cache_key(endpoint, &self.merged_params(params))
    }

    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<Value, ClassifiedError> {
        self.fetch_with_mode(endpoint, params, CacheMode::Use).await
    }

    pub async fn fetch_with_mode(
        &self,
        endpoint: &str,
        params: &QueryParams,
        mode: CacheMode,
    ) -> Result<Value, ClassifiedError> {
        let merged = self.merged_params(params);
        let key = cache_key(endpoint, &merged);

        if mode.reads() {
            if let Some(payload) = self.cache.get(&key) {
                debug!(endpoint, "cache hit for {endpoint}");
                return Ok(payload);
            }
        }

        self.limiter.acquire().await;

        info!(
            endpoint,
            params = ?merged.keys().collect::<Vec<_>>(),
            "making request to {endpoint}"
        );
        let request = HttpRequest::get(self.url_for(endpoint))
            .with_query(merged)
            .with_header("user-agent", self.config.user_agent.as_str())
            .with_timeout(self.config.request_timeout);

        match self.execute(request).await {
            Ok(payload) => {
                if mode.writes() {
                    self.cache.put(key, payload.clone());
                }
                Ok(payload)
            }
            Err(failure) => {
                let classified = classify(&failure);
                log_failure(endpoint, &failure, &classified);
                Err(classified)
            }
        }
    }

    pub async fn query(&self, query: &Query) -> Result<Value, ClassifiedError> {
        self.query_with_mode(query, CacheMode::Use).await
    }

    pub async fn query_with_mode(
        &self,
        query: &Query,
        mode: CacheMode,
    ) -> Result<Value, ClassifiedError> {
        self.fetch_with_mode(&query.path(), &query.params(), mode).await
    }

    /// Probes the upstream `health` endpoint.
    pub async fn health_check(&self) -> Result<Value, ClassifiedError> {
        self.query(&Query::Health).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<Value, Failure> {
        let timeout = request.timeout;
        let response = tokio::time::timeout(timeout, self.http_client.execute(request))
            .await
            .map_err(|_| {
                HttpError::timeout(format!("no response within {:.1}s", timeout.as_secs_f64()))
            })??;

        if !response.is_success() {
            return Err(Failure::Status {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| Failure::MalformedBody(e.to_string()))
    }

    fn merged_params(&self, params: &QueryParams) -> QueryParams {
        let mut merged = (*self.default_params).clone();
        merged.extend(params.iter().map(|(name, value)| (name.clone(), value.clone())));
        merged
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

fn log_failure(endpoint: &str, failure: &Failure, classified: &ClassifiedError) {
    match (classified.kind(), failure) {
        (ErrorKind::RateLimited, _) => error!(endpoint, "rate limit exceeded for {endpoint}"),
        (ErrorKind::NotFound, _) => error!(endpoint, "resource not found: {endpoint}"),
        (ErrorKind::UpstreamServerError, Failure::Status { status, .. }) => {
            error!(endpoint, status, "OpenDota API server error: {status}")
        }
        (_, Failure::Status { status, .. }) => {
            error!(endpoint, status, "HTTP error {status} for {endpoint}")
        }
        (_, Failure::Transport(e)) => {
            warn!(endpoint, "transport error for {endpoint}: {}", e.message())
        }
        (_, Failure::MalformedBody(detail)) => {
            warn!(endpoint, "malformed response body from {endpoint}: {detail}")
        }
    }
}
