//! Cortex HTTP client
//!
//! Uses ureq (sync HTTP) with bearer auth against a configurable base URL.
//! Transient failures (connection errors, 429, 5xx) are retried a bounded
//! number of times with doubling backoff between a minimum and maximum delay.

use super::{ApiError, ApiRequest, ApiResponse, ApiResult, QueryContext, Transport};
use crate::config::{ConnectionConfig, API_KEY_ENV};
use std::time::Duration;
use tracing::{debug, warn};

/// Response bodies larger than this are rejected (1000-entity pages can be big)
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    pub fn is_retryable_status(status: u16) -> bool {
        status == 429 || (500..=599).contains(&status)
    }
}

pub struct HttpTransport {
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are surfaced as ApiResponse
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .new_agent()
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            agent: make_agent(),
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> ApiResult<Self> {
        let api_key = config.api_key().ok_or_else(|| ApiError::MissingApiKey {
            env_var: API_KEY_ENV.to_string(),
        })?;
        Ok(Self::new(&config.base_url, api_key))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.resolved_path())
    }

    fn send_once(
        &self,
        ctx: &QueryContext,
        url: &str,
        request: &ApiRequest,
    ) -> Result<ApiResponse, ureq::Error> {
        let mut req = self
            .agent
            .get(url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Accept", "application/json");
        for (key, value) in request.query_pairs() {
            req = req.query(key, value);
        }
        if let Some(remaining) = ctx.remaining() {
            req = req
                .config()
                .timeout_global(Some(remaining.min(REQUEST_TIMEOUT)))
                .build();
        }

        let response = req.call()?;
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()?;
        Ok(ApiResponse { status, body })
    }

    /// Sleep before the next attempt, without overrunning the deadline
    fn wait_before_retry(&self, ctx: &QueryContext, attempt: u32) -> ApiResult<()> {
        let mut delay = self.retry.backoff(attempt);
        if let Some(remaining) = ctx.remaining() {
            if remaining <= delay {
                return Err(ApiError::DeadlineExceeded);
            }
            delay = delay.min(remaining);
        }
        std::thread::sleep(delay);
        ctx.check()
    }
}

impl Transport for HttpTransport {
    fn get(&self, ctx: &QueryContext, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.url_for(request);
        let mut attempt = 0;
        loop {
            ctx.check()?;
            debug!("GET {} (attempt {})", url, attempt + 1);

            match self.send_once(ctx, &url, request) {
                Ok(response)
                    if RetryPolicy::is_retryable_status(response.status)
                        && attempt < self.retry.max_retries =>
                {
                    warn!(
                        "GET {} returned {}, retrying in {:?}",
                        url,
                        response.status,
                        self.retry.backoff(attempt)
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if ctx.is_expired() => {
                    debug!("GET {} aborted at deadline: {}", url, e);
                    return Err(ApiError::DeadlineExceeded);
                }
                Err(e) if attempt < self.retry.max_retries => {
                    warn!(
                        "GET {} failed: {}, retrying in {:?}",
                        url,
                        e,
                        self.retry.backoff(attempt)
                    );
                }
                Err(e) => {
                    return Err(ApiError::Transport {
                        message: e.to_string(),
                    })
                }
            }

            self.wait_before_retry(ctx, attempt)?;
            attempt += 1;
        }
    }
}
