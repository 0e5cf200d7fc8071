//! Blocking HTTP fetcher with configurable timeout and retries for transient failures.

use crate::config::Config;
use crate::fetcher::{DocumentFetcher, FetchError};
use reqwest::StatusCode;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; chartscrape/0.1; +https://github.com/chartscrape)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;

/// Default number of attempts (initial plus retries).
const DEFAULT_RETRY_COUNT: u32 = 3;
/// Default backoff delays in seconds after each failed attempt.
const DEFAULT_BACKOFF_SECS: [u64; 2] = [1, 2];
/// Backoff for HTTP 429 (rate limit): wait longer so the server can recover.
const BACKOFF_429_SECS: [u64; 4] = [30, 60, 90, 120];

/// Blocking HTTP fetcher. Shareable across threads.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    inner: reqwest::blocking::Client,
    retry_count: u32,
    backoff_secs: Vec<u64>,
}

impl HttpFetcher {
    /// Build a fetcher with default User-Agent, timeout, and retries.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// Build a fetcher from config file values, falling back to defaults for absent keys.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let mut builder = Self::builder();
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        if let Some(n) = config.retry_count {
            builder = builder.retry_count(n);
        }
        if let Some(backoff) = &config.retry_backoff_secs {
            builder = builder.retry_backoff_secs(backoff.clone());
        }
        builder.build()
    }

    /// Delay before the next attempt, given the 1-based number of the attempt that just failed.
    fn backoff_for(&self, attempt: u32, rate_limited: bool) -> Duration {
        let i = attempt.saturating_sub(1) as usize;
        let secs = if rate_limited {
            BACKOFF_429_SECS
                .get(i)
                .or(BACKOFF_429_SECS.last())
                .copied()
                .unwrap_or(60)
        } else {
            self.backoff_secs
                .get(i)
                .or(self.backoff_secs.last())
                .copied()
                .unwrap_or(1)
        };
        Duration::from_secs(secs)
    }
}

/// Check response status and read body as text.
fn read_body(response: reqwest::blocking::Response, url: &str) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response.text().map_err(|source| FetchError::BodyRead {
        url: url.to_string(),
        source,
    })
}

impl DocumentFetcher for HttpFetcher {
    /// GET with retries on timeout, connection errors, HTTP 5xx, and HTTP 429.
    ///
    /// Other failures (e.g. 4xx except 429) are returned immediately. After the last
    /// attempt the final outcome is returned as-is.
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::trace!(url, attempt, "GET");
            let outcome = self.inner.get(url).send();
            let (retryable, rate_limited) = match &outcome {
                Ok(r) => {
                    let limited = r.status() == StatusCode::TOO_MANY_REQUESTS;
                    (r.status().is_server_error() || limited, limited)
                }
                Err(e) => (e.is_timeout() || e.is_connect(), false),
            };
            if retryable && attempt < self.retry_count {
                let wait = self.backoff_for(attempt, rate_limited);
                tracing::warn!(url, attempt, wait_secs = wait.as_secs(), "transient failure, retrying");
                std::thread::sleep(wait);
                continue;
            }
            let response = outcome.map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;
            return read_body(response, url);
        }
    }
}

/// Builder for HttpFetcher with optional User-Agent, timeout, and retry settings.
#[derive(Debug)]
pub struct HttpFetcherBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
    retry_count: u32,
    retry_backoff_secs: Vec<u64>,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_backoff_secs: DEFAULT_BACKOFF_SECS.to_vec(),
        }
    }
}

impl HttpFetcherBuilder {
    /// Set a custom User-Agent. If not set, a crate-identifying default is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set number of attempts for transient failures (default 3, minimum 1).
    pub fn retry_count(mut self, n: u32) -> Self {
        self.retry_count = n.max(1);
        self
    }

    /// Set backoff delays in seconds before each retry. If shorter than retry_count - 1, the last value is reused.
    pub fn retry_backoff_secs(mut self, secs: Vec<u64>) -> Self {
        self.retry_backoff_secs = secs;
        self
    }

    pub fn build(self) -> Result<HttpFetcher, FetchError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|source| FetchError::Client { source })?;
        let backoff_secs = if self.retry_backoff_secs.is_empty() {
            // Exponential: 1, 2, 4, ... for (retry_count - 1) steps
            let n = self.retry_count.saturating_sub(1) as usize;
            (0..n).map(|i| 1u64 << i.min(4)).collect::<Vec<_>>()
        } else {
            self.retry_backoff_secs
        };
        Ok(HttpFetcher {
            inner,
            retry_count: self.retry_count,
            backoff_secs,
        })
    }
}
