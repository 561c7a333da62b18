//! HTTP transport
//!
//! This module handles every HTTP request the scraper makes:
//! - Building the reqwest client with the fixed browser-like header set
//! - Classifying responses into success, HTTP error, and network error
//! - Optional retry with back-off for transient failures
//!
//! The `Transport` trait is the seam tests use to inject canned responses.

use crate::config::HttpConfig;
use crate::crawler::pacing::{pause, Pacing, Pause};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the configured timeout
        timed_out: bool,
    },
}

impl FetchResult {
    /// Returns true for failures worth another attempt
    ///
    /// | Condition | Retry |
    /// |-----------|-------|
    /// | Network error / timeout | yes |
    /// | HTTP 405, 429 (site protection) | yes |
    /// | HTTP 5xx | yes |
    /// | Other HTTP errors | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Success { .. } => false,
            Self::HttpError { status_code } => {
                matches!(status_code, 405 | 429) || (500..600).contains(status_code)
            }
            Self::NetworkError { .. } => true,
        }
    }

    /// Short description of a failure, for logs and error messages
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error, timed_out: true } => {
                Some(format!("request timed out: {}", error))
            }
            Self::NetworkError { error, .. } => Some(error.clone()),
        }
    }
}

/// Issues GET requests on behalf of the fetchers
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> FetchResult;
}

/// reqwest-backed transport sharing one connection pool and cookie jar
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the transport from the HTTP settings, using `referer` as the
    /// Referer header of every request
    pub fn new(config: &HttpConfig, referer: &Url) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, referer)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with the fixed XHR-style header set
///
/// Accept-Encoding is filled in by reqwest from the enabled decoders
/// (gzip, br, deflate) so compressed bodies are always decoded.
///
/// # Example
///
/// ```no_run
/// use dsei_scraper::config::HttpConfig;
/// use dsei_scraper::crawler::build_http_client;
/// use url::Url;
///
/// let referer = Url::parse("https://www.dsei.co.uk").unwrap();
/// let client = build_http_client(&HttpConfig::default(), &referer).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig, referer: &Url) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-GB,en-US;q=0.7,en;q=0.3"),
    );
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert("sec-gpc", HeaderValue::from_static("1"));
    match HeaderValue::from_str(referer.as_str()) {
        Ok(value) => {
            headers.insert(REFERER, value);
        }
        Err(e) => tracing::warn!("Not sending Referer {}: {}", referer, e),
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: e.is_timeout(),
                },
            }
        }
        Err(e) if e.is_timeout() => FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: true,
        },
        Err(e) if e.is_connect() => FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        },
    }
}

/// Retry settings for one run
#[derive(Clone, Copy)]
pub struct RetryPolicy<'a> {
    pub max_retries: u32,
    pub pacing: &'a dyn Pacing,
}

/// Fetches `url`, retrying transient failures up to `policy.max_retries` times
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &str,
    policy: RetryPolicy<'_>,
) -> FetchResult {
    let mut attempt = 0;
    loop {
        let result = transport.get(url).await;
        if attempt >= policy.max_retries || !result.is_retryable() {
            if attempt > 0 && result.is_retryable() {
                tracing::error!("All {} attempts failed for {}", attempt + 1, url);
            }
            return result;
        }

        attempt += 1;
        tracing::warn!(
            "Attempt {} failed for {}: {}",
            attempt,
            url,
            result.failure_reason().unwrap_or_default()
        );
        pause(policy.pacing, Pause::Retry(attempt)).await;
    }
}
