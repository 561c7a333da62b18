//! Company detail page fetching

use crate::crawler::transport::{fetch_with_retry, FetchResult, RetryPolicy, Transport};
use crate::url::SiteUrls;
use std::fmt;

/// A detail page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFailure {
    pub slug: String,
    pub url: String,
    pub reason: String,
}

impl fmt::Display for DetailFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "details for {} unavailable at {}: {}",
            self.slug, self.url, self.reason
        )
    }
}

/// Fetches the detail markup of `slug`, found on listing page `page`
pub async fn fetch_detail(
    transport: &dyn Transport,
    urls: &SiteUrls,
    retry: RetryPolicy<'_>,
    slug: &str,
    page: u32,
) -> Result<String, DetailFailure> {
    let url = urls
        .detail_url(slug, page)
        .map_err(|e| DetailFailure {
            slug: slug.to_string(),
            url: String::new(),
            reason: e.to_string(),
        })?
        .to_string();

    tracing::debug!("Fetching company details: {}", url);

    match fetch_with_retry(transport, &url, retry).await {
        FetchResult::Success { body, .. } => Ok(body),
        failure => Err(DetailFailure {
            slug: slug.to_string(),
            url,
            reason: failure.failure_reason().unwrap_or_default(),
        }),
    }
}
