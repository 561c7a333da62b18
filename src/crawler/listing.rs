//! Listing pages: fetching and company link extraction

use crate::config::{compile_selector, SelectorConfig};
use crate::crawler::slug::{build_resolver, SlugResolver};
use crate::crawler::transport::{fetch_with_retry, FetchResult, RetryPolicy, Transport};
use crate::url::SiteUrls;
use crate::ConfigError;
use scraper::{Html, Selector};

/// Outcome of fetching one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFetch {
    /// The page listed at least one company
    Found { page: u32, slugs: Vec<String> },

    /// The page loaded but listed no companies (end of pagination)
    Empty { page: u32 },

    /// The page could not be fetched
    Failed {
        page: u32,
        url: String,
        reason: String,
    },
}

/// Finds company links on listing pages
pub struct LinkExtractor {
    links: Selector,
    resolver: Box<dyn SlugResolver>,
}

impl LinkExtractor {
    pub fn new(links: Selector, resolver: Box<dyn SlugResolver>) -> Self {
        Self { links, resolver }
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            compile_selector("company-links", &config.company_links)?,
            build_resolver(config)?,
        ))
    }

    /// Returns the slugs of every company link in `html`, in document order
    pub fn extract_slugs(&self, html: &str) -> Vec<String> {
        extract_slugs(html, &self.links, self.resolver.as_ref())
    }
}

/// Extracts company slugs from listing markup
///
/// Anchors matching `links` whose slug cannot be resolved are skipped.
/// Duplicates are kept.
///
/// # Example
///
/// ```
/// use dsei_scraper::crawler::{extract_slugs, ScriptCallResolver};
/// use scraper::Selector;
///
/// let html = r#"<a class="js-librarylink-entry"
///     href="javascript:openRemoteModal('exhibitors-list/wind-river','ajax')">Wind River</a>"#;
/// let selector = Selector::parse("a.js-librarylink-entry").unwrap();
/// let resolver = ScriptCallResolver::from_pattern(r"'exhibitors-list/([^']+)'").unwrap();
///
/// assert_eq!(extract_slugs(html, &selector, &resolver), vec!["wind-river"]);
/// ```
pub fn extract_slugs(html: &str, links: &Selector, resolver: &dyn SlugResolver) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut slugs = Vec::new();

    for anchor in document.select(links) {
        match resolver.resolve(anchor) {
            Some(slug) => {
                tracing::debug!("Found company slug: {}", slug);
                slugs.push(slug);
            }
            None => tracing::debug!(
                "No slug in company link ({} resolver): {:?}",
                resolver.name(),
                anchor.value().attr("href")
            ),
        }
    }

    slugs
}

/// Fetches listing page `page` and extracts its company slugs
pub async fn fetch_listing(
    transport: &dyn Transport,
    urls: &SiteUrls,
    links: &LinkExtractor,
    retry: RetryPolicy<'_>,
    page: u32,
) -> ListingFetch {
    let url = match urls.listing_url(page) {
        Ok(url) => url.to_string(),
        Err(e) => {
            return ListingFetch::Failed {
                page,
                url: String::new(),
                reason: e.to_string(),
            }
        }
    };

    tracing::info!("Fetching page {}: {}", page, url);

    match fetch_with_retry(transport, &url, retry).await {
        FetchResult::Success { body, .. } => {
            let slugs = links.extract_slugs(&body);
            tracing::info!("Found {} companies on page {}", slugs.len(), page);
            if slugs.is_empty() {
                ListingFetch::Empty { page }
            } else {
                ListingFetch::Found { page, slugs }
            }
        }
        failure => {
            let reason = failure.failure_reason().unwrap_or_default();
            tracing::error!("Error fetching page {} ({}): {}", page, url, reason);
            ListingFetch::Failed { page, url, reason }
        }
    }
}
