//! URL handling module
//!
//! Builds the listing and detail URLs of the exhibitor directory and provides
//! domain matching used when choosing a company's website.

mod domain;
mod matcher;

use crate::config::SiteConfig;
use crate::{ScrapeError, UrlError};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, own_domain};
pub use matcher::{matches_any, matches_wildcard};

/// URL templates for one exhibitor directory
///
/// Listing pages live at
/// `{base}/visit/exhibiting-companies?&page={page}&searchgroup={listing-group}`
/// and company details at
/// `{base}/exhibitors-list/{slug}?=&page={page}&searchgroup={detail-group}`.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
    listing_group: String,
    detail_group: String,
}

impl SiteUrls {
    /// Creates the URL builder from the site configuration
    pub fn new(config: &SiteConfig) -> Result<Self, ScrapeError> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(UrlError::CannotBeABase(config.base_url.clone()).into());
        }

        Ok(Self {
            base,
            listing_group: config.listing_search_group.clone(),
            detail_group: config.detail_search_group.clone(),
        })
    }

    /// The base URL every request is built on (also sent as the Referer)
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Builds the URL of listing page `page`
    ///
    /// ```
    /// use dsei_scraper::config::SiteConfig;
    /// use dsei_scraper::url::SiteUrls;
    ///
    /// let urls = SiteUrls::new(&SiteConfig::default()).unwrap();
    /// assert_eq!(
    ///     urls.listing_url(2).unwrap().as_str(),
    ///     "https://www.dsei.co.uk/visit/exhibiting-companies?&page=2&searchgroup=65207D8C-exhibitors-list"
    /// );
    /// ```
    pub fn listing_url(&self, page: u32) -> Result<Url, UrlError> {
        let mut url = self.with_segments(&["visit", "exhibiting-companies"])?;
        url.set_query(Some(&format!(
            "&page={}&searchgroup={}",
            page, self.listing_group
        )));
        Ok(url)
    }

    /// Builds the detail URL for `slug`, found on listing page `page`
    ///
    /// The slug is percent-encoded as a single path segment.
    pub fn detail_url(&self, slug: &str, page: u32) -> Result<Url, UrlError> {
        let mut url = self.with_segments(&["exhibitors-list", slug])?;
        url.set_query(Some(&format!(
            "=&page={}&searchgroup={}",
            page, self.detail_group
        )));
        Ok(url)
    }

    fn with_segments(&self, segments: &[&str]) -> Result<Url, UrlError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| UrlError::CannotBeABase(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
