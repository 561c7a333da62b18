//! Field extraction from company detail markup
//!
//! Each field degrades to its empty default on its own: a page without a
//! description still yields a name, tags and website. HTML parsing itself
//! cannot fail (the HTML5 parser recovers from any input), and every selector
//! is compiled when the extractor is built, so `extract` is infallible.

use crate::config::{compile_pattern, compile_selector, Config, SelectorConfig, WebsiteConfig};
use crate::record::CompanyRecord;
use crate::url::{extract_domain, matches_any, matches_wildcard, own_domain};
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Decides whether an href can be reported as the company website
#[derive(Debug, Clone)]
pub struct WebsiteRules {
    allow: Regex,
    own_domain: Option<String>,
    denylist: Vec<String>,
}

impl WebsiteRules {
    pub fn new(allow: Regex, own_domain: Option<String>, denylist: Vec<String>) -> Self {
        Self {
            allow,
            own_domain,
            denylist,
        }
    }

    pub fn from_config(
        config: &WebsiteConfig,
        own_domain: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            compile_pattern("allow-pattern", &config.allow_pattern)?,
            own_domain,
            config.denylist.clone(),
        ))
    }

    /// Returns true if `href` is an external, non-social link
    ///
    /// The href must match the allow pattern and parse as an absolute URL
    /// with a host. It must not mention the site's own domain anywhere
    /// (host, path or query) nor point at a denylisted domain.
    pub fn accepts(&self, href: &str) -> bool {
        let href = href.trim();
        if !self.allow.is_match(href) {
            return false;
        }

        let Some(host) = Url::parse(href).ok().as_ref().and_then(extract_domain) else {
            return false;
        };

        if let Some(own) = &self.own_domain {
            if matches_wildcard(&format!("*.{}", own), &host)
                || href.to_lowercase().contains(own.as_str())
            {
                return false;
            }
        }

        !matches_any(&self.denylist, &host)
    }
}

/// Extracts a `CompanyRecord` from detail markup
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    title: Selector,
    categories: Selector,
    description: Selector,
    website_links: Selector,
    website: WebsiteRules,
}

impl FieldExtractor {
    pub fn new(selectors: &SelectorConfig, website: WebsiteRules) -> Result<Self, ConfigError> {
        Ok(Self {
            title: compile_selector("company-title", &selectors.company_title)?,
            categories: compile_selector("categories", &selectors.categories)?,
            description: compile_selector("description", &selectors.description)?,
            website_links: compile_selector("website-links", &selectors.website_links)?,
            website,
        })
    }

    /// Builds the extractor from the full configuration, deriving the
    /// site's own domain from the base URL unless it is set explicitly
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let own = match &config.site.own_domain {
            Some(domain) => Some(domain.to_lowercase()),
            None => Url::parse(&config.site.base_url)
                .ok()
                .as_ref()
                .and_then(own_domain),
        };

        let website = WebsiteRules::from_config(&config.website, own)?;
        Self::new(&config.selectors, website)
    }

    /// Extracts every field of the company behind `slug`
    pub fn extract(&self, slug: &str, html: &str) -> CompanyRecord {
        let document = Html::parse_document(html);

        let record = CompanyRecord {
            slug: slug.to_string(),
            name: self.extract_name(&document),
            tags: self.extract_tags(&document),
            overview: self.extract_overview(&document),
            website: self.extract_website(&document),
        };

        if record.name.is_empty() {
            tracing::debug!("No company name found for {}", slug);
        }
        tracing::debug!("Extracted data for {}", slug);
        record
    }

    fn extract_name(&self, document: &Html) -> String {
        document
            .select(&self.title)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    fn extract_tags(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.categories)
            .map(element_text)
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    fn extract_overview(&self, document: &Html) -> String {
        document
            .select(&self.description)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    fn extract_website(&self, document: &Html) -> String {
        document
            .select(&self.website_links)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .find(|href| self.website.accepts(href))
            .map(str::to_string)
            .unwrap_or_default()
    }
}

/// Concatenated text content of an element with whitespace collapsed
///
/// Text nodes are joined without a separator so inline markup such as
/// `C<sup>4</sup>ISR` reads as one word.
fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Collapses every run of whitespace into one space and trims both ends
///
/// ```
/// use dsei_scraper::crawler::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Secure\n\n comms\t kit "), "Secure comms kit");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
