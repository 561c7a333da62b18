use serde::Deserialize;

/// Main configuration structure for the exhibitor scraper
///
/// Every section and key has a default, so an empty (or absent) file yields
/// the built-in settings for the DSEI exhibitor directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub delays: DelayConfig,
    pub selectors: SelectorConfig,
    pub website: WebsiteConfig,
    pub output: OutputConfig,
    pub run: RunConfig,
}

/// Target site and the URL tokens it expects
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host every listing/detail URL is built on
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// `searchgroup` token sent with listing page requests
    #[serde(rename = "listing-search-group")]
    pub listing_search_group: String,

    /// `searchgroup` token sent with company detail requests
    #[serde(rename = "detail-search-group")]
    pub detail_search_group: String,

    /// Domain treated as "our own" when picking a company website.
    /// Derived from `base-url` when absent.
    #[serde(rename = "own-domain")]
    pub own_domain: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.dsei.co.uk".to_string(),
            listing_search_group: "65207D8C-exhibitors-list".to_string(),
            detail_search_group: "libraryentry-exhibitors-list".to_string(),
            own_domain: None,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a failed request (0 disables retrying)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:142.0) Gecko/20100101 Firefox/142.0"
                .to_string(),
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

/// Fixed pacing between requests (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    #[serde(rename = "between-companies-ms")]
    pub between_companies_ms: u64,

    #[serde(rename = "between-pages-ms")]
    pub between_pages_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            between_companies_ms: 200,
            between_pages_ms: 1000,
        }
    }
}

/// Which slug resolution strategy to apply to listing anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverKind {
    /// Slug embedded in a `javascript:openRemoteModal('exhibitors-list/<slug>', ...)` href
    #[default]
    ScriptCall,
    /// Slug as the last segment of a plain `/exhibitors-list/<slug>` href
    Path,
}

/// CSS selectors and patterns used against listing and detail markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    #[serde(rename = "company-links")]
    pub company_links: String,

    /// Regex with one capture group recovering the slug from an href
    #[serde(rename = "slug-pattern")]
    pub slug_pattern: String,

    #[serde(rename = "slug-resolver")]
    pub slug_resolver: ResolverKind,

    #[serde(rename = "company-title")]
    pub company_title: String,

    pub categories: String,

    pub description: String,

    #[serde(rename = "website-links")]
    pub website_links: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            company_links: "a.js-librarylink-entry".to_string(),
            slug_pattern: r"'exhibitors-list/([^']+)'".to_string(),
            slug_resolver: ResolverKind::ScriptCall,
            company_title: "h1.m-exhibitor-entry__item__header__title, h1".to_string(),
            categories: "li.m-exhibitor-entry__item__header__categories__item".to_string(),
            description: "div.m-exhibitor-entry__item__body__description".to_string(),
            website_links: "a[href]".to_string(),
        }
    }
}

/// Rules for picking the company website out of detail page links
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebsiteConfig {
    /// Regex an href must match to be considered external
    #[serde(rename = "allow-pattern")]
    pub allow_pattern: String,

    /// Social and tracking domains never reported as a company website
    pub denylist: Vec<String>,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        let denylist = [
            "*.facebook.com",
            "*.twitter.com",
            "*.x.com",
            "*.linkedin.com",
            "*.instagram.com",
            "*.youtube.com",
            "*.tiktok.com",
            "*.flickr.com",
            "*.google.com",
            "*.google-analytics.com",
            "*.googletagmanager.com",
            "*.doubleclick.net",
            "*.hubspot.com",
        ];

        Self {
            allow_pattern: r"^https?://".to_string(),
            denylist: denylist.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file written at the end of a run
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// Path of the DEBUG-level log file
    #[serde(rename = "log-path")]
    pub log_path: String,

    /// Separator placed between tags in the `tags` column
    #[serde(rename = "tags-separator")]
    pub tags_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/processed/dsei_companies.csv".to_string(),
            log_path: "logs/scraper.log".to_string(),
            tags_separator: "; ".to_string(),
        }
    }
}

/// Page loop bounds and record policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Upper bound on listing pages fetched; unbounded when absent
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Drop companies whose detail page could not be fetched instead of
    /// emitting an empty record
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            max_pages: None,
            strict: false,
        }
    }
}
