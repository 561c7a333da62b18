//! Slug resolution strategies
//!
//! Listing anchors do not carry the company slug in a plain href on every
//! site; the DSEI directory hides it inside an inline script call such as
//! `javascript:openRemoteModal('exhibitors-list/wind-river','ajax',{},'')`.
//! A `SlugResolver` turns one anchor into a slug, so other markup shapes can
//! be supported without touching the page loop.

use crate::config::{compile_pattern, ResolverKind, SelectorConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::ElementRef;

/// Recovers a company slug from a listing anchor
pub trait SlugResolver: Send + Sync {
    /// Returns the slug, or None if this anchor does not carry one
    fn resolve(&self, anchor: ElementRef<'_>) -> Option<String>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}

/// Matches a regex against the anchor's inline script attributes
///
/// The first capture group of the pattern is the slug. `href` is tried first,
/// then `onclick`.
#[derive(Debug, Clone)]
pub struct ScriptCallResolver {
    pattern: Regex,
}

impl ScriptCallResolver {
    const ATTRIBUTES: [&'static str; 2] = ["href", "onclick"];

    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn from_pattern(pattern: &str) -> Result<Self, ConfigError> {
        compile_pattern("slug-pattern", pattern).map(Self::new)
    }
}

impl SlugResolver for ScriptCallResolver {
    fn resolve(&self, anchor: ElementRef<'_>) -> Option<String> {
        Self::ATTRIBUTES.iter().find_map(|attribute| {
            let value = anchor.value().attr(attribute)?;
            let captures = self.pattern.captures(value)?;
            captures
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|slug| !slug.is_empty())
        })
    }

    fn name(&self) -> &'static str {
        "script-call"
    }
}

/// Takes the path segment following a marker segment in a plain href
///
/// With the default marker, `/exhibitors-list/acme-defence?page=2` yields
/// `acme-defence`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    marker: String,
}

impl PathResolver {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new("exhibitors-list")
    }
}

impl SlugResolver for PathResolver {
    fn resolve(&self, anchor: ElementRef<'_>) -> Option<String> {
        let href = anchor.value().attr("href")?.trim();
        if href.starts_with("javascript:") {
            return None;
        }

        let path = href.split(['?', '#']).next()?;
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        segments.find(|segment| *segment == self.marker)?;
        segments.next().map(str::to_string)
    }

    fn name(&self) -> &'static str {
        "path"
    }
}

/// Builds the resolver selected by `selectors.slug-resolver`
pub fn build_resolver(config: &SelectorConfig) -> Result<Box<dyn SlugResolver>, ConfigError> {
    Ok(match config.slug_resolver {
        ResolverKind::ScriptCall => {
            Box::new(ScriptCallResolver::from_pattern(&config.slug_pattern)?)
        }
        ResolverKind::Path => Box::new(PathResolver::default()),
    })
}
