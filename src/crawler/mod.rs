//! Crawler module for listing and detail page processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP transport with browser-like headers and optional retries
//! - Company slug extraction from listing pages
//! - Detail page fetching and field extraction
//! - Request pacing
//! - Overall page loop coordination

mod coordinator;
mod detail;
mod extract;
mod listing;
mod pacing;
mod slug;
mod transport;

pub use coordinator::{run_scrape, scrape_to_csv, Coordinator, RunOptions};
pub use detail::{fetch_detail, DetailFailure};
pub use extract::{normalize_whitespace, FieldExtractor, WebsiteRules};
pub use listing::{extract_slugs, fetch_listing, LinkExtractor, ListingFetch};
pub use pacing::{pause, FixedPacing, NoPacing, Pacing, Pause};
pub use slug::{build_resolver, PathResolver, ScriptCallResolver, SlugResolver};
pub use transport::{
    build_http_client, fetch_url, fetch_with_retry, FetchResult, HttpTransport, RetryPolicy,
    Transport,
};
