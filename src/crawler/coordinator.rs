//! Scrape coordinator - the listing page loop
//!
//! This module drives one run:
//! - Fetching listing pages from the start page until the directory is exhausted
//! - Fetching and extracting every company found on a page
//! - Pacing requests and keeping the ordered record list
//! - Deciding between normal termination and a fatal start-up failure

use crate::config::Config;
use crate::crawler::detail::fetch_detail;
use crate::crawler::extract::FieldExtractor;
use crate::crawler::listing::{fetch_listing, LinkExtractor, ListingFetch};
use crate::crawler::pacing::{pause, FixedPacing, Pacing, Pause};
use crate::crawler::transport::{HttpTransport, RetryPolicy, Transport};
use crate::output::{write_csv, RunSummary};
use crate::record::CompanyRecord;
use crate::state::LoopState;
use crate::url::SiteUrls;
use crate::ScrapeError;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;

/// Page loop bounds and record policy for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// First listing page to fetch
    pub start_page: u32,

    /// Maximum number of listing pages to fetch, counted from `start_page`
    pub max_pages: Option<u32>,

    /// Skip companies whose detail page failed instead of emitting empty records
    pub strict: bool,

    /// Extra attempts for transient request failures
    pub max_retries: u32,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            start_page: config.run.start_page,
            max_pages: config.run.max_pages,
            strict: config.run.strict,
            max_retries: config.http.max_retries,
        }
    }
}

/// Main scrape coordinator
///
/// Owns the transport for the whole run; nothing else shares it.
pub struct Coordinator<T: Transport> {
    transport: T,
    urls: SiteUrls,
    links: LinkExtractor,
    extractor: FieldExtractor,
    pacing: Box<dyn Pacing>,
    options: RunOptions,
    state: LoopState,
    records: Vec<CompanyRecord>,
    summary: RunSummary,
}

impl Coordinator<HttpTransport> {
    /// Creates a coordinator that talks to the configured site over HTTP,
    /// pacing requests with the configured fixed delays
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let urls = SiteUrls::new(&config.site)?;
        let transport = HttpTransport::new(&config.http, urls.base())?;
        Self::with_urls(
            config,
            urls,
            transport,
            Box::new(FixedPacing::from_config(&config.delays)),
        )
    }
}

impl<T: Transport> Coordinator<T> {
    /// Creates a coordinator with an explicit transport and pacing policy
    pub fn new(
        config: &Config,
        transport: T,
        pacing: Box<dyn Pacing>,
    ) -> Result<Self, ScrapeError> {
        Self::with_urls(config, SiteUrls::new(&config.site)?, transport, pacing)
    }

    fn with_urls(
        config: &Config,
        urls: SiteUrls,
        transport: T,
        pacing: Box<dyn Pacing>,
    ) -> Result<Self, ScrapeError> {
        let options = RunOptions::from_config(config);

        Ok(Self {
            transport,
            urls,
            links: LinkExtractor::from_config(&config.selectors)?,
            extractor: FieldExtractor::from_config(config)?,
            pacing,
            options,
            state: LoopState::Running(options.start_page),
            records: Vec::new(),
            summary: RunSummary::new(Utc::now(), options.start_page),
        })
    }

    /// Overrides the run options taken from the configuration
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self.state = LoopState::Running(options.start_page);
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Records collected so far, in discovery order
    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    /// Statistics of the current (or last) run
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Runs the listing page loop until the directory is exhausted
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - The loop ended normally; `records()` holds the results
    /// * `Err(ScrapeError::FirstPageUnreachable)` - The start page could not be fetched
    pub async fn run(&mut self) -> Result<RunSummary, ScrapeError> {
        let started = Instant::now();
        self.records.clear();
        self.summary = RunSummary::new(Utc::now(), self.options.start_page);
        self.state = LoopState::Running(self.options.start_page);

        tracing::info!(
            "Starting exhibitor scrape at page {} (max pages: {})",
            self.options.start_page,
            self.options
                .max_pages
                .map_or_else(|| "all".to_string(), |max| max.to_string())
        );

        let result = self.page_loop().await;

        self.summary.records_collected = self.records.len() as u64;
        self.summary.elapsed = started.elapsed();

        match &result {
            Ok(()) => tracing::info!("Scraping completed: {}", self.summary),
            Err(e) => tracing::error!("Scraping aborted: {}", e),
        }

        result.map(|()| self.summary.clone())
    }

    async fn page_loop(&mut self) -> Result<(), ScrapeError> {
        while let LoopState::Running(page) = self.state {
            if self.page_budget_spent() {
                tracing::info!(
                    "Reached maximum pages limit: {}",
                    self.options.max_pages.unwrap_or_default()
                );
                self.transition(LoopState::EndOfPages);
                break;
            }

            let retry = RetryPolicy {
                max_retries: self.options.max_retries,
                pacing: self.pacing.as_ref(),
            };
            let outcome =
                fetch_listing(&self.transport, &self.urls, &self.links, retry, page).await;
            self.summary.pages_fetched += 1;

            match outcome {
                ListingFetch::Found { page, slugs } => {
                    self.transition(LoopState::HasLinks {
                        page,
                        slugs: slugs.clone(),
                    });
                    self.process_companies(page, &slugs).await;

                    match page.checked_add(1) {
                        Some(next) => {
                            self.transition(LoopState::Running(next));
                            if !self.page_budget_spent() {
                                pause(self.pacing.as_ref(), Pause::BetweenPages).await;
                            }
                        }
                        None => {
                            tracing::warn!("Page {} is the last addressable listing page", page);
                            self.transition(LoopState::EndOfPages);
                        }
                    }
                }

                ListingFetch::Empty { page } => {
                    tracing::info!("No companies found on page {}. Parsing completed.", page);
                    self.transition(LoopState::EndOfPages);
                }

                ListingFetch::Failed { page, url, reason } if page == self.options.start_page => {
                    self.transition(LoopState::FatalError);
                    return Err(ScrapeError::FirstPageUnreachable { page, url, reason });
                }

                ListingFetch::Failed { page, reason, .. } => {
                    tracing::warn!(
                        "Listing page {} unavailable ({}); treating as end of pagination",
                        page,
                        reason
                    );
                    self.transition(LoopState::EndOfPages);
                }
            }
        }

        debug_assert!(self.state.is_terminal());
        Ok(())
    }

    /// Fetches and extracts every company listed on `page`
    async fn process_companies(&mut self, page: u32, slugs: &[String]) {
        for (index, slug) in slugs.iter().enumerate() {
            if index > 0 {
                pause(self.pacing.as_ref(), Pause::BetweenDetails).await;
            }
            self.summary.companies_found += 1;

            let retry = RetryPolicy {
                max_retries: self.options.max_retries,
                pacing: self.pacing.as_ref(),
            };

            match fetch_detail(&self.transport, &self.urls, retry, slug, page).await {
                Ok(body) => {
                    let record = self.extractor.extract(slug, &body);
                    if record.is_empty() {
                        tracing::warn!("No company fields found in details of {}", slug);
                    } else {
                        tracing::info!(
                            "Processed: {}",
                            if record.name.is_empty() { slug } else { &record.name }
                        );
                    }
                    self.records.push(record);
                }
                Err(failure) if self.options.strict => {
                    tracing::warn!("Skipping company on page {} ({})", page, failure);
                    self.summary.detail_failures += 1;
                    self.summary.records_skipped += 1;
                }
                Err(failure) => {
                    tracing::warn!(
                        "Failed to get details on page {} ({}); emitting empty record",
                        page,
                        failure
                    );
                    self.summary.detail_failures += 1;
                    self.records.push(CompanyRecord::empty(slug.as_str()));
                }
            }
        }
    }

    fn page_budget_spent(&self) -> bool {
        self.options
            .max_pages
            .is_some_and(|max| self.summary.pages_fetched >= max)
    }

    fn transition(&mut self, next: LoopState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid loop transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("Loop state {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Runs a complete scrape and writes the CSV output
///
/// This is the main library entry point:
///
/// 1. Build the HTTP transport and extractors from `config`
/// 2. Walk listing pages from `run.start-page`
/// 3. Fetch and extract every company detail page
/// 4. Write all records to `output.csv-path`
///
/// Nothing is written when the start page is unreachable.
///
/// # Example
///
/// ```no_run
/// use dsei_scraper::config::load_config;
/// use dsei_scraper::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = run_scrape(&config).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config) -> Result<RunSummary, ScrapeError> {
    let mut coordinator = Coordinator::from_config(config)?;
    scrape_to_csv(&mut coordinator, config).await
}

/// Runs `coordinator` and writes its records to the configured CSV path
pub async fn scrape_to_csv<T: Transport>(
    coordinator: &mut Coordinator<T>,
    config: &Config,
) -> Result<RunSummary, ScrapeError> {
    let mut summary = coordinator.run().await?;

    if coordinator.records().is_empty() {
        tracing::warn!("No data to save");
    }

    let written = write_csv(
        coordinator.records(),
        Path::new(&config.output.csv_path),
        &config.output.tags_separator,
    )?;
    summary.records_written = Some(written);

    Ok(summary)
}
