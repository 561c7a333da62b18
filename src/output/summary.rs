//! Run statistics
//!
//! Counters collected while the page loop runs, logged and printed once the
//! run finishes.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Summary of one scrape run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// When the page loop started
    pub started_at: DateTime<Utc>,

    /// First listing page requested
    pub start_page: u32,

    /// Listing page requests issued (successful or not)
    pub pages_fetched: u32,

    /// Company slugs discovered across all listing pages
    pub companies_found: u64,

    /// Detail pages that could not be fetched
    pub detail_failures: u64,

    /// Companies dropped because strict mode disallows empty records
    pub records_skipped: u64,

    /// Records collected for output
    pub records_collected: u64,

    /// Rows written to the CSV file (set once the file is written)
    pub records_written: Option<usize>,

    /// Wall-clock duration of the page loop
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, start_page: u32) -> Self {
        Self {
            started_at,
            start_page,
            pages_fetched: 0,
            companies_found: 0,
            detail_failures: 0,
            records_skipped: 0,
            records_collected: 0,
            records_written: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Last listing page requested, if any
    pub fn last_page(&self) -> Option<u32> {
        self.pages_fetched
            .checked_sub(1)
            .map(|offset| self.start_page.saturating_add(offset))
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} listing pages, {} companies found, {} records collected, \
             {} detail failures, {} skipped in {:.1}s",
            self.pages_fetched,
            self.companies_found,
            self.records_collected,
            self.detail_failures,
            self.records_skipped,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");
    println!("Started:            {}", summary.started_at.to_rfc3339());
    match summary.last_page() {
        Some(last) => println!(
            "Listing pages:      {} ({}..={})",
            summary.pages_fetched, summary.start_page, last
        ),
        None => println!("Listing pages:      0"),
    }
    println!("Companies found:    {}", summary.companies_found);
    println!("Records collected:  {}", summary.records_collected);
    println!("Detail failures:    {}", summary.detail_failures);
    if summary.records_skipped > 0 {
        println!("Skipped (strict):   {}", summary.records_skipped);
    }
    if let Some(written) = summary.records_written {
        println!("Rows written:       {}", written);
    }
    println!("Elapsed:            {:.1}s", summary.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page() {
        let mut summary = RunSummary::new(Utc::now(), 3);
        assert_eq!(summary.last_page(), None);

        summary.pages_fetched = 2;
        assert_eq!(summary.last_page(), Some(4));
    }

    #[test]
    fn test_display() {
        let mut summary = RunSummary::new(Utc::now(), 1);
        summary.pages_fetched = 2;
        summary.companies_found = 5;
        summary.records_collected = 4;
        summary.detail_failures = 1;
        summary.records_skipped = 1;

        let line = summary.to_string();
        assert!(line.starts_with("2 listing pages, 5 companies found, 4 records collected"));
        assert!(line.contains("1 detail failures"));
    }
}
