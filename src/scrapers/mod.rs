//! Site scrapers for the research agent.
//!
//! Each scraper module exposes a bounded collection routine that never fails:
//! network and parse faults degrade to partial results or sentinel content.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Enterprise Egypt | [`enterprise`] | HTML scraping | Paginated WordPress search, `/egypt/` articles only |
//!
//! Page retrieval goes through the [`PageFetcher`] trait so the markup
//! contract can be exercised against fixture HTML.

pub mod enterprise;

use crate::error::FetchError;

/// Retrieves the HTML body of a page.
pub trait PageFetcher {
    /// Fetch `url` and return its body. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
