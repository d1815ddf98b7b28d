//! Data models for collected articles and the research session.
//!
//! This module defines the core data structures used throughout the application:
//! - [`LinkCandidate`]: An article link found on a search-results page
//! - [`ArticleRecord`]: One scraped article, content already truncated
//! - [`CollectionResult`]: The ordered records produced by one collector run
//! - [`Session`]: The digest and answer shown to the user between searches

use crate::utils::truncate_chars;

/// Returned by the collector when a run yields no records at all.
pub const NO_RESULTS: &str = "No relevant articles found.";

/// Substituted for the body of an article that could not be fetched.
pub const SCRAPE_FAILED: &str = "Failed to scrape article.";

/// An article link taken from a listing page, paired with its headline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Visible anchor text, whitespace-trimmed.
    pub title: String,
    /// The `href` exactly as it appears in the listing markup.
    pub url: String,
}

/// A single scraped article.
///
/// Records are immutable once built. [`ArticleRecord::new`] is the only
/// constructor, so the content bound holds for every record in existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    title: String,
    url: String,
    content: String,
}

impl ArticleRecord {
    /// Build a record, keeping at most `max_content_chars` characters of `content`.
    pub fn new(title: String, url: String, content: &str, max_content_chars: usize) -> Self {
        Self {
            title,
            url,
            content: truncate_chars(content, max_content_chars).to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Render the record as the three-line block handed to the agent.
    ///
    /// ```text
    /// TITLE: <title>
    /// URL: <url>
    /// CONTENT:
    /// <content>
    /// ```
    pub fn to_block(&self) -> String {
        format!(
            "TITLE: {}\nURL: {}\nCONTENT:\n{}",
            self.title(),
            self.url(),
            self.content()
        )
    }
}

/// The output of one collector run.
#[derive(Debug, Default)]
pub struct CollectionResult {
    records: Vec<ArticleRecord>,
    /// Number of search-results pages requested, including a failed final one.
    pub pages_fetched: usize,
}

impl CollectionResult {
    pub fn push(&mut self, record: ArticleRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Join every record with a blank line, or return [`NO_RESULTS`] when
    /// nothing was collected.
    pub fn to_digest(&self) -> String {
        if self.is_empty() {
            return NO_RESULTS.to_string();
        }
        self.records()
            .iter()
            .map(ArticleRecord::to_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Per-user state kept between a search and the questions that follow it.
///
/// Created empty, filled by the first successful research run, replaced by the
/// next one. The Q&A handler only reads `digest` and writes `answer`.
#[derive(Debug, Default, Clone)]
pub struct Session {
    /// The research content produced by the last search.
    pub digest: Option<String>,
    /// The answer to the most recent question about `digest`.
    pub answer: Option<String>,
}

impl Session {
    /// Replace the research content and forget any earlier answer.
    pub fn begin(&mut self, digest: String) {
        self.digest = Some(digest);
        self.answer = None;
    }

    pub fn record_answer(&mut self, answer: String) {
        self.answer = Some(answer);
    }

    pub fn has_research(&self) -> bool {
        self.digest.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, url: &str, content: &str) -> ArticleRecord {
        ArticleRecord::new(title.to_string(), url.to_string(), content, 6000)
    }

    #[test]
    fn test_record_block_format() {
        let r = record(
            "Marriott adds Red Sea resort",
            "https://enterpriseam.com/egypt/2025/01/02/marriott/",
            "First paragraph.\nSecond paragraph.",
        );
        assert_eq!(
            r.to_block(),
            "TITLE: Marriott adds Red Sea resort\n\
             URL: https://enterpriseam.com/egypt/2025/01/02/marriott/\n\
             CONTENT:\n\
             First paragraph.\nSecond paragraph."
        );
    }

    #[test]
    fn test_record_truncates_content() {
        let long = "x".repeat(7000);
        let r = ArticleRecord::new("t".into(), "u".into(), &long, 6000);
        assert_eq!(r.content().chars().count(), 6000);
    }

    #[test]
    fn test_empty_result_digest_is_sentinel() {
        let result = CollectionResult::default();
        assert!(result.is_empty());
        assert_eq!(result.to_digest(), NO_RESULTS);
    }

    #[test]
    fn test_digest_joins_with_blank_line() {
        let mut result = CollectionResult::default();
        result.push(record("A", "https://e/egypt/a", "a body"));
        result.push(record("B", "https://e/egypt/b", "b body"));
        assert_eq!(result.len(), 2);
        assert_eq!(
            result.to_digest(),
            "TITLE: A\nURL: https://e/egypt/a\nCONTENT:\na body\n\n\
             TITLE: B\nURL: https://e/egypt/b\nCONTENT:\nb body"
        );
    }

    #[test]
    fn test_session_begin_clears_answer() {
        let mut session = Session::default();
        assert!(!session.has_research());

        session.begin("first digest".into());
        session.record_answer("an answer".into());
        assert_eq!(session.answer.as_deref(), Some("an answer"));

        session.begin("second digest".into());
        assert_eq!(session.digest.as_deref(), Some("second digest"));
        assert!(session.answer.is_none());
        assert!(session.has_research());
    }
}
