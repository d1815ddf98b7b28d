//! Enterprise Egypt article collector.
//!
//! This module scrapes [Enterprise](https://enterpriseam.com/egypt/), a
//! WordPress news site. Search results are paginated:
//!
//! ```text
//! https://enterpriseam.com/egypt/?s=hotel+expansion          (page 1)
//! https://enterpriseam.com/egypt/page/2/?s=hotel+expansion   (page 2..)
//! ```
//!
//! # Markup Contract
//!
//! - Listing pages link articles from `article h2 a` and `.entry-title a`.
//! - Article pages keep their body text in `article p`.
//! - Only URLs containing the relevance marker (`/egypt/`) are collected.
//!
//! If the site's markup changes, the selectors below are the only thing to
//! update.
//!
//! # Failure Handling
//!
//! A search page that fails (non-2xx or transport fault) ends the run and
//! whatever was collected so far is returned. An article page that fails is
//! still recorded, with [`SCRAPE_FAILED`] as its content.

use super::PageFetcher;
use crate::config::CollectorConfig;
use crate::error::FetchError;
use crate::models::{ArticleRecord, CollectionResult, LinkCandidate, SCRAPE_FAILED};
use crate::utils::encode_query;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

static LISTING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article h2 a, .entry-title a").unwrap());

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article p").unwrap());

/// HTTP-backed [`PageFetcher`] with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &CollectorConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Build the search-results URL for a 1-based `page`.
///
/// `base_url` is expected to end with `/`.
pub fn search_url(base_url: &str, query: &str, page: usize) -> String {
    let q = encode_query(query);
    if page <= 1 {
        format!("{base_url}?s={q}")
    } else {
        format!("{base_url}page/{page}/?s={q}")
    }
}

/// Extract article links from a listing page in document order.
///
/// Anchors without an `href` are dropped and repeated hrefs keep only their
/// first occurrence.
pub fn extract_links(html: &str) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    document
        .select(&LISTING_SELECTOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let title = a
                .text()
                .map(str::trim)
                .collect::<String>();
            Some(LinkCandidate {
                title,
                url: href.to_string(),
            })
        })
        .unique_by(|c| c.url.clone())
        .collect()
}

/// Extract the article body: every `article p`, one paragraph per line.
pub fn extract_body(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&BODY_SELECTOR)
        .map(|p| p.text().collect::<String>())
        .join("\n")
}

/// Absolute hrefs are kept verbatim; relative ones are resolved against the
/// search endpoint.
fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    base?.join(href).ok().map(|u| u.to_string())
}

/// Collect up to `max_articles` unique, relevant articles for `query`.
///
/// Pages and articles are requested one at a time. This function never fails;
/// see the module docs for how faults degrade.
#[instrument(level = "info", skip(fetcher, config))]
pub async fn collect<F: PageFetcher>(
    fetcher: &F,
    config: &CollectorConfig,
    query: &str,
) -> CollectionResult {
    let t0 = Instant::now();
    let base = Url::parse(&config.base_url).ok();
    let mut result = CollectionResult::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page = 1;

    'pages: while result.len() < config.max_articles && page <= config.max_pages {
        let page_url = search_url(&config.base_url, query, page);
        result.pages_fetched += 1;

        let html = match fetcher.fetch(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(page, url = e.url(), error = %e, "Search page failed; stopping collection");
                break;
            }
        };

        let candidates = extract_links(&html);
        debug!(page, url = %page_url, candidates = candidates.len(), "Parsed search page");

        for candidate in candidates {
            // The marker must be in the href as listed, not only after resolution.
            if !candidate.url.contains(&config.relevance_marker) {
                debug!(href = %candidate.url, "Link outside relevance marker; skipping");
                continue;
            }
            let Some(link) = resolve_href(base.as_ref(), &candidate.url) else {
                debug!(href = %candidate.url, "Unresolvable href; skipping");
                continue;
            };
            if !seen.insert(link.clone()) {
                continue;
            }

            let content = match fetcher.fetch(&link).await {
                Ok(body) => extract_body(&body),
                Err(e) => {
                    warn!(%link, error = %e, "Article fetch failed; using placeholder");
                    SCRAPE_FAILED.to_string()
                }
            };

            result.push(ArticleRecord::new(
                candidate.title,
                link,
                &content,
                config.max_content_chars,
            ));

            if result.len() >= config.max_articles {
                break 'pages;
            }
        }

        page += 1;
    }

    info!(
        records = result.len(),
        pages_fetched = result.pages_fetched,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Collection finished"
    );
    result
}

/// Run [`collect`] and render the digest handed to the agent.
pub async fn collect_digest<F: PageFetcher>(
    fetcher: &F,
    config: &CollectorConfig,
    query: &str,
) -> String {
    collect(fetcher, config, query).await.to_digest()
}
