//! Command-line interface definitions for the Enterprise news agent.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Collector limits can be provided via command-line flags or environment
//! variables; anything not given falls back to the config file, then to the
//! built-in defaults.

use clap::{Parser, Subcommand};

/// Default research query, the one the agent was built around.
pub const DEFAULT_QUERY: &str = "hotel expansion Egypt 2025";

/// Command-line arguments for the Enterprise news agent.
///
/// # Examples
///
/// ```sh
/// # Print the raw article digest for a query
/// enterprise_news_agent collect "hotel expansion Egypt 2025"
///
/// # Research with the LLM, then ask follow-up questions on stdin
/// enterprise_news_agent research "new resorts Sahl Hasheesh"
///
/// # Tighter limits for a quick look
/// enterprise_news_agent --max-articles 5 --max-pages 2 collect hotels
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Search endpoint of the target site (must end with '/')
    #[arg(long, env = "ENTERPRISE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Stop after this many articles
    #[arg(long, env = "ENTERPRISE_MAX_ARTICLES", global = true)]
    pub max_articles: Option<usize>,

    /// Never request more than this many search-results pages
    #[arg(long, env = "ENTERPRISE_MAX_PAGES", global = true)]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, env = "ENTERPRISE_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Scrape matching articles and print the digest, without calling the LLM
    Collect {
        /// Free-text search query
        query: String,
    },
    /// Research a query with the LLM, then answer questions read from stdin
    Research {
        /// Free-text search query
        #[arg(default_value = DEFAULT_QUERY)]
        query: String,
    },
}

/// Parse an interactive `/search <query>` line into its query.
///
/// Only the bare word `/search` followed by whitespace (or nothing) counts;
/// `/searching` is an ordinary question.
pub fn search_command(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("/search")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}
