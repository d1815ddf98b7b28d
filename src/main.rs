//! # Enterprise News Agent
//!
//! A research assistant for hotel expansion news in Egypt. It scrapes
//! [Enterprise](https://enterpriseam.com/egypt/) search results for a query,
//! hands the scraped text to an LLM for extraction, and answers follow-up
//! questions using only that research.
//!
//! ## Usage
//!
//! ```sh
//! # Raw digest, no LLM involved
//! enterprise_news_agent collect "hotel expansion Egypt 2025"
//!
//! # Research, then ask questions on stdin (`/search <query>` starts over)
//! enterprise_news_agent research "hotel expansion Egypt 2025"
//! ```
//!
//! ## Architecture
//!
//! 1. **Collecting**: page through search results, fetch each unique
//!    `/egypt/` article, build a bounded digest ([`scrapers::enterprise`])
//! 2. **Extracting**: the agent sends the digest to the LLM with the
//!    `hotel_extraction` template ([`agent`])
//! 3. **Q&A**: questions are answered from the stored research with the
//!    `research_qa` template

use awful_aj::{config_dir, template};
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod agent;
mod api;
mod cli;
mod config;
mod error;
mod models;
mod scrapers;
mod utils;

use agent::{EnterpriseSearchTool, NEEDS_RESEARCH, ResearchAgent, SearchTool};
use api::{AskAsync, AskFnWrapper, RetryAsk};
use cli::{Cli, Command, search_command};
use config::AppConfig;
use models::Session;
use scrapers::enterprise::{HttpFetcher, collect_digest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so stdout only carries results) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let app_config = AppConfig::load(&args).await?;
    info!(
        base_url = %app_config.collector.base_url,
        max_articles = app_config.collector.max_articles,
        max_pages = app_config.collector.max_pages,
        "Configuration loaded"
    );

    let fetcher = HttpFetcher::new(&app_config.collector)?;

    match args.command {
        Command::Collect { query } => {
            let digest = collect_digest(&fetcher, &app_config.collector, &query).await;
            println!("{digest}");
        }
        Command::Research { query } => {
            let tool = EnterpriseSearchTool::new(fetcher, app_config.collector.clone());
            run_research(&app_config, tool, &query).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

/// Load the LLM config and templates, run the first search, then serve
/// questions from stdin until EOF.
#[instrument(level = "info", skip(app_config, tool))]
async fn run_research<T: SearchTool>(
    app_config: &AppConfig,
    tool: T,
    query: &str,
) -> Result<(), Box<dyn Error>> {
    let conf_file = config_dir()?.join("config.yaml");
    let config_path = conf_file.to_str().ok_or("Not a valid config filename")?;
    let llm_config = awful_aj::config::load_config(config_path)?;
    info!(config_path, "Loaded LLM configuration");

    let extraction_template = template::load_template(&app_config.agent.extraction_template).await?;
    let qa_template = template::load_template(&app_config.agent.qa_template).await?;
    info!(
        extraction = %app_config.agent.extraction_template,
        qa = %app_config.agent.qa_template,
        "Loaded templates"
    );

    let base_delay = Duration::from_millis(app_config.agent.base_delay_ms);
    let max_retries = app_config.agent.max_retries;
    let extractor = RetryAsk::new(
        AskFnWrapper {
            config: &llm_config,
            template: &extraction_template,
        },
        max_retries,
        base_delay,
    );
    let answerer = RetryAsk::new(
        AskFnWrapper {
            config: &llm_config,
            template: &qa_template,
        },
        max_retries,
        base_delay,
    );
    info!(tool = tool.name(), description = %tool.description(), "Search tool ready");
    let agent = ResearchAgent::new(tool, extractor, answerer);

    let mut session = Session::default();
    search(&agent, &mut session, query).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if session.has_research() {
        eprintln!("Ask a question about the results (or /search <query>):");
    } else {
        eprintln!("{NEEDS_RESEARCH} Use /search <query>.");
    }
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(next_query) = search_command(line) {
            search(&agent, &mut session, next_query).await;
            continue;
        }

        match agent.answer(&mut session, line).await {
            Ok(answer) => println!("\n== Answer ==\n{answer}\n"),
            Err(e) => error!(error = %e, "Question could not be answered"),
        }
    }

    Ok(())
}

/// Run one research pass and print it; failures are reported, not fatal.
async fn search<T, A>(agent: &ResearchAgent<T, A>, session: &mut Session, query: &str)
where
    T: SearchTool,
    A: AskAsync<Response = String>,
{
    eprintln!("Researching Enterprise articles for \"{query}\"...");
    match agent.research(session, query).await {
        Ok(research) => println!("\n== Enterprise Research Results ==\n{research}\n"),
        Err(e) => error!(error = %e, %query, "Research failed"),
    }
}
