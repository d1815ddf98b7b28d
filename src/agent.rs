//! Research agent: the search tool contract, extraction, and follow-up Q&A.
//!
//! The agent never scrapes by itself. It calls a [`SearchTool`] for the raw
//! digest, asks the LLM to pull hotel expansion details out of it, and keeps
//! the result in a [`Session`] so later questions can be answered from that
//! research alone.
//!
//! ```text
//! query ──► SearchTool::call ──► digest ──► extraction prompt ──► LLM ──► session.digest
//! question + session.digest ──► Q&A prompt ──► LLM ──► session.answer
//! ```

use crate::api::AskAsync;
use crate::config::CollectorConfig;
use crate::models::Session;
use crate::scrapers::PageFetcher;
use crate::scrapers::enterprise::collect_digest;
use crate::utils::truncate_for_log;
use std::error::Error;
use tracing::{debug, info, instrument};

/// Returned by [`ResearchAgent::answer`] when no search has been run yet.
pub const NEEDS_RESEARCH: &str = "Run a search first to enable Q&A.";

/// Fields the extraction prompt asks the LLM to report for every hotel.
const EXTRACTION_FIELDS: [&str; 5] = [
    "Hotel name & location",
    "Expansion details",
    "Opening date",
    "Developer/operator",
    "Source link",
];

/// A callable the agent uses to gather raw material.
///
/// Takes one free-text query and always yields a string: either the digest
/// or a sentinel describing why there is nothing to show.
pub trait SearchTool {
    fn name(&self) -> &str;
    fn description(&self) -> String;
    async fn call(&self, query: &str) -> String;
}

/// The Enterprise Egypt article collector exposed as a [`SearchTool`].
#[derive(Debug)]
pub struct EnterpriseSearchTool<F> {
    fetcher: F,
    config: CollectorConfig,
}

impl<F: PageFetcher> EnterpriseSearchTool<F> {
    pub fn new(fetcher: F, config: CollectorConfig) -> Self {
        Self { fetcher, config }
    }
}

impl<F: PageFetcher> SearchTool for EnterpriseSearchTool<F> {
    fn name(&self) -> &str {
        "enterprise_search_tool"
    }

    fn description(&self) -> String {
        format!(
            "Search up to {} Enterprise Egypt articles matching the query.",
            self.config.max_articles
        )
    }

    async fn call(&self, query: &str) -> String {
        collect_digest(&self.fetcher, &self.config, query).await
    }
}

/// Build the instruction that turns a digest into research results.
pub fn extraction_prompt(tool_name: &str, query: &str, digest: &str) -> String {
    let fields = EXTRACTION_FIELDS
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {f}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Use the {tool_name} results below to find hotel expansion news in Egypt.\n\n\
         Search query: {query}\n\n\
         Extract:\n{fields}\n\n\
         Only use Enterprise website data.\n\n\
         {tool_name} results:\n{digest}"
    )
}

/// Build the question prompt over previously gathered research.
pub fn qa_prompt(research: &str, question: &str) -> String {
    format!("Research Data:\n\n{research}\n\nQuestion:\n{question}")
}

/// Drives one search tool and two LLM clients: one carrying the extraction
/// template, one carrying the grounded Q&A template.
#[derive(Debug)]
pub struct ResearchAgent<T, A> {
    tool: T,
    extractor: A,
    answerer: A,
}

impl<T, A> ResearchAgent<T, A>
where
    T: SearchTool,
    A: AskAsync<Response = String>,
{
    pub fn new(tool: T, extractor: A, answerer: A) -> Self {
        Self {
            tool,
            extractor,
            answerer,
        }
    }

    /// Search, extract, and store the result as the session's research.
    ///
    /// On LLM failure the session keeps whatever it held before.
    #[instrument(level = "info", skip(self, session))]
    pub async fn research(
        &self,
        session: &mut Session,
        query: &str,
    ) -> Result<String, Box<dyn Error>> {
        info!(tool = self.tool.name(), "Invoking search tool");
        let digest = self.tool.call(query).await;
        debug!(digest = %truncate_for_log(&digest, 300), "Search tool returned");

        let prompt = extraction_prompt(self.tool.name(), query, &digest);
        let research = self.extractor.ask(&prompt).await?;

        session.begin(research.clone());
        info!(bytes = research.len(), "Research stored in session");
        Ok(research)
    }

    /// Answer `question` using only the session's research content.
    #[instrument(level = "info", skip(self, session))]
    pub async fn answer(
        &self,
        session: &mut Session,
        question: &str,
    ) -> Result<String, Box<dyn Error>> {
        let Some(research) = session.digest.as_deref() else {
            return Err(NEEDS_RESEARCH.into());
        };

        let answer = self.answerer.ask(&qa_prompt(research, question)).await?;
        session.record_answer(answer.clone());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_RESULTS;
    use crate::scrapers::enterprise::search_url;
    use crate::scrapers::enterprise::tests::{FixtureSite, article, listing};
    use std::sync::Mutex;

    /// Returns a canned digest and records the queries it was called with.
    struct CannedTool {
        digest: String,
        queries: Mutex<Vec<String>>,
    }

    impl CannedTool {
        fn new(digest: &str) -> Self {
            Self {
                digest: digest.to_string(),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl SearchTool for CannedTool {
        fn name(&self) -> &str {
            "canned_tool"
        }

        fn description(&self) -> String {
            "Canned digest.".to_string()
        }

        async fn call(&self, query: &str) -> String {
            self.queries.lock().unwrap().push(query.to_string());
            self.digest.clone()
        }
    }

    /// Records every prompt; answers with `reply` or fails when it is `None`.
    #[derive(Debug)]
    struct ScriptedLlm {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl AskAsync for ScriptedLlm {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
            self.prompts.lock().unwrap().push(text.to_string());
            self.reply.clone().ok_or_else(|| "model unavailable".into())
        }
    }

    #[test]
    fn test_extraction_prompt_lists_each_field_once() {
        let prompt = extraction_prompt("enterprise_search_tool", "hotels", "DIGEST");
        assert!(prompt.contains("Search query: hotels"));
        assert!(prompt.contains(
            "1. Hotel name & location\n2. Expansion details\n3. Opening date\n4. Developer/operator\n5. Source link"
        ));
        assert_eq!(prompt.matches("Source link").count(), 1);
        assert!(prompt.contains("Only use Enterprise website data."));
        assert!(prompt.ends_with("enterprise_search_tool results:\nDIGEST"));
    }

    #[test]
    fn test_qa_prompt_layout() {
        assert_eq!(
            qa_prompt("the research", "Who operates it?"),
            "Research Data:\n\nthe research\n\nQuestion:\nWho operates it?"
        );
    }

    #[tokio::test]
    async fn test_research_stores_llm_answer_in_session() {
        let agent = ResearchAgent::new(
            CannedTool::new("TITLE: T\nURL: U\nCONTENT:\nC"),
            ScriptedLlm::replying("1. Steigenberger, Hurghada"),
            ScriptedLlm::replying("unused"),
        );
        let mut session = Session::default();
        session.begin("old research".into());
        session.record_answer("old answer".into());

        let research = agent.research(&mut session, "hotel expansion").await.unwrap();

        assert_eq!(research, "1. Steigenberger, Hurghada");
        assert_eq!(session.digest.as_deref(), Some("1. Steigenberger, Hurghada"));
        assert!(session.answer.is_none());
        assert_eq!(*agent.tool.queries.lock().unwrap(), vec!["hotel expansion"]);
        let prompts = agent.extractor.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("TITLE: T\nURL: U\nCONTENT:\nC"));
    }

    #[tokio::test]
    async fn test_research_failure_leaves_session_untouched() {
        let agent = ResearchAgent::new(
            CannedTool::new("digest"),
            ScriptedLlm::failing(),
            ScriptedLlm::failing(),
        );
        let mut session = Session::default();
        session.begin("kept".into());

        let err = agent.research(&mut session, "q").await.unwrap_err();

        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(session.digest.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_answer_requires_research() {
        let agent = ResearchAgent::new(
            CannedTool::new("digest"),
            ScriptedLlm::replying("x"),
            ScriptedLlm::replying("y"),
        );
        let mut session = Session::default();

        let err = agent.answer(&mut session, "anything?").await.unwrap_err();

        assert_eq!(err.to_string(), NEEDS_RESEARCH);
        assert!(agent.answerer.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_answer_uses_session_research() {
        let agent = ResearchAgent::new(
            CannedTool::new("digest"),
            ScriptedLlm::replying("research"),
            ScriptedLlm::replying("It opens in Q3 2025."),
        );
        let mut session = Session::default();
        agent.research(&mut session, "q").await.unwrap();

        let answer = agent.answer(&mut session, "When does it open?").await.unwrap();

        assert_eq!(answer, "It opens in Q3 2025.");
        assert_eq!(session.answer.as_deref(), Some("It opens in Q3 2025."));
        assert_eq!(
            agent.answerer.prompts(),
            vec!["Research Data:\n\nresearch\n\nQuestion:\nWhen does it open?"]
        );
    }

    #[tokio::test]
    async fn test_enterprise_tool_over_fixture_site() {
        let config = CollectorConfig::default();
        let link = "https://enterpriseam.com/egypt/2025/05/01/hotel/";
        let site = FixtureSite::default()
            .html(
                &search_url(&config.base_url, "hotel", 1),
                &listing(&[(link, "New hotel in El Gouna")]),
            )
            .html(link, &article(&["Opening 2026."]));
        let tool = EnterpriseSearchTool::new(site, config);

        assert_eq!(tool.name(), "enterprise_search_tool");
        assert_eq!(
            tool.description(),
            "Search up to 40 Enterprise Egypt articles matching the query."
        );
        assert_eq!(
            tool.call("hotel").await,
            format!("TITLE: New hotel in El Gouna\nURL: {link}\nCONTENT:\nOpening 2026.")
        );
        assert_eq!(tool.call("nothing here").await, NO_RESULTS);
    }
}
