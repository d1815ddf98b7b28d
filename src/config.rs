//! Runtime configuration for the collector and the agent.
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults (the Enterprise Egypt site contract)
//! 2. An optional YAML file passed with `--config`
//! 3. Individual CLI flags / environment variables
//!
//! ```yaml
//! collector:
//!   base_url: "https://enterpriseam.com/egypt/"
//!   relevance_marker: "/egypt/"
//!   max_articles: 40
//!   max_pages: 20
//!   request_timeout_secs: 10
//!   max_content_chars: 6000
//! agent:
//!   extraction_template: hotel_extraction
//!   qa_template: research_qa
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Limits and site contract for one collector run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollectorConfig {
    /// Search endpoint; must end with `/` so `page/N/` can be appended.
    pub base_url: String,
    /// Substring every article URL must contain to be collected.
    pub relevance_marker: String,
    pub max_articles: usize,
    pub max_pages: usize,
    pub request_timeout_secs: u64,
    pub max_content_chars: usize,
    pub user_agent: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://enterpriseam.com/egypt/".to_string(),
            relevance_marker: "/egypt/".to_string(),
            max_articles: 40,
            max_pages: 20,
            request_timeout_secs: 10,
            max_content_chars: 6000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CollectorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_articles", self.max_articles as u64),
            ("max_pages", self.max_pages as u64),
            ("max_content_chars", self.max_content_chars as u64),
            ("request_timeout_secs", self.request_timeout_secs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }

        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {}: {e}", self.base_url)))?;
        if base.cannot_be_a_base() || !self.base_url.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "base_url {} must be an absolute URL ending with '/'",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Chat templates and retry policy for LLM calls.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// `awful_aj` template used to turn a digest into research results.
    pub extraction_template: String,
    /// `awful_aj` template used to answer follow-up questions.
    pub qa_template: String,
    pub max_retries: usize,
    pub base_delay_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            extraction_template: "hotel_extraction".to_string(),
            qa_template: "research_qa".to_string(),
            max_retries: 5,
            base_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub collector: CollectorConfig,
    pub agent: AgentConfig,
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load the YAML file if one was given, apply CLI overrides, then validate.
    #[instrument(level = "info", skip_all)]
    pub async fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| ConfigError::Read {
                        path: path.clone(),
                        source,
                    })?;
                debug!(%path, "Read config file");
                Self::from_yaml(&yaml)?
            }
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.collector.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        let c = &mut self.collector;
        if let Some(base_url) = &cli.base_url {
            c.base_url = base_url.clone();
        }
        if let Some(n) = cli.max_articles {
            c.max_articles = n;
        }
        if let Some(n) = cli.max_pages {
            c.max_pages = n;
        }
        if let Some(secs) = cli.timeout_secs {
            c.request_timeout_secs = secs;
        }
    }
}
