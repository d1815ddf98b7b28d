//! LLM API interaction with exponential backoff retry logic.
//!
//! This module provides the interface the research agent uses to talk to an
//! OpenAI-compatible LLM API through `awful_aj`. Endpoint, model and key come
//! from the `awful_aj` `config.yaml`; the system instruction for each kind of
//! call comes from a chat template.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`AskFnWrapper`]: Binds `awful_aj::api::ask` to one template
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//!
//! # Retry Strategy
//!
//! - Exponential backoff from a configurable base delay
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//!
//! Retries apply to LLM calls only. The article collector never retries.

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors of this trait can send text to an LLM and receive a response.
/// This abstraction allows for different LLM backends or decorators (like retry logic).
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Retries a failing [`AskAsync`] call with exponential backoff.
///
/// Attempt `n` (1-based) that fails waits
/// `min(base_delay * 2^(n-1), 30s)` plus 0-250ms of jitter before the next
/// try. After `max_retries` retries the last error is returned.
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// ```ignore
    /// let client = AskFnWrapper { config: &config, template: &template };
    /// let retrying = RetryAsk::new(client, 5, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Wait before retrying after failed attempt `attempt`, jitter excluded.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let factor = u32::try_from(attempt.saturating_sub(1))
            .ok()
            .and_then(|shift| 1u32.checked_shl(shift))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all, fields(max_retries = self.max_retries))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let started = Instant::now();
        let mut attempt = 1usize;

        loop {
            let err = match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };

            if attempt > self.max_retries {
                error!(
                    attempts = attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "LLM call failed after all retries"
                );
                return Err(err);
            }

            let jitter = StdDuration::from_millis(rng().random_range(0..=250));
            let delay = self.backoff(attempt) + jitter;
            warn!(attempt, ?delay, error = %err, "LLM call failed; retrying");
            sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Binds `awful_aj::api::ask` to a single chat template.
///
/// The template supplies the system instruction, the caller supplies the
/// user message.
#[derive(Debug)]
pub struct AskFnWrapper<'a> {
    /// LLM configuration (API keys, endpoints, model settings).
    pub config: &'a AwfulJadeConfig,
    /// Chat template defining the conversation structure.
    pub template: &'a ChatTemplate,
}

impl AskAsync for AskFnWrapper<'_> {
    type Response = String;

    #[instrument(level = "debug", skip_all, fields(prompt_bytes = text.len()))]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let started = Instant::now();
        ask(self.config, text.to_string(), self.template, None, None)
            .await
            .inspect_err(|e| {
                warn!(elapsed_ms = started.elapsed().as_millis() as u64, error = %e, "awful_aj request failed");
            })
    }
}
