//! The text-generation oracle and its LLM-backed implementation.
//!
//! The roadmap builder only ever sees the [`Oracle`] trait: one prompt in,
//! one piece of text out, bounded by a token budget. [`LlmOracle`] is the
//! production implementation on top of an `edgequake_llm` provider; tests
//! substitute a scripted oracle.
//!
//! ## Retry Strategy
//!
//! Retries live here, in the transport, and never in the builder. Transient
//! 429 / 5xx errors are retried with exponential backoff
//! (`retry_backoff_ms * 2^attempt`). Once the attempts are exhausted the
//! error is returned and the run fails.

use crate::config::RoadmapConfig;
use crate::error::RoadmapError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Raw oracle output plus token accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl Completion {
    /// A completion with no token accounting, for oracles that don't report it.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// A text-generation service: `complete(prompt, max_tokens) -> text`.
///
/// Implementations must fail rather than return a completion when the
/// service produced no content at all. Whitespace-only content is a valid
/// (if useless) answer.
pub trait Oracle: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
        max_tokens: usize,
    ) -> impl Future<Output = Result<Completion, RoadmapError>> + Send;
}

/// Attempt count, backoff and per-attempt timeout for one oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RoadmapConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_ms: config.retry_backoff_ms,
            timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }
}

/// [`Oracle`] backed by a long-lived `edgequake_llm` provider.
pub struct LlmOracle {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    policy: RetryPolicy,
}

impl LlmOracle {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &RoadmapConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            policy: RetryPolicy::from_config(config),
        }
    }

    fn options(&self, max_tokens: usize) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(max_tokens),
            ..Default::default()
        }
    }
}

impl Oracle for LlmOracle {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<Completion, RoadmapError> {
        let messages = vec![ChatMessage::user(prompt)];
        let options = self.options(max_tokens);

        call_with_retry(self.policy, max_tokens, || {
            let call = self.provider.chat(&messages, Some(&options));
            async move {
                call.await.map(|response| Completion {
                    content: response.content,
                    prompt_tokens: response.prompt_tokens,
                    completion_tokens: response.completion_tokens,
                })
            }
        })
        .await
    }
}

/// Drive `call` under `policy`.
///
/// Each attempt is bounded by the policy timeout. A completion with no
/// content at all counts as a failed attempt. When every attempt has failed,
/// transport errors come back as [`RoadmapError::OracleFailed`] carrying the
/// total attempt count; a final timeout or empty response is returned as is.
pub async fn call_with_retry<F, Fut, E>(
    policy: RetryPolicy,
    max_tokens: usize,
    mut call: F,
) -> Result<Completion, RoadmapError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Completion, E>>,
    E: fmt::Display,
{
    let start = Instant::now();
    let mut last_err: Option<RoadmapError> = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let backoff = backoff_ms(policy.backoff_ms, attempt);
            warn!(
                "oracle retry {}/{} after {}ms",
                attempt, policy.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        let outcome = match timeout(policy.timeout, call()).await {
            Err(_) => Err(RoadmapError::OracleTimeout {
                secs: policy.timeout.as_secs(),
            }),
            Ok(Err(e)) => Err(RoadmapError::OracleFailed {
                attempts: attempt + 1,
                message: e.to_string(),
            }),
            Ok(Ok(completion)) if completion.content.is_empty() => {
                Err(RoadmapError::EmptyOracleResponse { max_tokens })
            }
            Ok(Ok(completion)) => Ok(completion),
        };

        match outcome {
            Ok(completion) => {
                debug!(
                    "oracle: {} input tokens, {} output tokens, {:?}",
                    completion.prompt_tokens,
                    completion.completion_tokens,
                    start.elapsed()
                );
                return Ok(completion);
            }
            Err(e) => {
                warn!("oracle attempt {} failed: {}", attempt + 1, e);
                last_err = Some(e);
            }
        }
    }

    let attempts = policy.max_retries + 1;
    Err(match last_err {
        Some(RoadmapError::OracleFailed { message, .. }) => {
            RoadmapError::OracleFailed { attempts, message }
        }
        Some(other) => other,
        None => RoadmapError::OracleFailed {
            attempts,
            message: "Unknown error".to_string(),
        },
    })
}

/// Delay before retry number `attempt` (1-indexed).
fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}
