//! Configuration types for roadmap generation.
//!
//! All run behaviour is controlled through [`RoadmapConfig`], built via its
//! [`RoadmapConfigBuilder`]. The oracle credential lives here too, so nothing
//! in the pipeline reads process-wide state on its own; the only environment
//! lookups happen during provider resolution in [`crate::generate`].

use crate::error::RoadmapError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Default model used when neither the config nor the environment names one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for a roadmap run.
///
/// Built via [`RoadmapConfig::builder()`] or using [`RoadmapConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_roadmap::RoadmapConfig;
///
/// let config = RoadmapConfig::builder()
///     .model("gpt-4.1-mini")
///     .temperature(0.3)
///     .max_retries(1)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_retries, 1);
/// ```
#[derive(Clone)]
pub struct RoadmapConfig {
    /// LLM model identifier, e.g. "gpt-3.5-turbo". If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// API key for the oracle. When set it overrides the provider's key variable
    /// (`OPENAI_API_KEY` for openai, `ANTHROPIC_API_KEY` for anthropic, …).
    pub oracle_credential: Option<String>,

    /// Sampling temperature for every oracle call. Default: 0.5.
    pub temperature: f32,

    /// Output-length budget for each kind of oracle request.
    pub budgets: LengthBudgets,

    /// Transport-level retries for a failed oracle call. Default: 2.
    ///
    /// The roadmap builder itself never retries; once the transport gives up
    /// the run fails.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled after each attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-oracle-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives builder events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            oracle_credential: None,
            temperature: 0.5,
            budgets: LengthBudgets::default(),
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
            download_timeout_secs: 120,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RoadmapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadmapConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("oracle_credential", &self.oracle_credential.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("budgets", &self.budgets)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl RoadmapConfig {
    /// Create a new builder for `RoadmapConfig`.
    pub fn builder() -> RoadmapConfigBuilder {
        RoadmapConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`RoadmapConfig`].
pub struct RoadmapConfigBuilder {
    config: RoadmapConfig,
}

impl fmt::Debug for RoadmapConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadmapConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl RoadmapConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn oracle_credential(mut self, key: impl Into<String>) -> Self {
        self.config.oracle_credential = Some(key.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn budgets(mut self, budgets: LengthBudgets) -> Self {
        self.config.budgets = budgets;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RoadmapConfig, RoadmapError> {
        let c = &self.config;
        if let Some(field) = c.budgets.first_zero() {
            return Err(RoadmapError::InvalidConfig(format!(
                "length budget '{field}' must be ≥ 1"
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(RoadmapError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if matches!(c.oracle_credential.as_deref(), Some(k) if k.trim().is_empty()) {
            return Err(RoadmapError::InvalidConfig(
                "oracle credential is set but empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Maximum output tokens for each kind of oracle request.
///
/// Short budgets keep titles terse; the objectives budget is larger because
/// it must fit up to three numbered sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBudgets {
    pub document_title: usize,
    pub overall_summary: usize,
    pub section_title: usize,
    pub section_description: usize,
    pub subtopic_title: usize,
    pub subtopic_details: usize,
    pub objectives: usize,
}

impl Default for LengthBudgets {
    fn default() -> Self {
        Self {
            document_title: 20,
            overall_summary: 50,
            section_title: 20,
            section_description: 30,
            subtopic_title: 20,
            subtopic_details: 30,
            objectives: 100,
        }
    }
}

impl LengthBudgets {
    fn first_zero(&self) -> Option<&'static str> {
        [
            ("document_title", self.document_title),
            ("overall_summary", self.overall_summary),
            ("section_title", self.section_title),
            ("section_description", self.section_description),
            ("subtopic_title", self.subtopic_title),
            ("subtopic_details", self.subtopic_details),
            ("objectives", self.objectives),
        ]
        .into_iter()
        .find(|(_, v)| *v == 0)
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = RoadmapConfig::default();
        assert_eq!(c.temperature, 0.5);
        assert_eq!(c.max_retries, 2);
        assert_eq!(c.model_or_default(), DEFAULT_MODEL);
        assert_eq!(c.budgets.document_title, 20);
        assert_eq!(c.budgets.overall_summary, 50);
        assert_eq!(c.budgets.objectives, 100);
    }

    #[test]
    fn temperature_is_clamped() {
        let c = RoadmapConfig::builder().temperature(7.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let budgets = LengthBudgets {
            objectives: 0,
            ..LengthBudgets::default()
        };
        let err = RoadmapConfig::builder().budgets(budgets).build().unwrap_err();
        assert!(err.to_string().contains("objectives"), "got: {err}");
    }

    #[test]
    fn blank_credential_is_rejected() {
        let err = RoadmapConfig::builder()
            .oracle_credential("   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, RoadmapError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_credential() {
        let c = RoadmapConfig::builder()
            .oracle_credential("sk-secret")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
