//! Roadmap generation entry points.
//!
//! [`generate`] is the full pipeline from a path or URL. The lower-level
//! [`generate_from_text`] takes already-extracted text and any [`Oracle`],
//! which is how tests and callers with their own LLM client drive the
//! builder.

use crate::config::RoadmapConfig;
use crate::document::DocumentText;
use crate::error::RoadmapError;
use crate::output::{RoadmapDocument, RoadmapOutput, RoadmapStats};
use crate::pipeline::builder::RoadmapBuilder;
use crate::pipeline::extract::{extract_document, PageExtractor, PdfiumExtractor};
use crate::pipeline::input;
use crate::pipeline::oracle::{LlmOracle, Oracle};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::ffi::OsString;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info};

/// Generate a roadmap for a PDF file or URL.
///
/// Text is extracted with pdfium and the oracle is the LLM provider resolved
/// from `config`.
///
/// # Errors
/// Any extraction or oracle failure aborts the run; no partial roadmap is
/// returned.
pub async fn generate(
    source: impl AsRef<str>,
    config: &RoadmapConfig,
) -> Result<RoadmapOutput, RoadmapError> {
    let extractor = PdfiumExtractor::new().with_password(config.password.clone());
    generate_with_extractor(source, Arc::new(extractor), config).await
}

/// Like [`generate`], with a caller-supplied text extractor.
pub async fn generate_with_extractor(
    source: impl AsRef<str>,
    extractor: Arc<dyn PageExtractor>,
    config: &RoadmapConfig,
) -> Result<RoadmapOutput, RoadmapError> {
    let total_start = Instant::now();
    let source = source.as_ref();
    info!("Starting roadmap generation: {}", source);

    // ── Step 1: Oracle ───────────────────────────────────────────────────
    // No network call here, so a missing key fails before the PDF is read.
    let provider = resolve_provider(config)?;
    let oracle = LlmOracle::new(provider, config);

    // ── Step 2: Resolve and extract ──────────────────────────────────────
    let extract_start = Instant::now();
    let resolved = input::resolve_source(source, config.download_timeout_secs).await?;
    let doc = extract_document(extractor, resolved.path()).await?;
    let extraction_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 3: Build ────────────────────────────────────────────────────
    let mut output = generate_from_text(&doc, oracle, config).await?;
    output.stats.extraction_duration_ms = extraction_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Roadmap complete: {} sections, {} subtopics, {}ms total",
        output.stats.accepted_sections, output.stats.accepted_subtopics, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Build a roadmap from extracted text with any oracle.
///
/// Timing fields cover generation only; `extraction_duration_ms` is zero.
pub async fn generate_from_text<O: Oracle>(
    doc: &DocumentText,
    oracle: O,
    config: &RoadmapConfig,
) -> Result<RoadmapOutput, RoadmapError> {
    let start = Instant::now();
    let progress: ProgressCallback = config
        .progress_callback
        .clone()
        .unwrap_or_else(|| Arc::new(NoopProgressCallback));
    progress.on_document_extracted(doc.page_count(), doc.body_chars());

    let (roadmap, report) = RoadmapBuilder::new(oracle, config.budgets)
        .with_progress(progress)
        .build(doc)
        .await?;

    let generation_duration_ms = start.elapsed().as_millis() as u64;
    let stats = RoadmapStats {
        page_count: doc.page_count(),
        body_chars: doc.body_chars(),
        plan: report.plan,
        accepted_sections: roadmap.sections.len(),
        discarded_sections: report.discarded_sections,
        accepted_subtopics: roadmap.subtopic_count(),
        discarded_subtopics: report.discarded_subtopics,
        oracle_calls: report.usage.calls,
        total_input_tokens: report.usage.input_tokens,
        total_output_tokens: report.usage.output_tokens,
        extraction_duration_ms: 0,
        generation_duration_ms,
        total_duration_ms: generation_duration_ms,
    };

    Ok(RoadmapOutput { roadmap, stats })
}

/// Generate a roadmap and write it to `output_path` as JSON.
pub async fn generate_to_file(
    source: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &RoadmapConfig,
) -> Result<RoadmapStats, RoadmapError> {
    let output = generate(source, config).await?;
    write_roadmap(output_path, &output.roadmap).await?;
    Ok(output.stats)
}

/// Write a roadmap as four-space-indented JSON.
///
/// Uses atomic write (temp file + rename) so a reader never sees a partial file.
pub async fn write_roadmap(
    output_path: impl AsRef<Path>,
    roadmap: &RoadmapDocument,
) -> Result<(), RoadmapError> {
    let path = output_path.as_ref();
    let write_failed = |source: std::io::Error| RoadmapError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let json = roadmap.to_json_pretty()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;

    debug!("Wrote roadmap to {}", path.display());
    Ok(())
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    source: impl AsRef<str>,
    config: &RoadmapConfig,
) -> Result<RoadmapOutput, RoadmapError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RoadmapError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(source, config))
}

// ── Provider resolution ──────────────────────────────────────────────────

/// Environment variable holding the API key for a named provider.
pub fn credential_env_var(provider_name: &str) -> String {
    match provider_name.to_ascii_lowercase().as_str() {
        "openai" => "OPENAI_API_KEY".to_string(),
        "anthropic" => "ANTHROPIC_API_KEY".to_string(),
        "gemini" | "google" => "GEMINI_API_KEY".to_string(),
        "mistral" => "MISTRAL_API_KEY".to_string(),
        other => format!("{}_API_KEY", other.to_ascii_uppercase().replace('-', "_")),
    }
}

/// Serialises the credential overrides made by this crate.
static ENV_OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

/// Sets an environment variable for as long as the guard lives, then puts
/// the previous value (or its absence) back.
///
/// `ProviderFactory` only reads API keys from the environment, so an explicit
/// credential has to pass through it. The override is held only while the
/// provider is constructed; the provider keeps its own copy of the key.
struct EnvOverride<'a> {
    name: String,
    previous: Option<OsString>,
    _lock: MutexGuard<'a, ()>,
}

impl EnvOverride<'static> {
    fn set(name: String, value: &str) -> Self {
        let lock = ENV_OVERRIDE_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = std::env::var_os(&name);
        std::env::set_var(&name, value);
        Self {
            name,
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvOverride<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => std::env::set_var(&self.name, value),
            None => std::env::remove_var(&self.name),
        }
    }
}

fn create_provider(
    provider_name: &str,
    model: &str,
    credential: Option<&str>,
) -> Result<Arc<dyn LLMProvider>, RoadmapError> {
    let _override = credential.map(|key| EnvOverride::set(credential_env_var(provider_name), key));
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        RoadmapError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model` and the
///    optional `config.oracle_credential`.
/// 3. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`.
/// 4. **OpenAI** when a credential is configured or `OPENAI_API_KEY` is set.
/// 5. **Full auto-detection** via `ProviderFactory::from_env`.
pub fn resolve_provider(config: &RoadmapConfig) -> Result<Arc<dyn LLMProvider>, RoadmapError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let model = config.model_or_default();
    let credential = config.oracle_credential.as_deref();

    if let Some(ref name) = config.provider_name {
        return create_provider(name, model, credential);
    }

    if let (Ok(prov), Ok(env_model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !env_model.is_empty() {
            return create_provider(&prov, &env_model, credential);
        }
    }

    let has_openai_key = std::env::var("OPENAI_API_KEY").map_or(false, |k| !k.is_empty());
    if credential.is_some() || has_openai_key {
        return create_provider("openai", model, credential);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| RoadmapError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, pass --api-key, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Section;

    #[test]
    fn credential_env_vars() {
        assert_eq!(credential_env_var("openai"), "OPENAI_API_KEY");
        assert_eq!(credential_env_var("Anthropic"), "ANTHROPIC_API_KEY");
        assert_eq!(credential_env_var("azure-openai"), "AZURE_OPENAI_API_KEY");
    }

    #[test]
    fn env_override_restores_previous_value() {
        let name = "PDF_ROADMAP_TEST_OVERRIDE_KEY";
        std::env::set_var(name, "original");
        {
            let _guard = EnvOverride::set(name.to_string(), "temporary");
            assert_eq!(std::env::var(name).unwrap(), "temporary");
        }
        assert_eq!(std::env::var(name).unwrap(), "original");
        std::env::remove_var(name);
    }

    #[test]
    fn explicit_credential_does_not_leak_into_environment() {
        // Whatever the factory does with an unknown provider, the key must be gone.
        let var = credential_env_var("roadmap-test");
        assert_eq!(var, "ROADMAP_TEST_API_KEY");
        std::env::remove_var(&var);

        let config = RoadmapConfig::builder()
            .provider_name("roadmap-test")
            .oracle_credential("sk-run-a")
            .build()
            .unwrap();
        let _ = resolve_provider(&config);

        assert!(std::env::var_os(&var).is_none());
    }

    #[tokio::test]
    async fn provider_is_resolved_before_extraction() {
        use std::io::Write;
        use std::sync::atomic::{AtomicBool, Ordering};

        struct RecordingExtractor(AtomicBool);

        impl PageExtractor for RecordingExtractor {
            fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, RoadmapError> {
                self.0.store(true, Ordering::SeqCst);
                Ok(vec!["Cover".into()])
            }

            fn backend_name(&self) -> &str {
                "recording"
            }
        }

        let mut pdf = tempfile::NamedTempFile::new().unwrap();
        pdf.write_all(b"%PDF-1.7\n").unwrap();
        let extractor = Arc::new(RecordingExtractor(AtomicBool::new(false)));
        let config = RoadmapConfig::builder()
            .provider_name("roadmap-test")
            .build()
            .unwrap();

        let err = generate_with_extractor(
            pdf.path().to_string_lossy(),
            Arc::clone(&extractor) as Arc<dyn PageExtractor>,
            &config,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RoadmapError::ProviderNotConfigured { .. }), "got {err:?}");
        assert!(!extractor.0.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn write_roadmap_creates_parent_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/result.json");
        let doc = RoadmapDocument::new(
            "Search",
            "About search.",
            vec![Section {
                title: "BFS".into(),
                description: "Breadth first.".into(),
                subtopics: vec![],
            }],
        );

        write_roadmap(&path, &doc).await.unwrap();

        let back: RoadmapDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, doc);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
