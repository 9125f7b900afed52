//! CLI binary for pdf-roadmap.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RoadmapConfig` and writes the roadmap JSON.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_roadmap::{
    generate, write_roadmap, ProgressCallback, RoadmapConfig, RoadmapProgressCallback,
    StructurePlan,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner while the PDF is read, then a bar over the
/// planned sections with one log line per accepted or discarded section.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RoadmapProgressCallback for CliProgressCallback {
    fn on_document_extracted(&self, page_count: usize, body_chars: usize) {
        self.bar.println(format!(
            "{} {}",
            green("◆"),
            bold(&format!("{page_count} pages, {body_chars} characters of body text"))
        ));
    }

    fn on_plan(&self, plan: StructurePlan) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos}/{len} sections  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(plan.sections as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Building");
        self.bar.set_message("title & summary");
        self.bar.println(format!(
            "{} plan: {} sections × {} subtopics",
            dim("·"),
            plan.sections,
            plan.subtopics_per_section
        ));
    }

    fn on_section_start(&self, ordinal: usize, _planned: usize) {
        self.bar.set_message(format!("section {ordinal}"));
    }

    fn on_section_accepted(&self, ordinal: usize, planned: usize, title: String, subtopics: usize) {
        self.bar.println(format!(
            "  {} Section {}/{}  {}  {}",
            green("✓"),
            ordinal,
            planned,
            title,
            dim(&format!("{subtopics} subtopics")),
        ));
        self.bar.inc(1);
    }

    fn on_section_discarded(&self, ordinal: usize, planned: usize, reason: String) {
        self.bar.println(format!(
            "  {} Section {}/{}  {}",
            yellow("↷"),
            ordinal,
            planned,
            yellow(&format!("skipped: {reason}")),
        ));
        self.bar.inc(1);
    }

    fn on_subtopic_discarded(&self, section: String, ordinal: usize, reason: String) {
        self.bar.println(format!(
            "      {} subtopic {} of '{}' skipped: {}",
            yellow("↷"),
            ordinal,
            section,
            reason
        ));
    }

    fn on_complete(&self, _accepted: usize, _planned: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Write result.json next to you
  pdf2roadmap ./pdfs/Lecture4_AI.pdf -o result.json

  # Print the roadmap to stdout
  pdf2roadmap lecture.pdf

  # Use a specific model / provider
  pdf2roadmap --provider openai --model gpt-4.1-mini lecture.pdf -o roadmap.json

  # From a URL, with run statistics on stderr
  pdf2roadmap https://example.org/notes.pdf -o notes.json --stats

OUTPUT SHAPE:
  { "title", "overall_summary",
    "sections": [ { "title", "description",
                    "subtopics": [ { "title", "details", "checkpoints", "page_range" } ] } ] }

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (default provider)
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium if it is not installed system-wide
"#;

/// Turn a PDF into a JSON learning roadmap using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2roadmap",
    version,
    about = "Turn a PDF into a JSON learning roadmap using an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    source: String,

    /// Write the roadmap JSON to this file instead of stdout.
    #[arg(short, long, env = "PDF2ROADMAP_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (default: gpt-3.5-turbo).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// API key for the LLM provider (overrides the provider's key variable).
    #[arg(long, env = "PDF2ROADMAP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDF2ROADMAP_TEMPERATURE", default_value_t = 0.5)]
    temperature: f32,

    /// Transport retries per LLM call.
    #[arg(long, env = "PDF2ROADMAP_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Per-call LLM timeout in seconds.
    #[arg(long, env = "PDF2ROADMAP_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2ROADMAP_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2ROADMAP_PASSWORD")]
    password: Option<String>,

    /// Print run statistics as JSON to stderr.
    #[arg(long)]
    stats: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2ROADMAP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2ROADMAP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2ROADMAP_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; --verbose always wins.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn RoadmapProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = generate(&cli.source, &config)
        .await
        .context("Roadmap generation failed")?;

    match cli.output {
        Some(ref path) => {
            write_roadmap(path, &output.roadmap)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} sections  {} subtopics  {}ms  →  {}",
                    green("✔"),
                    output.stats.accepted_sections,
                    output.stats.accepted_subtopics,
                    output.stats.total_duration_ms,
                    bold(&path.display().to_string()),
                );
            }
        }
        None => {
            let json = output
                .roadmap
                .to_json_pretty()
                .context("Failed to serialise roadmap")?;
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .context("Failed to write to stdout")?;
        }
    }

    if cli.stats {
        let stats =
            serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?;
        eprintln!("{stats}");
    } else if !cli.quiet {
        eprintln!(
            "   {} oracle calls  ·  {} tokens in  /  {} tokens out",
            dim(&output.stats.oracle_calls.to_string()),
            dim(&output.stats.total_input_tokens.to_string()),
            dim(&output.stats.total_output_tokens.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `RoadmapConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RoadmapConfig> {
    let mut builder = RoadmapConfig::builder()
        .temperature(cli.temperature)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.oracle_credential(key);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
