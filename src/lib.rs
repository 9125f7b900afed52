//! # pdf-roadmap
//!
//! Turn a PDF document into a hierarchical JSON learning roadmap: a title, an
//! overall summary, and sections broken into subtopics with a description,
//! learning checkpoints, and the source pages they came from.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Extract  per-page text via pdfium (spawn_blocking)
//!  ├─ 3. Plan     1×1, 3×2 or 5×3 sections × subtopics from document size
//!  ├─ 4. Build    sequential LLM calls: titles, descriptions, objectives
//!  │              with duplicate/empty title discards and page-range lookup
//!  └─ 5. Output   RoadmapDocument (JSON) + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_roadmap::{generate_to_file, RoadmapConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = RoadmapConfig::default();
//!     let stats = generate_to_file("lecture.pdf", "result.json", &config).await?;
//!     eprintln!("{} sections, {} oracle calls", stats.accepted_sections, stats.oracle_calls);
//!     Ok(())
//! }
//! ```
//!
//! ## Bring your own oracle
//!
//! The builder only needs something that implements [`Oracle`]. Pair it with
//! [`DocumentText::from_pages`] and [`generate_from_text`] to run without
//! pdfium or network access.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2roadmap` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LengthBudgets, RoadmapConfig, RoadmapConfigBuilder, DEFAULT_MODEL};
pub use document::{DocumentText, Page};
pub use error::{ErrorCategory, RoadmapError};
pub use generate::{
    generate, generate_from_text, generate_sync, generate_to_file, generate_with_extractor,
    write_roadmap,
};
pub use output::{RoadmapDocument, RoadmapOutput, RoadmapStats, Section, Subtopic, FALLBACK_TITLE};
pub use pipeline::builder::{BuildReport, DiscardReason, RoadmapBuilder, TitleDecision};
pub use pipeline::extract::{PageExtractor, PdfiumExtractor};
pub use pipeline::locate::{locate, PageRange};
pub use pipeline::oracle::{Completion, LlmOracle, Oracle, RetryPolicy};
pub use pipeline::plan::StructurePlan;
pub use progress::{NoopProgressCallback, ProgressCallback, RoadmapProgressCallback};
