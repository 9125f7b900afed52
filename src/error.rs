//! Error types for the pdf-roadmap library.
//!
//! Every failure in a roadmap run is fatal: the builder never produces a
//! partial document, so there is a single error type, [`RoadmapError`].
//!
//! Variants are grouped by the stage that raised them. Callers that only care
//! about the stage (for exit codes or retry decisions) can use
//! [`RoadmapError::category`] instead of matching every variant.
//!
//! Empty generations from the oracle are *not* errors. An empty section or
//! subtopic title is a control-flow branch handled inside the builder and
//! reported through [`crate::output::RoadmapStats`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-roadmap library.
#[derive(Debug, Error)]
pub enum RoadmapError {
    // ── Input / extraction errors ─────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document opened but contains no pages.
    #[error("PDF '{path}' has no pages; nothing to summarise")]
    EmptyDocument { path: PathBuf },

    /// pdfium could not produce the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium for your platform, or set PDFIUM_LIB_PATH=/path/to/libpdfium."
    )]
    PdfiumBindingFailed(String),

    // ── Oracle errors ─────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The oracle call failed after the transport exhausted its retries.
    #[error("LLM call failed after {attempts} attempt(s): {message}")]
    OracleFailed { attempts: u32, message: String },

    /// The oracle answered but the response carried no content at all.
    #[error("LLM returned an empty response (max_tokens={max_tokens})")]
    EmptyOracleResponse { max_tokens: usize },

    /// A single oracle call exceeded the per-call timeout.
    #[error("LLM call timed out after {secs}s")]
    OracleTimeout { secs: u64 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The roadmap could not be serialised.
    #[error("Failed to serialise roadmap: {0}")]
    Serialize(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The document could not be opened or read; no oracle call was made.
    Extraction,
    /// The summarisation oracle failed.
    Oracle,
    /// The roadmap was built but could not be written.
    Output,
    /// Configuration was rejected before the run started.
    Config,
    /// Bug or runtime failure outside the pipeline stages.
    Internal,
}

impl RoadmapError {
    /// Classify the error by pipeline stage.
    pub fn category(&self) -> ErrorCategory {
        use RoadmapError::*;
        match self {
            FileNotFound { .. }
            | PermissionDenied { .. }
            | DownloadFailed { .. }
            | DownloadTimeout { .. }
            | NotAPdf { .. }
            | CorruptPdf { .. }
            | PasswordRequired { .. }
            | WrongPassword { .. }
            | EmptyDocument { .. }
            | TextExtractionFailed { .. }
            | PdfiumBindingFailed(_) => ErrorCategory::Extraction,
            ProviderNotConfigured { .. }
            | OracleFailed { .. }
            | EmptyOracleResponse { .. }
            | OracleTimeout { .. } => ErrorCategory::Oracle,
            OutputWriteFailed { .. } | Serialize(_) => ErrorCategory::Output,
            InvalidConfig(_) => ErrorCategory::Config,
            Internal(_) => ErrorCategory::Internal,
        }
    }
}
