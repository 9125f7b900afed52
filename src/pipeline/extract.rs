//! Text extraction: PDF file → ordered per-page plain text.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is synchronous and
//! CPU-bound. [`extract_document`] runs the extractor on tokio's blocking
//! pool so a large document does not stall the async workers.

use crate::document::DocumentText;
use crate::error::RoadmapError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Environment variable naming an explicit libpdfium to bind to.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// A backend that turns a document into per-page text.
pub trait PageExtractor: Send + Sync {
    /// Extract text from every page, in order. Index 0 is page 1.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, RoadmapError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Extract `path` on the blocking pool and build its [`DocumentText`].
///
/// A document with zero pages is an error: there is nothing to summarise and
/// no oracle call should be made.
pub async fn extract_document(
    extractor: Arc<dyn PageExtractor>,
    path: &Path,
) -> Result<DocumentText, RoadmapError> {
    let owned: PathBuf = path.to_path_buf();
    let backend = extractor.backend_name().to_string();

    let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&owned))
        .await
        .map_err(|e| RoadmapError::Internal(format!("Extraction task panicked: {}", e)))??;

    if pages.is_empty() {
        return Err(RoadmapError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }

    let doc = DocumentText::from_pages(pages);
    info!(
        "Extracted {} pages ({} body chars) with {}",
        doc.page_count(),
        doc.body_chars(),
        backend
    );
    Ok(doc)
}

/// [`PageExtractor`] using pdfium's text layer.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    password: Option<String>,
    library_path: Option<PathBuf>,
}

impl PdfiumExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Bind to this libpdfium instead of `PDFIUM_LIB_PATH` / the system library.
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    fn bind(&self) -> Result<Pdfium, RoadmapError> {
        let explicit = self.library_path.clone().or_else(|| {
            std::env::var(PDFIUM_LIB_PATH_ENV)
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
        });

        let bindings = match explicit {
            Some(lib) => {
                debug!("Binding pdfium from {}", lib.display());
                Pdfium::bind_to_library(lib.to_string_lossy().into_owned())
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| RoadmapError::PdfiumBindingFailed(format!("{:?}", e)))?;

        Ok(Pdfium::new(bindings))
    }
}

impl PageExtractor for PdfiumExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, RoadmapError> {
        let pdfium = self.bind()?;
        let password = self.password.as_deref();

        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    RoadmapError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    RoadmapError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                RoadmapError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        let mut texts = Vec::new();
        for (idx, page) in document.pages().iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| RoadmapError::TextExtractionFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?
                .all();
            debug!("Page {}: {} chars", idx + 1, text.chars().count());
            texts.push(text);
        }

        Ok(texts)
    }

    fn backend_name(&self) -> &str {
        "pdfium"
    }
}
