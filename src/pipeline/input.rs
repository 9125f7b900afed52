//! Input resolution: turn the user's source argument into a local PDF path.
//!
//! Local paths are checked up front (existence, read permission, `%PDF`
//! magic) so the user gets a precise [`RoadmapError`] instead of an opaque
//! pdfium failure. HTTP/HTTPS sources are downloaded into a [`TempDir`] that
//! is removed when the [`SourceDocument`] is dropped.

use crate::error::RoadmapError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Where the document to summarise lives for the duration of a run.
#[derive(Debug)]
pub enum SourceDocument {
    /// Source was already a local file.
    Local(PathBuf),
    /// Source was a URL; the PDF sits in a temp directory kept alive by `_temp_dir`.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl SourceDocument {
    pub fn path(&self) -> &Path {
        match self {
            SourceDocument::Local(p) => p,
            SourceDocument::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the source string looks like a URL.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Resolve a path or URL to a readable local PDF.
pub async fn resolve_source(source: &str, timeout_secs: u64) -> Result<SourceDocument, RoadmapError> {
    if is_url(source) {
        download(source, timeout_secs).await
    } else {
        resolve_local(Path::new(source)).map(SourceDocument::Local)
    }
}

fn resolve_local(path: &Path) -> Result<PathBuf, RoadmapError> {
    let path = path.to_path_buf();
    if !path.exists() {
        return Err(RoadmapError::FileNotFound { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(RoadmapError::PermissionDenied { path });
        }
        Err(_) => return Err(RoadmapError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() {
        check_magic(&path, magic)?;
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

fn check_magic(path: &Path, magic: [u8; 4]) -> Result<(), RoadmapError> {
    if &magic != PDF_MAGIC {
        return Err(RoadmapError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

async fn download(url: &str, timeout_secs: u64) -> Result<SourceDocument, RoadmapError> {
    info!("Downloading PDF from: {}", url);
    let failed = |reason: String| RoadmapError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            RoadmapError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let temp_dir = TempDir::new().map_err(|e| RoadmapError::Internal(e.to_string()))?;
    let path = temp_dir.path().join(file_name_from_url(url));

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    if bytes.len() >= 4 {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        check_magic(&path, magic)?;
    }

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| RoadmapError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to {}", bytes.len(), path.display());
    Ok(SourceDocument::Downloaded {
        path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL if it looks like a file name, else `downloaded.pdf`.
fn file_name_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty() && last.contains('.'))
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/lecture.pdf"));
        assert!(is_url("http://example.com/lecture.pdf"));
        assert!(!is_url("./pdfs/Lecture4_AI.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url("https://x.org/a/Lecture4_AI.pdf"), "Lecture4_AI.pdf");
        assert_eq!(file_name_from_url("https://arxiv.org/pdf/1706"), "downloaded.pdf");
        assert_eq!(file_name_from_url("https://x.org/"), "downloaded.pdf");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = resolve_source("/definitely/not/here.pdf", 5).await.unwrap_err();
        assert!(matches!(err, RoadmapError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn non_pdf_is_rejected() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"PK\x03\x04 not a pdf").unwrap();
        let err = resolve_source(tmp.path().to_str().unwrap(), 5).await.unwrap_err();
        match err {
            RoadmapError::NotAPdf { magic, .. } => assert_eq!(&magic, b"PK\x03\x04"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pdf_magic_is_accepted() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n...").unwrap();
        let resolved = resolve_source(tmp.path().to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.path(), tmp.path());
    }
}
