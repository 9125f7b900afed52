//! Extracted document text.
//!
//! A [`DocumentText`] is produced once by a [`crate::pipeline::extract::PageExtractor`]
//! and is read-only for the rest of the run.


/// Placeholder used as the title page when a document has no pages.
pub const NO_TITLE_PAGE: &str = "No Title";

/// One page of extracted plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number.
    pub number: usize,
    /// Raw text exactly as the extractor returned it.
    pub text: String,
}

/// The text views the roadmap builder works from.
///
/// The first page is treated as the title page; the body is every following
/// page joined with a blank line. A one-page document therefore has an empty
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    pages: Vec<Page>,
    title_page: String,
    body: String,
    body_chars: usize,
}

impl DocumentText {
    /// Build the title-page / body views from ordered page texts.
    pub fn from_pages<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages: Vec<Page> = texts
            .into_iter()
            .enumerate()
            .map(|(idx, text)| Page {
                number: idx + 1,
                text: text.into(),
            })
            .collect();

        let title_page = pages
            .first()
            .map(|p| p.text.clone())
            .unwrap_or_else(|| NO_TITLE_PAGE.to_string());

        let body = pages
            .iter()
            .skip(1)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let body_chars = body.chars().count();

        Self {
            pages,
            title_page,
            body,
            body_chars,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn title_page(&self) -> &str {
        &self.title_page
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body length in characters, as used by the structure planner.
    pub fn body_chars(&self) -> usize {
        self.body_chars
    }
}
