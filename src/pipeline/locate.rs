//! Page-range estimation for generated subtopic titles.
//!
//! The title is searched for verbatim (case-sensitive, no whitespace
//! normalisation) in every page's raw text. The range spans the first to the
//! last matching page, ignoring gaps in between. Titles are paraphrased by
//! the model often enough that "not found" is common, so a miss degrades to
//! page 1 instead of failing.

use crate::document::Page;
use std::fmt;

/// An inclusive, 1-indexed page span with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    /// A range covering a single page.
    pub fn single(page: usize) -> Self {
        Self { start: page, end: page }
    }

    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Find the pages whose text contains `needle`.
///
/// Returns page 1 when nothing matches (or when there are no pages).
pub fn locate(needle: &str, pages: &[Page]) -> PageRange {
    let mut matching = pages
        .iter()
        .filter(|page| page.text.contains(needle))
        .map(|page| page.number);

    match matching.next() {
        Some(first) => {
            let last = matching.last().unwrap_or(first);
            PageRange::new(first, last)
        }
        None => PageRange::single(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentText;

    fn pages(texts: &[&str]) -> Vec<Page> {
        DocumentText::from_pages(texts.iter().copied()).pages().to_vec()
    }

    #[test]
    fn display_single_and_span() {
        assert_eq!(PageRange::single(4).to_string(), "4");
        assert_eq!(PageRange::new(2, 5).to_string(), "2-5");
        assert_eq!(PageRange::new(5, 2).to_string(), "2-5");
    }

    #[test]
    fn first_to_last_match_ignoring_gaps() {
        let p = pages(&["cover", "A* search intro", "unrelated", "more on A* search", "end"]);
        let r = locate("A* search", &p);
        assert_eq!((r.start(), r.end()), (2, 4));
        assert_eq!(r.to_string(), "2-4");
    }

    #[test]
    fn single_match() {
        let p = pages(&["cover", "Gradient Descent", "other"]);
        assert_eq!(locate("Gradient Descent", &p).to_string(), "2");
    }

    #[test]
    fn match_is_case_sensitive() {
        let p = pages(&["cover", "gradient descent"]);
        assert_eq!(locate("Gradient Descent", &p), PageRange::single(1));
    }

    #[test]
    fn no_match_defaults_to_page_one() {
        let p = pages(&["cover", "body"]);
        assert_eq!(locate("Backpropagation", &p).to_string(), "1");
    }

    #[test]
    fn no_pages_defaults_to_page_one() {
        assert_eq!(locate("anything", &[]).to_string(), "1");
    }
}
