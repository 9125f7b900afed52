//! Structure planning: how many sections and subtopics to ask for.
//!
//! The plan is a fixed three-tier table keyed on page count and body length.
//! Rows are evaluated top to bottom and the first match wins, so a 4-page
//! document with 400 characters of body text is still "small".

use serde::{Deserialize, Serialize};

/// Target shape of a roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructurePlan {
    /// Number of section titles to request. Always ≥ 1.
    pub sections: usize,
    /// Number of subtopic titles to request per accepted section. Always ≥ 1.
    pub subtopics_per_section: usize,
}

impl StructurePlan {
    /// Pick the plan for a document.
    ///
    /// | Condition                                   | sections | subtopics |
    /// |---------------------------------------------|----------|-----------|
    /// | pages ≤ 2 or body < 1000 chars              | 1        | 1         |
    /// | pages in 3..=5 or body in 1000..3000 chars  | 3        | 2         |
    /// | otherwise                                   | 5        | 3         |
    pub fn for_document(page_count: usize, body_chars: usize) -> Self {
        let (sections, subtopics_per_section) = if page_count <= 2 || body_chars < 1000 {
            (1, 1)
        } else if (3..=5).contains(&page_count) || (1000..3000).contains(&body_chars) {
            (3, 2)
        } else {
            (5, 3)
        };
        Self {
            sections,
            subtopics_per_section,
        }
    }

    /// Oracle calls a run makes when every section and subtopic is accepted.
    ///
    /// Two document-level calls, then per section one title, one description
    /// and four calls per subtopic.
    pub fn max_oracle_calls(&self) -> usize {
        2 + self.sections + self.sections * (1 + self.subtopics_per_section * 4)
    }
}

impl Default for StructurePlan {
    fn default() -> Self {
        Self {
            sections: 1,
            subtopics_per_section: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(pages: usize, chars: usize) -> (usize, usize) {
        let p = StructurePlan::for_document(pages, chars);
        (p.sections, p.subtopics_per_section)
    }

    #[test]
    fn small_documents_get_one_by_one() {
        assert_eq!(shape(0, 0), (1, 1));
        assert_eq!(shape(1, 500), (1, 1));
        assert_eq!(shape(2, 50_000), (1, 1));
        assert_eq!(shape(40, 999), (1, 1));
    }

    #[test]
    fn medium_documents_get_three_by_two() {
        assert_eq!(shape(3, 1000), (3, 2));
        assert_eq!(shape(5, 90_000), (3, 2));
        assert_eq!(shape(12, 1000), (3, 2));
        assert_eq!(shape(12, 2999), (3, 2));
    }

    #[test]
    fn large_documents_get_five_by_three() {
        assert_eq!(shape(6, 3000), (5, 3));
        assert_eq!(shape(200, 400_000), (5, 3));
    }

    #[test]
    fn counts_stay_within_the_table() {
        for pages in 0..12 {
            for chars in [0, 999, 1000, 2999, 3000, 10_000] {
                let (s, t) = shape(pages, chars);
                assert!([1, 3, 5].contains(&s), "sections {s} for ({pages}, {chars})");
                assert!([1, 2, 3].contains(&t), "subtopics {t} for ({pages}, {chars})");
            }
        }
    }

    #[test]
    fn max_oracle_calls_formula() {
        assert_eq!(StructurePlan::for_document(1, 0).max_oracle_calls(), 2 + 1 + 5);
        assert_eq!(StructurePlan::for_document(4, 2000).max_oracle_calls(), 2 + 3 + 3 * 9);
        assert_eq!(StructurePlan::for_document(9, 9000).max_oracle_calls(), 2 + 5 + 5 * 13);
    }
}
