//! Roadmap document types and run statistics.
//!
//! [`RoadmapDocument`] is the sole persisted artifact. Its serde field names
//! are the JSON wire format, so renaming a field is a breaking change for
//! every consumer of `result.json`.

use crate::pipeline::plan::StructurePlan;
use serde::{Deserialize, Serialize};

/// Title written when the oracle produced no document title.
pub const FALLBACK_TITLE: &str = "Document Title Not Found";

/// The hierarchical outline produced from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapDocument {
    pub title: String,
    pub overall_summary: String,
    pub sections: Vec<Section>,
}

impl RoadmapDocument {
    /// Assemble a roadmap, substituting [`FALLBACK_TITLE`] for an empty title.
    pub fn new(title: impl Into<String>, overall_summary: impl Into<String>, sections: Vec<Section>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            title
        };
        Self {
            title,
            overall_summary: overall_summary.into(),
            sections,
        }
    }

    /// Total number of subtopics across all sections.
    pub fn subtopic_count(&self) -> usize {
        self.sections.iter().map(|s| s.subtopics.len()).sum()
    }

    /// Serialise as UTF-8 JSON indented with four spaces.
    ///
    /// Non-ASCII text is written verbatim rather than `\u` escaped.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::with_capacity(4096);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// A top-level topic of the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique among the sections of one roadmap.
    pub title: String,
    /// One sentence.
    pub description: String,
    pub subtopics: Vec<Subtopic>,
}

/// A learning unit inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    /// Non-empty and unique within the parent section.
    pub title: String,
    /// Exactly one descriptive sentence.
    pub details: Vec<String>,
    /// Discrete learning objectives, usually one to three.
    pub checkpoints: Vec<String>,
    /// `"S"` or `"S-E"`, 1-indexed.
    pub page_range: String,
}

/// Result of a full run: the roadmap plus how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapOutput {
    pub roadmap: RoadmapDocument,
    pub stats: RoadmapStats,
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadmapStats {
    pub page_count: usize,
    pub body_chars: usize,
    pub plan: StructurePlan,
    pub accepted_sections: usize,
    pub discarded_sections: usize,
    pub accepted_subtopics: usize,
    pub discarded_subtopics: usize,
    pub oracle_calls: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub extraction_duration_ms: u64,
    pub generation_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RoadmapDocument {
        RoadmapDocument::new(
            "Lecture 4: Search",
            "Covers uninformed and informed search.",
            vec![Section {
                title: "Uninformed Search".into(),
                description: "Search without heuristics.".into(),
                subtopics: vec![Subtopic {
                    title: "Breadth-First Search".into(),
                    details: vec!["Expands the shallowest node first.".into()],
                    checkpoints: vec!["Trace BFS on a small graph".into()],
                    page_range: "2-3".into(),
                }],
            }],
        )
    }

    #[test]
    fn empty_title_falls_back() {
        let doc = RoadmapDocument::new("", "summary", vec![]);
        assert_eq!(doc.title, FALLBACK_TITLE);
        let doc = RoadmapDocument::new("  \n", "summary", vec![]);
        assert_eq!(doc.title, FALLBACK_TITLE);
    }

    #[test]
    fn json_uses_wire_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json_pretty().unwrap()).unwrap();
        assert!(json.get("overall_summary").is_some());
        let sub = &json["sections"][0]["subtopics"][0];
        assert_eq!(sub["page_range"], "2-3");
        assert_eq!(sub["details"][0], "Expands the shallowest node first.");
    }

    #[test]
    fn json_is_four_space_indented_and_keeps_unicode() {
        let doc = RoadmapDocument::new("인공지능 개론", "요약", vec![]);
        let json = doc.to_json_pretty().unwrap();
        assert!(json.contains("\n    \"title\": \"인공지능 개론\""), "got: {json}");
    }

    #[test]
    fn subtopic_count_sums_sections() {
        assert_eq!(sample().subtopic_count(), 1);
    }
}
