//! Roadmap construction: the plan-driven loop over sections and subtopics.
//!
//! ```text
//! document title ─▶ overall summary ─▶ for each planned section:
//!                                         title ─▶ decide ─┬─ Discard ─▶ next section
//!                                                           └─ Accept
//!                                                               description
//!                                                               for each planned subtopic:
//!                                                                 title ─▶ clean ─▶ decide
//!                                                                 details, page range, checkpoints
//! ```
//!
//! The loop is a single linear pass. Oracle calls are awaited one at a time
//! and no decision is ever revisited: a discarded section is not re-requested,
//! so a roadmap can end up with fewer sections than planned.

use crate::config::LengthBudgets;
use crate::document::DocumentText;
use crate::error::RoadmapError;
use crate::output::{RoadmapDocument, Section, Subtopic};
use crate::pipeline::clean::{has_subtopic_artifact, split_checkpoints, strip_subtopic_prefix};
use crate::pipeline::locate::locate;
use crate::pipeline::oracle::Oracle;
use crate::pipeline::plan::StructurePlan;
use crate::pipeline::summarize::{OracleUsage, Summarizer};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use crate::prompts;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a generated title was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    EmptyTitle,
    DuplicateTitle,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::EmptyTitle => f.write_str("empty title"),
            DiscardReason::DuplicateTitle => f.write_str("duplicate title"),
        }
    }
}

/// Outcome of checking a generated title against its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleDecision {
    Accept(String),
    Discard(DiscardReason),
}

/// Accept a title unless it is empty or already taken.
pub fn decide_title<'a, I>(candidate: String, taken: I) -> TitleDecision
where
    I: IntoIterator<Item = &'a str>,
{
    if candidate.is_empty() {
        TitleDecision::Discard(DiscardReason::EmptyTitle)
    } else if taken.into_iter().any(|t| t == candidate) {
        TitleDecision::Discard(DiscardReason::DuplicateTitle)
    } else {
        TitleDecision::Accept(candidate)
    }
}

/// Remove the `Subtopic #N - ` artefact from a generated subtopic title.
///
/// The prefix is only stripped when the title carries the artefact or
/// collides with a sibling; otherwise the title is returned as generated.
/// A collision is not re-requested.
pub fn clean_subtopic_title(raw: String, siblings: &[Subtopic]) -> String {
    let collides = siblings.iter().any(|s| s.title == raw);
    if has_subtopic_artifact(&raw) || collides {
        strip_subtopic_prefix(&raw)
    } else {
        raw
    }
}

/// What the builder did, besides producing the roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub plan: StructurePlan,
    pub discarded_sections: usize,
    pub discarded_subtopics: usize,
    pub usage: OracleUsage,
}

/// Drives the oracle through one document.
pub struct RoadmapBuilder<O> {
    summarizer: Summarizer<O>,
    budgets: LengthBudgets,
    progress: ProgressCallback,
    discarded_sections: usize,
    discarded_subtopics: usize,
}

impl<O: Oracle> RoadmapBuilder<O> {
    pub fn new(oracle: O, budgets: LengthBudgets) -> Self {
        Self {
            summarizer: Summarizer::new(oracle),
            budgets,
            progress: Arc::new(NoopProgressCallback),
            discarded_sections: 0,
            discarded_subtopics: 0,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Build the roadmap for `doc`.
    ///
    /// Fails only if the oracle fails; nothing partial is returned.
    pub async fn build(mut self, doc: &DocumentText) -> Result<(RoadmapDocument, BuildReport), RoadmapError> {
        let plan = StructurePlan::for_document(doc.page_count(), doc.body_chars());
        info!(
            "Plan: {} sections × {} subtopics ({} pages, {} body chars)",
            plan.sections,
            plan.subtopics_per_section,
            doc.page_count(),
            doc.body_chars()
        );
        self.progress.on_plan(plan);

        let title = self
            .summarizer
            .summarize(doc.title_page(), prompts::DOCUMENT_TITLE, self.budgets.document_title)
            .await?;
        let overall_summary = self
            .summarizer
            .summarize(doc.body(), prompts::OVERALL_SUMMARY, self.budgets.overall_summary)
            .await?;

        let mut sections: Vec<Section> = Vec::with_capacity(plan.sections);
        for ordinal in 1..=plan.sections {
            self.progress.on_section_start(ordinal, plan.sections);

            let candidate = self
                .summarizer
                .summarize(doc.body(), &prompts::section_title(ordinal), self.budgets.section_title)
                .await?;

            let section_title = match decide_title(candidate, sections.iter().map(|s| s.title.as_str())) {
                TitleDecision::Accept(t) => t,
                TitleDecision::Discard(reason) => {
                    warn!("Section {}/{} discarded: {}", ordinal, plan.sections, reason);
                    self.discarded_sections += 1;
                    self.progress
                        .on_section_discarded(ordinal, plan.sections, reason.to_string());
                    continue;
                }
            };

            let section = self.build_section(doc, section_title, plan).await?;
            debug!(
                "Section {}/{} accepted: {:?} with {} subtopics",
                ordinal,
                plan.sections,
                section.title,
                section.subtopics.len()
            );
            self.progress.on_section_accepted(
                ordinal,
                plan.sections,
                section.title.clone(),
                section.subtopics.len(),
            );
            sections.push(section);
        }

        info!(
            "Roadmap assembled: {}/{} sections, {} oracle calls",
            sections.len(),
            plan.sections,
            self.summarizer.usage().calls
        );
        self.progress.on_complete(sections.len(), plan.sections);

        let report = BuildReport {
            plan,
            discarded_sections: self.discarded_sections,
            discarded_subtopics: self.discarded_subtopics,
            usage: self.summarizer.usage(),
        };
        Ok((RoadmapDocument::new(title, overall_summary, sections), report))
    }

    async fn build_section(
        &mut self,
        doc: &DocumentText,
        title: String,
        plan: StructurePlan,
    ) -> Result<Section, RoadmapError> {
        let description = self
            .summarizer
            .summarize(
                doc.body(),
                &prompts::section_description(&title),
                self.budgets.section_description,
            )
            .await?;

        let mut subtopics: Vec<Subtopic> = Vec::with_capacity(plan.subtopics_per_section);
        for ordinal in 1..=plan.subtopics_per_section {
            let raw = self
                .summarizer
                .summarize(
                    doc.body(),
                    &prompts::subtopic_title(ordinal, &title),
                    self.budgets.subtopic_title,
                )
                .await?;
            let cleaned = clean_subtopic_title(raw, &subtopics);

            match decide_title(cleaned, subtopics.iter().map(|s| s.title.as_str())) {
                TitleDecision::Accept(sub_title) => {
                    let subtopic = self.build_subtopic(doc, sub_title).await?;
                    subtopics.push(subtopic);
                }
                TitleDecision::Discard(reason) => {
                    warn!("Subtopic {} of {:?} discarded: {}", ordinal, title, reason);
                    self.discarded_subtopics += 1;
                    self.progress
                        .on_subtopic_discarded(title.clone(), ordinal, reason.to_string());
                }
            }
        }

        Ok(Section {
            title,
            description,
            subtopics,
        })
    }

    async fn build_subtopic(&mut self, doc: &DocumentText, title: String) -> Result<Subtopic, RoadmapError> {
        let details = self
            .summarizer
            .summarize(
                doc.body(),
                &prompts::subtopic_details(&title),
                self.budgets.subtopic_details,
            )
            .await?;

        let page_range = locate(&title, doc.pages());

        let objectives = self
            .summarizer
            .summarize(
                doc.body(),
                &prompts::learning_objectives(&title),
                self.budgets.objectives,
            )
            .await?;
        let checkpoints = split_checkpoints(&objectives);

        Ok(Subtopic {
            title,
            details: vec![details],
            checkpoints,
            page_range: page_range.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(title: &str) -> Subtopic {
        Subtopic {
            title: title.into(),
            details: vec![],
            checkpoints: vec![],
            page_range: "1".into(),
        }
    }

    #[test]
    fn decide_accepts_new_title() {
        assert_eq!(
            decide_title("Search".into(), ["Planning"]),
            TitleDecision::Accept("Search".into())
        );
    }

    #[test]
    fn decide_discards_empty_and_duplicate() {
        assert_eq!(
            decide_title(String::new(), Vec::<&str>::new()),
            TitleDecision::Discard(DiscardReason::EmptyTitle)
        );
        assert_eq!(
            decide_title("Search".into(), ["Search"]),
            TitleDecision::Discard(DiscardReason::DuplicateTitle)
        );
    }

    #[test]
    fn clean_strips_artifact_prefix() {
        assert_eq!(clean_subtopic_title("Subtopic #1 - Heuristics".into(), &[]), "Heuristics");
    }

    #[test]
    fn clean_leaves_plain_unique_title() {
        assert_eq!(clean_subtopic_title("Heuristics".into(), &[sub("Costs")]), "Heuristics");
    }

    #[test]
    fn clean_on_collision_does_not_invent_new_title() {
        // Collision without an artefact prefix: nothing to strip, still a duplicate.
        let siblings = [sub("Heuristics")];
        let cleaned = clean_subtopic_title("Heuristics".into(), &siblings);
        assert_eq!(cleaned, "Heuristics");
        assert_eq!(
            decide_title(cleaned, siblings.iter().map(|s| s.title.as_str())),
            TitleDecision::Discard(DiscardReason::DuplicateTitle)
        );
    }

    #[test]
    fn discard_reason_display() {
        assert_eq!(DiscardReason::EmptyTitle.to_string(), "empty title");
        assert_eq!(DiscardReason::DuplicateTitle.to_string(), "duplicate title");
    }
}
