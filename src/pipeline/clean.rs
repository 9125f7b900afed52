//! Deterministic cleanup of oracle-generated text.
//!
//! Even with careful instructions, chat models decorate short answers:
//! `Title: Graph Search`, `Subtopic #2 - Heuristics`, or a numbered list
//! where a plain array was wanted. Each rule here is a pure `&str → String`
//! function so it can be tested in isolation.
//!
//! | Input                                 | Rule                    | Output                     |
//! |---------------------------------------|-------------------------|----------------------------|
//! | `"Title: Graph Search"`               | [`strip_label`]         | `"Graph Search"`           |
//! | `"Subtopic #2 - Heuristics"`          | [`strip_subtopic_prefix`] | `"Heuristics"`           |
//! | `"1. Learn X\n2. Learn Y"`            | [`split_checkpoints`]   | `["Learn X", "Learn Y"]`   |

use once_cell::sync::Lazy;
use regex::Regex;

// ── Rule 1: Leading "label: " ────────────────────────────────────────────────

static RE_LEADING_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^:]+:\s+").unwrap());

/// Remove one leading `label: ` run (non-colon characters, a colon, whitespace).
///
/// Only the first label is removed: `"A: B: C"` becomes `"B: C"`. Text whose
/// remainder does not itself start with a label is a fixed point, so applying
/// the rule twice is the same as applying it once. Times like `"10:30"` are
/// untouched because the colon must be followed by whitespace.
pub fn strip_label(input: &str) -> String {
    RE_LEADING_LABEL.replace(input, "").into_owned()
}

/// Trim, then strip a leading label. Applied to every oracle response.
pub fn clean_response(raw: &str) -> String {
    strip_label(raw.trim())
}

// ── Rule 2: "Subtopic #N - " artefacts ───────────────────────────────────────

/// Literal prefix the model echoes back from the subtopic instruction.
pub const SUBTOPIC_ARTIFACT_PREFIX: &str = "Subtopic #";

static RE_SUBTOPIC_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Subtopic #\d+\s*-\s*").unwrap());

/// Whether a generated subtopic title starts with the `Subtopic #` artefact.
pub fn has_subtopic_artifact(title: &str) -> bool {
    title.starts_with(SUBTOPIC_ARTIFACT_PREFIX)
}

/// Remove a leading `Subtopic #<digits> - ` if present.
pub fn strip_subtopic_prefix(title: &str) -> String {
    RE_SUBTOPIC_PREFIX.replace(title, "").into_owned()
}

// ── Rule 3: Numbered objectives → checkpoints ───────────────────────────────

static RE_ENUMERATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\s+").unwrap());

/// Split free-text objectives on `<digits>. ` markers into trimmed, non-empty pieces.
///
/// Text without numbering yields a single checkpoint equal to the trimmed input.
/// Whitespace-only input yields no checkpoints.
pub fn split_checkpoints(text: &str) -> Vec<String> {
    RE_ENUMERATION
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_label() {
        assert_eq!(strip_label("Title: Graph Search"), "Graph Search");
        assert_eq!(strip_label("Main topic #1:\nHeuristics"), "Heuristics");
        assert_eq!(strip_label("Graph Search"), "Graph Search");
    }

    #[test]
    fn test_strip_label_removes_only_one() {
        assert_eq!(strip_label("A: B: C"), "B: C");
    }

    #[test]
    fn test_strip_label_idempotent_without_nested_label() {
        for input in ["Title: Graph Search", "Plain text", "Summary: costs 10:30 each", ""] {
            let once = strip_label(input);
            assert_eq!(strip_label(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_strip_label_keeps_clock_times() {
        assert_eq!(strip_label("10:30 lecture"), "10:30 lecture");
    }

    #[test]
    fn test_clean_response_trims_first() {
        assert_eq!(clean_response("  \n Title: Search Algorithms \n"), "Search Algorithms");
        assert_eq!(clean_response("   "), "");
    }

    #[test]
    fn test_subtopic_prefix() {
        assert!(has_subtopic_artifact("Subtopic #2 - Heuristics"));
        assert!(!has_subtopic_artifact("Heuristics"));
        assert_eq!(strip_subtopic_prefix("Subtopic #2 - Heuristics"), "Heuristics");
        assert_eq!(strip_subtopic_prefix("Subtopic #12-Heuristics"), "Heuristics");
        assert_eq!(strip_subtopic_prefix("Heuristics"), "Heuristics");
    }

    #[test]
    fn test_subtopic_prefix_without_number_is_kept() {
        assert_eq!(strip_subtopic_prefix("Subtopic #: Loops"), "Subtopic #: Loops");
    }

    #[test]
    fn test_split_numbered_objectives() {
        assert_eq!(
            split_checkpoints("1. Learn X\n2. Learn Y"),
            vec!["Learn X", "Learn Y"]
        );
        assert_eq!(
            split_checkpoints("1. Define A*.  2. Compare with BFS. 3. Prove admissibility."),
            vec!["Define A*.", "Compare with BFS.", "Prove admissibility."]
        );
    }

    #[test]
    fn test_split_unnumbered_objectives() {
        assert_eq!(
            split_checkpoints("  Understand how gradient descent converges.  "),
            vec!["Understand how gradient descent converges."]
        );
    }

    #[test]
    fn test_split_keeps_decimal_numbers() {
        assert_eq!(
            split_checkpoints("1. Use Python 3.10 features"),
            vec!["Use Python 3.10 features"]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(split_checkpoints("").is_empty());
        assert!(split_checkpoints(" \n ").is_empty());
    }
}
