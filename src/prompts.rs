//! Instructions sent to the oracle.
//!
//! Every instruction is prepended to the source text by
//! [`crate::pipeline::summarize::Summarizer`]. Keeping the wording here lets
//! tests assert on it and lets scripted oracles route on it.

/// Instruction for the document title; input is the title page.
pub const DOCUMENT_TITLE: &str =
    "Extract the title of this document, avoiding generic terms like 'Introduction' or 'Core Concepts'.";

/// Instruction for the overall summary; input is the body text.
pub const OVERALL_SUMMARY: &str =
    "Summarize the main purpose and key topics of this document without using terms like 'Overview' or 'Core Concepts'.";

/// Instruction for the title of main topic `ordinal` (1-indexed).
pub fn section_title(ordinal: usize) -> String {
    format!("Identify a concise title for main topic #{ordinal}, focusing on core concepts.")
}

/// Instruction for a one-sentence description of a section.
pub fn section_description(title: &str) -> String {
    format!("Summarize the topic '{title}' in one concise sentence. avoiding words like 'Overview' or 'Core'.")
}

/// Instruction for the title of subtopic `ordinal` under `section`.
pub fn subtopic_title(ordinal: usize, section: &str) -> String {
    format!("Provide a concise title for subtopic #{ordinal} under '{section}', avoiding generic terms.")
}

/// Instruction for the one-sentence detail of a subtopic.
pub fn subtopic_details(title: &str) -> String {
    format!("Describe '{title}' in one concise sentence.")
}

/// Instruction for one to three learning objectives of a subtopic.
pub fn learning_objectives(title: &str) -> String {
    format!("Summarize 1 to 3 core learning objectives for '{title}' in brief, clear statements.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_instructions_forbid_placeholders() {
        assert!(DOCUMENT_TITLE.contains("'Introduction'"));
        assert!(DOCUMENT_TITLE.contains("'Core Concepts'"));
        assert!(OVERALL_SUMMARY.contains("'Overview'"));
        assert!(OVERALL_SUMMARY.contains("'Core Concepts'"));
    }

    #[test]
    fn instructions_carry_ordinals_and_titles() {
        assert!(section_title(3).contains("main topic #3"));
        let sub = subtopic_title(2, "Graph Search");
        assert!(sub.contains("subtopic #2"));
        assert!(sub.contains("'Graph Search'"));
        assert!(learning_objectives("BFS").contains("'BFS'"));
    }
}
