//! Pipeline stages for PDF-to-roadmap generation.
//!
//! Each submodule implements one step, so every step can be tested alone and
//! the external collaborators (pdfium, the LLM) sit behind traits.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ plan ──▶ builder ◀──▶ summarize ◀──▶ oracle
//! (path/URL) (pdfium)   (table)    │            (clean)       (LLM)
//!                                  └──▶ locate
//! ```
//!
//! 1. [`input`]:     canonicalise the path or URL to a local PDF
//! 2. [`extract`]:   per-page text via pdfium, on the blocking pool
//! 3. [`plan`]:      section / subtopic counts from document size
//! 4. [`builder`]:   the section × subtopic loop and its accept/discard decisions
//! 5. [`summarize`]: prompt formation and response cleaning around the oracle
//! 6. [`oracle`]:    the LLM call with transport retries
//! 7. [`locate`]:    page range of a generated title
//! 8. [`clean`]:     pure text rules (labels, prefixes, checkpoints)

pub mod builder;
pub mod clean;
pub mod extract;
pub mod input;
pub mod locate;
pub mod oracle;
pub mod plan;
pub mod summarize;
