//! Progress-callback trait for roadmap construction events.
//!
//! Inject an [`Arc<dyn RoadmapProgressCallback>`] via
//! [`crate::config::RoadmapConfigBuilder::progress_callback`] to receive
//! events as the builder walks through sections. A full run makes dozens of
//! sequential LLM calls, so without feedback a terminal looks frozen for
//! minutes.
//!
//! # Example
//!
//! ```rust
//! use pdf_roadmap::{RoadmapConfig, RoadmapProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     accepted: AtomicUsize,
//! }
//!
//! impl RoadmapProgressCallback for CountingCallback {
//!     fn on_section_accepted(&self, ordinal: usize, planned: usize, title: String, _subtopics: usize) {
//!         self.accepted.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("section {ordinal}/{planned}: {title}");
//!     }
//! }
//!
//! let config = RoadmapConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { accepted: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::plan::StructurePlan;
use std::sync::Arc;

/// Called by the roadmap builder as it progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. String arguments are owned so implementations can
/// move them into channels or spawned tasks.
pub trait RoadmapProgressCallback: Send + Sync {
    /// Called once after the document text has been extracted.
    ///
    /// # Arguments
    /// * `page_count`: number of pages in the document
    /// * `body_chars`: character length of the body text (pages 2..N)
    fn on_document_extracted(&self, page_count: usize, body_chars: usize) {
        let _ = (page_count, body_chars);
    }

    /// Called once the structure plan is chosen, before any section title is requested.
    fn on_plan(&self, plan: StructurePlan) {
        let _ = plan;
    }

    /// Called before the title of section `ordinal` (1-indexed) is requested.
    fn on_section_start(&self, ordinal: usize, planned: usize) {
        let _ = (ordinal, planned);
    }

    /// Called when a section is kept and fully assembled.
    fn on_section_accepted(&self, ordinal: usize, planned: usize, title: String, subtopics: usize) {
        let _ = (ordinal, planned, title, subtopics);
    }

    /// Called when a section's generated title is empty or a duplicate.
    fn on_section_discarded(&self, ordinal: usize, planned: usize, reason: String) {
        let _ = (ordinal, planned, reason);
    }

    /// Called when a subtopic is dropped from its section.
    fn on_subtopic_discarded(&self, section: String, ordinal: usize, reason: String) {
        let _ = (section, ordinal, reason);
    }

    /// Called once after the roadmap is assembled.
    ///
    /// # Arguments
    /// * `accepted`: sections that made it into the roadmap
    /// * `planned`:  sections the plan asked for
    fn on_complete(&self, accepted: usize, planned: usize) {
        let _ = (accepted, planned);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl RoadmapProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RoadmapConfig`].
pub type ProgressCallback = Arc<dyn RoadmapProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        accepted: AtomicUsize,
        discarded: Mutex<Vec<String>>,
        final_count: AtomicUsize,
    }

    impl RoadmapProgressCallback for TrackingCallback {
        fn on_section_start(&self, _ordinal: usize, _planned: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_section_accepted(&self, _ordinal: usize, _planned: usize, _title: String, _n: usize) {
            self.accepted.fetch_add(1, Ordering::SeqCst);
        }

        fn on_section_discarded(&self, _ordinal: usize, _planned: usize, reason: String) {
            self.discarded.lock().unwrap().push(reason);
        }

        fn on_complete(&self, accepted: usize, _planned: usize) {
            self.final_count.store(accepted, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_document_extracted(4, 1200);
        cb.on_plan(StructurePlan::for_document(4, 1200));
        cb.on_section_start(1, 3);
        cb.on_section_accepted(1, 3, "Neural Networks".into(), 2);
        cb.on_section_discarded(2, 3, "duplicate title".into());
        cb.on_subtopic_discarded("Neural Networks".into(), 2, "empty title".into());
        cb.on_complete(1, 3);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_section_start(1, 3);
        tracker.on_section_accepted(1, 3, "Search".into(), 2);
        tracker.on_section_start(2, 3);
        tracker.on_section_discarded(2, 3, "duplicate title".into());
        tracker.on_section_start(3, 3);
        tracker.on_section_accepted(3, 3, "Planning".into(), 2);
        tracker.on_complete(2, 3);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.accepted.load(Ordering::SeqCst), 2);
        assert_eq!(*tracker.discarded.lock().unwrap(), vec!["duplicate title"]);
        assert_eq!(tracker.final_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_section_start(1, 5);
        cb.on_complete(5, 5);
    }
}
