//! Progress-callback trait for per-section generation events.
//!
//! Inject an [`Arc<dyn NotesProgressCallback>`] via
//! [`crate::config::NotesConfigBuilder::progress_callback`] to receive events
//! as the aggregator works through the requested output kinds.
//!
//! # Example
//!
//! ```rust
//! use lecture2notes::{NotesConfig, NotesProgressCallback, OutputKind};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl NotesProgressCallback for CountingCallback {
//!     fn on_section_complete(&self, kind: OutputKind, _index: usize, total: usize, text_len: usize) {
//!         let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{kind}: {done}/{total} ({text_len} bytes)");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//! let config = NotesConfig::builder()
//!     .progress_callback(cb as Arc<dyn NotesProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::config::OutputKind;
use std::sync::Arc;

/// Called by the aggregator as it processes each requested section.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` the section
/// methods may be called from several tasks at once. All methods default to
/// no-ops.
pub trait NotesProgressCallback: Send + Sync {
    /// Called once before any backend call.
    fn on_run_start(&self, total_sections: usize) {
        let _ = total_sections;
    }

    /// Called just before the backend request for a section is sent.
    ///
    /// `index` is the 1-based position in canonical order.
    fn on_section_start(&self, kind: OutputKind, index: usize, total_sections: usize) {
        let _ = (kind, index, total_sections);
    }

    /// Called when a section was generated.
    fn on_section_complete(
        &self,
        kind: OutputKind,
        index: usize,
        total_sections: usize,
        text_len: usize,
    ) {
        let _ = (kind, index, total_sections, text_len);
    }

    /// Called when a section failed; its error text is still aggregated.
    fn on_section_error(&self, kind: OutputKind, index: usize, total_sections: usize, error: &str) {
        let _ = (kind, index, total_sections, error);
    }

    /// Called once after every section has been attempted.
    fn on_run_complete(&self, total_sections: usize, success_count: usize) {
        let _ = (total_sections, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl NotesProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::NotesConfig`].
pub type ProgressCallback = Arc<dyn NotesProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: Mutex<Vec<OutputKind>>,
        completes: AtomicUsize,
        errors: AtomicUsize,
        success_total: AtomicUsize,
    }

    impl NotesProgressCallback for TrackingCallback {
        fn on_run_start(&self, total_sections: usize) {
            self.started_total.store(total_sections, Ordering::SeqCst);
        }

        fn on_section_start(&self, kind: OutputKind, _index: usize, _total: usize) {
            self.starts.lock().unwrap().push(kind);
        }

        fn on_section_complete(&self, _kind: OutputKind, _index: usize, _total: usize, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_section_error(&self, _kind: OutputKind, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _total_sections: usize, success_count: usize) {
            self.success_total.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(3);
        cb.on_section_start(OutputKind::ExamNotes, 1, 3);
        cb.on_section_complete(OutputKind::ExamNotes, 1, 3, 42);
        cb.on_section_error(OutputKind::Mcqs, 2, 3, "boom");
        cb.on_run_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_run_start(2);
        tracker.on_section_start(OutputKind::ExamNotes, 1, 2);
        tracker.on_section_complete(OutputKind::ExamNotes, 1, 2, 100);
        tracker.on_section_start(OutputKind::Revision, 2, 2);
        tracker.on_section_error(OutputKind::Revision, 2, 2, "timeout");
        tracker.on_run_complete(2, 1);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(
            *tracker.starts.lock().unwrap(),
            vec![OutputKind::ExamNotes, OutputKind::Revision]
        );
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.success_total.load(Ordering::SeqCst), 1);
    }
}
