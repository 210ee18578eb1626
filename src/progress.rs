//! Progress-callback trait for per-page capture events.
//!
//! Inject an [`Arc<dyn CaptureProgressCallback>`] via
//! [`crate::config::CaptureConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline works through the page range.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a log file, or a
//! notification service without the library knowing anything about how the
//! host application communicates. The trait is `Send + Sync` so the config
//! holding it stays shareable across threads.

use crate::output::PageOutcome;
use std::sync::Arc;

/// Called by the capture pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The page loop is sequential, so implementations
/// will not see concurrent calls, but `Send + Sync` is still required for
/// the config to remain shareable.
pub trait CaptureProgressCallback: Send + Sync {
    /// Called once before the first page is requested.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages the run will request
    fn on_capture_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the HTTP request for a page is sent.
    fn on_page_start(&self, page: u32) {
        let _ = page;
    }

    /// Called after a page has been resolved one way or another.
    fn on_page_done(&self, page: u32, outcome: &PageOutcome) {
        let _ = (page, outcome);
    }

    /// Called once after the page loop, before PDF assembly.
    ///
    /// # Arguments
    /// * `saved` — pages that will make it into the document
    /// * `total` — pages requested
    fn on_capture_complete(&self, saved: usize, total: usize) {
        let _ = (saved, total);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CaptureProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::CaptureConfig`].
pub type ProgressCallback = Arc<dyn CaptureProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        done: AtomicUsize,
        saved_total: AtomicUsize,
    }

    impl CaptureProgressCallback for TrackingCallback {
        fn on_page_start(&self, _page: u32) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_done(&self, _page: u32, _outcome: &PageOutcome) {
            self.done.fetch_add(1, Ordering::SeqCst);
        }

        fn on_capture_complete(&self, saved: usize, _total: usize) {
            self.saved_total.store(saved, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_capture_start(70);
        cb.on_page_start(100);
        cb.on_page_done(100, &PageOutcome::SkippedBlank);
        cb.on_capture_complete(0, 70);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            starts: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
            saved_total: AtomicUsize::new(0),
        };

        cb.on_capture_start(3);
        cb.on_page_start(100);
        cb.on_page_done(100, &PageOutcome::SkippedBlank);
        cb.on_page_start(101);
        cb.on_page_done(101, &PageOutcome::FetchFailed { status: 404 });
        cb.on_page_start(102);
        cb.on_page_done(
            102,
            &PageOutcome::Saved {
                path: "images/teletext_102.png".into(),
            },
        );
        cb.on_capture_complete(1, 3);

        assert_eq!(cb.starts.load(Ordering::SeqCst), 3);
        assert_eq!(cb.done.load(Ordering::SeqCst), 3);
        assert_eq!(cb.saved_total.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn CaptureProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_capture_start(10);
        cb.on_page_start(100);
    }
}
