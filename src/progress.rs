//! Progress-callback trait for batch, document and page events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the orchestrator works through a batch.
//!
//! # Why callbacks instead of channels?
//!
//! Callers can forward events to a channel, a log, or a terminal progress
//! bar without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` because the pages of a document
//! are recognised concurrently.
//!
//! # Example
//!
//! ```rust
//! use pdf2table::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct RowCounter {
//!     rows: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for RowCounter {
//!     fn on_page_complete(&self, document: &str, page_num: usize, rows: usize) {
//!         self.rows.fetch_add(rows, Ordering::SeqCst);
//!         eprintln!("{document} p{page_num}: {rows} rows");
//!     }
//! }
//!
//! let counter = Arc::new(RowCounter { rows: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the orchestrator as it processes a batch.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
///
/// # Thread safety
///
/// Batch and document events fire sequentially. `on_page_start`,
/// `on_page_complete` and `on_page_error` may be called concurrently for
/// pages of the same document; protect shared mutable state accordingly.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first document is opened.
    fn on_batch_start(&self, documents: usize) {
        let _ = documents;
    }

    /// Called after the page selection of a document has been resolved.
    ///
    /// # Arguments
    /// * `document`: document name as given to the batch
    /// * `total_pages`: pages in the document
    /// * `selected_pages`: pages that will be recognised (may be 0)
    fn on_document_start(&self, document: &str, total_pages: usize, selected_pages: usize) {
        let _ = (document, total_pages, selected_pages);
    }

    /// Called just before the recognition request for a page.
    fn on_page_start(&self, document: &str, page_num: usize) {
        let _ = (document, page_num);
    }

    /// Called when a page was recognised; `rows` may be 0.
    fn on_page_complete(&self, document: &str, page_num: usize, rows: usize) {
        let _ = (document, page_num, rows);
    }

    /// Called when a page failed without aborting the batch.
    fn on_page_error(&self, document: &str, page_num: usize, error: &str) {
        let _ = (document, page_num, error);
    }

    /// Called once per document that was opened, skipped documents included.
    ///
    /// # Arguments
    /// * `rows`: rows in the combined table handed to the sink
    fn on_document_complete(&self, document: &str, rows: usize) {
        let _ = (document, rows);
    }

    /// Called once after every document has been attempted.
    ///
    /// # Arguments
    /// * `extracted`: documents whose combined table was non-empty
    fn on_batch_complete(&self, documents: usize, extracted: usize) {
        let _ = (documents, extracted);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        page_starts: AtomicUsize,
        rows: AtomicUsize,
        errors: Mutex<Vec<String>>,
        documents: Mutex<Vec<String>>,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_document_start(&self, document: &str, _total: usize, _selected: usize) {
            self.documents.lock().unwrap().push(document.to_string());
        }

        fn on_page_start(&self, _document: &str, _page_num: usize) {
            self.page_starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _document: &str, _page_num: usize, rows: usize) {
            self.rows.fetch_add(rows, Ordering::SeqCst);
        }

        fn on_page_error(&self, document: &str, page_num: usize, error: &str) {
            self.errors
                .lock()
                .unwrap()
                .push(format!("{document}:{page_num}:{error}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_document_start("a.pdf", 5, 2);
        cb.on_page_start("a.pdf", 1);
        cb.on_page_complete("a.pdf", 1, 12);
        cb.on_page_error("a.pdf", 2, "some error");
        cb.on_document_complete("a.pdf", 12);
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_document_start("docA.pdf", 3, 2);
        tracker.on_page_start("docA.pdf", 1);
        tracker.on_page_complete("docA.pdf", 1, 4);
        tracker.on_page_start("docA.pdf", 2);
        tracker.on_page_error("docA.pdf", 2, "timeout");

        assert_eq!(tracker.page_starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.rows.load(Ordering::SeqCst), 4);
        assert_eq!(*tracker.errors.lock().unwrap(), vec!["docA.pdf:2:timeout"]);
        assert_eq!(*tracker.documents.lock().unwrap(), vec!["docA.pdf"]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_page_complete("x.pdf", 1, 3);
    }
}
