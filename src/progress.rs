//! Progress-callback trait for per-document and per-page events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`]. The library
//! itself only logs through `tracing`; anything a user should see on the
//! console goes through this trait, so the host decides how to show it.
//!
//! # Example
//!
//! ```rust
//! use pdf2png::{ConversionConfig, ConversionProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     saved: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_saved(&self, page_num: usize, total_pages: usize, path: &Path) {
//!         self.saved.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{page_num}/{total_pages} -> {}", path.display());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { saved: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::DocumentError;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline and the batch driver as work progresses.
///
/// All methods default to no-ops so implementors override only what they
/// need. Events arrive strictly in order from a single thread, but the
/// trait is `Send + Sync` so a callback can be shared with other threads of
/// the host application.
pub trait ConversionProgressCallback: Send + Sync {
    /// A document passed validation and is about to be rendered.
    ///
    /// # Arguments
    /// * `pdf_path`   — the input document
    /// * `output_dir` — where its page images will be written
    fn on_document_start(&self, pdf_path: &Path, output_dir: &Path) {
        let _ = (pdf_path, output_dir);
    }

    /// pdfium finished rasterising the document.
    fn on_pages_rendered(&self, page_count: usize) {
        let _ = page_count;
    }

    /// One page image was written.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in the document
    /// * `path`        — the written PNG
    fn on_page_saved(&self, page_num: usize, total_pages: usize, path: &Path) {
        let _ = (page_num, total_pages, path);
    }

    /// Every page of the document was written.
    fn on_document_complete(&self, page_count: usize, output_dir: &Path) {
        let _ = (page_count, output_dir);
    }

    /// The document failed; the batch continues with the next one.
    fn on_document_error(&self, pdf_path: &Path, error: &DocumentError) {
        let _ = (pdf_path, error);
    }

    /// A batch entry was not found and is skipped.
    fn on_document_skipped(&self, name: &str) {
        let _ = name;
    }

    /// The batch driver finished one entry, whatever its outcome.
    fn on_document_finished(&self) {}
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        saved: AtomicUsize,
        skipped: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_page_saved(&self, _page_num: usize, _total_pages: usize, _path: &Path) {
            self.saved.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_skipped(&self, _name: &str) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_finished(&self) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_document_start(Path::new("a.pdf"), Path::new("a_pages"));
        cb.on_pages_rendered(2);
        cb.on_page_saved(1, 2, Path::new("a_pages/page_001.png"));
        cb.on_document_complete(2, Path::new("a_pages"));
        cb.on_document_skipped("b.pdf");
        cb.on_document_error(
            Path::new("c.pdf"),
            &DocumentError::MissingInput { path: "c.pdf".into() },
        );
        cb.on_document_finished();
    }

    #[test]
    fn overridden_methods_receive_events() {
        let cb = TrackingCallback::default();
        cb.on_page_saved(1, 2, Path::new("p1.png"));
        cb.on_page_saved(2, 2, Path::new("p2.png"));
        cb.on_document_finished();
        cb.on_document_skipped("gone.pdf");
        cb.on_document_finished();

        assert_eq!(cb.saved.load(Ordering::SeqCst), 2);
        assert_eq!(cb.skipped.load(Ordering::SeqCst), 1);
        assert_eq!(cb.finished.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_pages_rendered(10);
    }
}
