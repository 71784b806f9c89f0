//! Batch driver: run the conversion over an ordered list of documents.
//!
//! Every entry is attempted, in order. A missing file is skipped with a
//! warning, a failed conversion is recorded, and neither stops the batch.

use crate::config::ConversionConfig;
use crate::convert::convert;
use crate::output::{BatchReport, DocumentReport};
use crate::pipeline::input;
use crate::pipeline::render::PageRenderer;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Documents processed when no list is given.
pub const DEFAULT_DOCUMENTS: [&str; 4] = [
    "NBN Agent & Share Holder View.pdf",
    "NBN Merchant View.pdf",
    "NBN T3 Admin.pdf",
    "NBN System Admin.pdf",
];

/// Which documents to convert and where to find them.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory relative document names are resolved against.
    pub base_dir: PathBuf,
    /// Documents in processing order.
    pub documents: Vec<PathBuf>,
}

impl BatchConfig {
    /// The default document list resolved against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            documents: DEFAULT_DOCUMENTS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the document list.
    pub fn with_documents<I, P>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.documents = documents.into_iter().map(Into::into).collect();
        self
    }

    /// Absolute entries are kept as-is; relative ones join `base_dir`.
    pub fn resolve(&self, document: &Path) -> PathBuf {
        self.base_dir.join(document)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(program_dir())
    }
}

/// Directory containing the running executable, falling back to the
/// current directory.
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Convert every document of `batch`, in order, never stopping early.
pub fn run_batch(
    renderer: &dyn PageRenderer,
    batch: &BatchConfig,
    config: &ConversionConfig,
) -> BatchReport {
    let progress = config.progress_callback.as_deref();
    let mut report = BatchReport::default();

    info!(
        "Batch of {} documents from {}",
        batch.documents.len(),
        batch.base_dir.display()
    );

    for document in &batch.documents {
        let name = document.display().to_string();
        let pdf_path = batch.resolve(document);

        let entry = if pdf_path.exists() {
            match convert(renderer, &pdf_path, config) {
                Ok(output) => DocumentReport::written(&name, pdf_path, &output),
                Err(e) => {
                    warn!("{}: {}", name, e);
                    if let Some(cb) = progress {
                        cb.on_document_error(&pdf_path, &e);
                    }
                    let output_dir = input::output_dir_for(&pdf_path, config.output_dir.as_deref());
                    let output_dir = output_dir.is_dir().then_some(output_dir);
                    DocumentReport::failed(&name, pdf_path, output_dir, &e)
                }
            }
        } else {
            warn!("{} not found, skipping", pdf_path.display());
            if let Some(cb) = progress {
                cb.on_document_skipped(&name);
            }
            DocumentReport::skipped(&name, pdf_path)
        };

        if let Some(cb) = progress {
            cb.on_document_finished();
        }
        report.documents.push(entry);
    }

    info!(
        "Batch done: {} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    );
    report
}
