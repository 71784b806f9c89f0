//! Result types for single-document and batch conversions.

use crate::error::{DocumentError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A document whose every page was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Directory holding the page images.
    pub output_dir: PathBuf,
    /// Written files, `page_001.png` first.
    pub pages: Vec<PathBuf>,
}

impl ConversionOutput {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Terminal state of one batch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Every page was written.
    Written,
    /// The input file did not exist.
    Skipped,
    /// Nothing was written (input, output dir or render failure).
    Failed,
    /// Some pages were written before a write failed.
    PartiallyWritten,
}

/// Outcome of one batch entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// The name as listed in the batch.
    pub name: String,
    /// `name` resolved against the batch base directory.
    pub input: PathBuf,
    pub status: DocumentStatus,
    pub output_dir: Option<PathBuf>,
    /// Page image files on disk for this document.
    pub pages_written: usize,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
}

impl DocumentReport {
    pub fn skipped(name: impl Into<String>, input: PathBuf) -> Self {
        Self {
            name: name.into(),
            input,
            status: DocumentStatus::Skipped,
            output_dir: None,
            pages_written: 0,
            error_kind: None,
            error: None,
        }
    }

    pub fn written(name: impl Into<String>, input: PathBuf, output: &ConversionOutput) -> Self {
        Self {
            name: name.into(),
            input,
            status: DocumentStatus::Written,
            output_dir: Some(output.output_dir.clone()),
            pages_written: output.page_count(),
            error_kind: None,
            error: None,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        input: PathBuf,
        output_dir: Option<PathBuf>,
        error: &DocumentError,
    ) -> Self {
        let status = match error {
            DocumentError::MissingInput { .. } => DocumentStatus::Skipped,
            DocumentError::WriteFailed { written, .. } if *written > 0 => {
                DocumentStatus::PartiallyWritten
            }
            _ => DocumentStatus::Failed,
        };
        Self {
            name: name.into(),
            input,
            status,
            output_dir,
            pages_written: error.pages_written(),
            error_kind: Some(error.kind()),
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    fn count(&self, status: DocumentStatus) -> usize {
        self.documents.iter().filter(|d| d.status == status).count()
    }

    pub fn written(&self) -> usize {
        self.count(DocumentStatus::Written)
    }

    pub fn skipped(&self) -> usize {
        self.count(DocumentStatus::Skipped)
    }

    /// Documents that failed outright or were only partially written.
    pub fn failed(&self) -> usize {
        self.count(DocumentStatus::Failed) + self.count(DocumentStatus::PartiallyWritten)
    }

    pub fn total_pages_written(&self) -> usize {
        self.documents.iter().map(|d| d.pages_written).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_error(written: usize) -> DocumentError {
        DocumentError::WriteFailed {
            path: "out/page_002.png".into(),
            page: written + 1,
            written,
            source: std::io::Error::other("boom"),
        }
    }

    #[test]
    fn write_failure_after_some_pages_is_partial() {
        let r = DocumentReport::failed(
            "a.pdf",
            "a.pdf".into(),
            Some("a_pages".into()),
            &write_error(1),
        );
        assert_eq!(r.status, DocumentStatus::PartiallyWritten);
        assert_eq!(r.pages_written, 1);
        assert_eq!(r.error_kind, Some(ErrorKind::Write));
    }

    #[test]
    fn write_failure_on_first_page_is_a_failure() {
        let r = DocumentReport::failed("a.pdf", "a.pdf".into(), None, &write_error(0));
        assert_eq!(r.status, DocumentStatus::Failed);
        assert_eq!(r.pages_written, 0);
    }

    #[test]
    fn batch_totals() {
        let output = ConversionOutput {
            output_dir: "a_pages".into(),
            pages: vec!["a_pages/page_001.png".into(), "a_pages/page_002.png".into()],
        };
        let report = BatchReport {
            documents: vec![
                DocumentReport::written("a.pdf", "a.pdf".into(), &output),
                DocumentReport::skipped("b.pdf", "b.pdf".into()),
                DocumentReport::failed("c.pdf", "c.pdf".into(), None, &write_error(3)),
            ],
        };
        assert_eq!(report.written(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total_pages_written(), 5);
    }

    #[test]
    fn report_serialises_with_snake_case_status() {
        let r = DocumentReport::skipped("gone.pdf", "base/gone.pdf".into());
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains(r#""status":"skipped""#), "got: {json}");
    }
}
