//! Error types for the pdf2png library.
//!
//! Two error types reflect two failure scopes:
//!
//! * [`Pdf2PngError`] — **Fatal**: the run cannot start (no usable pdfium,
//!   invalid configuration). The CLI exits on these.
//!
//! * [`DocumentError`] — **Non-fatal**: one document could not be converted.
//!   The batch driver records it and moves on to the next document. Each
//!   pipeline step has its own variants so callers can tell a render failure
//!   from a write failure.

use pdfium_bootstrap::BootstrapError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop the whole run.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    /// The PDF rendering engine could not be located or bound.
    #[error("PDF rendering engine unavailable: {0}")]
    PdfiumUnavailable(#[from] BootstrapError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A failure confined to a single document.
#[derive(Debug, Error)]
pub enum DocumentError {
    // ── Path resolution ───────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: {}", .path.display())]
    MissingInput { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The output directory could not be created.
    #[error("Cannot create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Rendering ─────────────────────────────────────────────────────────
    /// pdfium failed to open or rasterise the document.
    #[error("{detail}\n\n{}", remediation_hint())]
    RenderFailed { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{}' is encrypted and requires a password (--password)", .path.display())]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{}'", .path.display())]
    WrongPassword { path: PathBuf },

    // ── Writing ───────────────────────────────────────────────────────────
    /// Writing a page image failed; earlier pages stay on disk.
    #[error("Failed to write page {page} to '{}': {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        page: usize,
        /// Pages successfully written before the failure.
        written: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Which pipeline step a [`DocumentError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingInput,
    Input,
    OutputDir,
    Render,
    Write,
}

impl DocumentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentError::MissingInput { .. } => ErrorKind::MissingInput,
            DocumentError::PermissionDenied { .. } => ErrorKind::Input,
            DocumentError::OutputDir { .. } => ErrorKind::OutputDir,
            DocumentError::RenderFailed { .. }
            | DocumentError::PasswordRequired { .. }
            | DocumentError::WrongPassword { .. } => ErrorKind::Render,
            DocumentError::WriteFailed { .. } => ErrorKind::Write,
        }
    }

    /// Number of page files left on disk by the failed conversion.
    pub fn pages_written(&self) -> usize {
        match self {
            DocumentError::WriteFailed { written, .. } => *written,
            _ => 0,
        }
    }
}

/// Platform-specific advice printed after a render failure. pdfium is the
/// native library most likely to be missing or mismatched.
pub fn remediation_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Note: on macOS, pdf2png needs libpdfium.dylib.\n  \
         Run `pdf2png --fetch-pdfium` or set PDFIUM_LIB_PATH=/path/to/libpdfium.dylib"
    } else if cfg!(target_os = "windows") {
        "Note: on Windows, pdf2png needs pdfium.dll.\n  \
         Run `pdf2png --fetch-pdfium` or place pdfium.dll next to pdf2png.exe"
    } else {
        "Note: on Linux, pdf2png needs libpdfium.so.\n  \
         Run `pdf2png --fetch-pdfium` or set PDFIUM_LIB_PATH=/path/to/libpdfium.so"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_carries_hint() {
        let e = DocumentError::RenderFailed {
            path: "bad.pdf".into(),
            detail: "PdfiumLibraryInternalError(FormatError)".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("FormatError"), "got: {msg}");
        assert!(msg.contains("pdfium"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Render);
    }

    #[test]
    fn write_failure_reports_partial_progress() {
        let e = DocumentError::WriteFailed {
            path: "out/page_003.png".into(),
            page: 3,
            written: 2,
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(e.kind(), ErrorKind::Write);
        assert_eq!(e.pages_written(), 2);
        assert!(e.to_string().contains("page 3"));
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn missing_input_display() {
        let e = DocumentError::MissingInput {
            path: "nowhere/report.pdf".into(),
        };
        assert_eq!(e.to_string(), "PDF file not found: nowhere/report.pdf");
        assert_eq!(e.pages_written(), 0);
    }

    #[test]
    fn bootstrap_error_converts_to_fatal() {
        let e: Pdf2PngError = BootstrapError::Download("offline".into()).into();
        assert!(e.to_string().contains("offline"));
    }
}
