//! Path resolution: validate the input PDF and settle the output directory.

use crate::error::DocumentError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the input stem to name the default output directory.
pub const OUTPUT_DIR_SUFFIX: &str = "_pages";

/// Check that `pdf_path` exists and can be opened for reading.
pub fn resolve_input(pdf_path: &Path) -> Result<PathBuf, DocumentError> {
    if !pdf_path.exists() {
        return Err(DocumentError::MissingInput {
            path: pdf_path.to_path_buf(),
        });
    }

    match std::fs::File::open(pdf_path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(DocumentError::PermissionDenied {
                path: pdf_path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(DocumentError::MissingInput {
                path: pdf_path.to_path_buf(),
            });
        }
    }

    debug!("Resolved input PDF: {}", pdf_path.display());
    Ok(pdf_path.to_path_buf())
}

/// `<parent>/<stem>_pages` for the given input.
///
/// `reports/q3.pdf` → `reports/q3_pages`; `q3.pdf` → `q3_pages`.
pub fn default_output_dir(pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}{OUTPUT_DIR_SUFFIX}");

    match pdf_path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// The configured output directory, or the default derived from the input.
pub fn output_dir_for(pdf_path: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(pdf_path))
}

/// Create `dir` if it does not exist yet.
///
/// Only the directory itself is created: a missing parent is an error. An
/// existing directory is accepted as-is and its contents are left alone.
pub fn ensure_output_dir(dir: &Path) -> Result<(), DocumentError> {
    match std::fs::create_dir(dir) {
        Ok(()) => {
            debug!("Created output directory {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(DocumentError::OutputDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir_sits_beside_the_input() {
        assert_eq!(
            default_output_dir(Path::new("/data/report.pdf")),
            PathBuf::from("/data/report_pages")
        );
        assert_eq!(
            default_output_dir(Path::new("report.pdf")),
            PathBuf::from("report_pages")
        );
    }

    #[test]
    fn default_dir_keeps_spaces_and_inner_dots() {
        assert_eq!(
            default_output_dir(Path::new("docs/NBN T3 Admin.pdf")),
            PathBuf::from("docs/NBN T3 Admin_pages")
        );
        assert_eq!(
            default_output_dir(Path::new("docs/v1.2.notes.pdf")),
            PathBuf::from("docs/v1.2.notes_pages")
        );
    }

    #[test]
    fn explicit_dir_wins() {
        assert_eq!(
            output_dir_for(Path::new("a/b.pdf"), Some(Path::new("elsewhere"))),
            PathBuf::from("elsewhere")
        );
        assert_eq!(
            output_dir_for(Path::new("a/b.pdf"), None),
            PathBuf::from("a/b_pages")
        );
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input(&dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, DocumentError::MissingInput { .. }));
    }

    #[test]
    fn existing_input_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.7\n").unwrap();
        assert_eq!(resolve_input(&pdf).unwrap(), pdf);
    }

    #[test]
    fn ensure_output_dir_is_idempotent_and_preserves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("doc_pages");

        ensure_output_dir(&out).unwrap();
        std::fs::write(out.join("notes.txt"), b"keep me").unwrap();
        ensure_output_dir(&out).unwrap();

        assert_eq!(std::fs::read(out.join("notes.txt")).unwrap(), b"keep me");
    }

    #[test]
    fn ensure_output_dir_does_not_create_parents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("doc_pages");

        let err = ensure_output_dir(&out).unwrap_err();
        assert!(matches!(err, DocumentError::OutputDir { .. }));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn ensure_output_dir_rejects_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("doc_pages");
        std::fs::write(&out, b"not a dir").unwrap();

        assert!(ensure_output_dir(&out).is_err());
    }
}
