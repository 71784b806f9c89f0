//! Single-document conversion entry point.

use crate::config::ConversionConfig;
use crate::error::DocumentError;
use crate::output::ConversionOutput;
use crate::pipeline::render::{PageRenderer, RenderOptions};
use crate::pipeline::{input, write};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Convert every page of `pdf_path` into `page_NNN.png` files.
///
/// The output directory is `config.output_dir`, or `<parent>/<stem>_pages`
/// when unset; it is created if missing and existing files in it are kept.
///
/// # Errors
/// Every failure is confined to this document and returned as a
/// [`DocumentError`]:
/// - input missing or unreadable
/// - output directory cannot be created
/// - pdfium cannot open or rasterise the document
/// - a page cannot be written (pages before it stay on disk)
///
/// # Example
/// ```rust,no_run
/// use pdf2png::{convert, ConversionConfig, PdfiumRenderer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let renderer = PdfiumRenderer::bind(None)?;
/// let output = convert(&renderer, "report.pdf", &ConversionConfig::default())?;
/// println!("{} pages in {}", output.page_count(), output.output_dir.display());
/// # Ok(())
/// # }
/// ```
pub fn convert(
    renderer: &dyn PageRenderer,
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, DocumentError> {
    let start = Instant::now();
    let pdf_path = input::resolve_input(pdf_path.as_ref())?;

    let output_dir = input::output_dir_for(&pdf_path, config.output_dir.as_deref());
    input::ensure_output_dir(&output_dir)?;

    let progress = config.progress_callback.as_deref();
    info!(
        "Converting {} → {} at {} DPI",
        pdf_path.display(),
        output_dir.display(),
        config.dpi
    );
    if let Some(cb) = progress {
        cb.on_document_start(&pdf_path, &output_dir);
    }

    let pages = renderer.render(&pdf_path, &RenderOptions::from(config))?;
    if let Some(cb) = progress {
        cb.on_pages_rendered(pages.len());
    }

    let written = write::write_pages(pages, &output_dir, progress)?;
    info!(
        "Converted {} pages in {}ms",
        written.len(),
        start.elapsed().as_millis()
    );
    if let Some(cb) = progress {
        cb.on_document_complete(written.len(), &output_dir);
    }

    Ok(ConversionOutput {
        output_dir,
        pages: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::RenderedPage;
    use image::{DynamicImage, RgbImage};
    use std::path::PathBuf;

    struct BlankPages(usize);

    impl PageRenderer for BlankPages {
        fn render(
            &self,
            _pdf_path: &Path,
            _options: &RenderOptions,
        ) -> Result<Vec<RenderedPage>, DocumentError> {
            Ok((1..=self.0)
                .map(|page_num| RenderedPage {
                    page_num,
                    image: DynamicImage::ImageRgb8(RgbImage::new(2, 2)),
                })
                .collect())
        }
    }

    struct Unrenderable;

    impl PageRenderer for Unrenderable {
        fn render(
            &self,
            pdf_path: &Path,
            _options: &RenderOptions,
        ) -> Result<Vec<RenderedPage>, DocumentError> {
            Err(DocumentError::RenderFailed {
                path: pdf_path.to_path_buf(),
                detail: "FormatError".into(),
            })
        }
    }

    fn sample_pdf(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, b"%PDF-1.7\n%%EOF\n").unwrap();
        p
    }

    #[test]
    fn three_page_report_lands_in_report_pages() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = sample_pdf(dir.path(), "report.pdf");

        let out = convert(&BlankPages(3), &pdf, &ConversionConfig::default()).unwrap();

        assert_eq!(out.output_dir, dir.path().join("report_pages"));
        assert_eq!(out.page_count(), 3);
        for n in 1..=3 {
            assert!(out.output_dir.join(format!("page_{n:03}.png")).is_file());
        }
    }

    #[test]
    fn explicit_output_dir_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = sample_pdf(dir.path(), "report.pdf");
        let target = dir.path().join("images");
        let config = ConversionConfig::builder().output_dir(&target).build().unwrap();

        let out = convert(&BlankPages(1), &pdf, &config).unwrap();

        assert_eq!(out.output_dir, target);
        assert!(target.join("page_001.png").is_file());
        assert!(!dir.path().join("report_pages").exists());
    }

    #[test]
    fn missing_input_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert(
            &BlankPages(2),
            dir.path().join("ghost.pdf"),
            &ConversionConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, DocumentError::MissingInput { .. }));
        assert!(!dir.path().join("ghost_pages").exists());
    }

    #[test]
    fn render_failure_leaves_an_empty_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = sample_pdf(dir.path(), "broken.pdf");

        let err = convert(&Unrenderable, &pdf, &ConversionConfig::default()).unwrap_err();

        assert!(matches!(err, DocumentError::RenderFailed { .. }));
        let out_dir = dir.path().join("broken_pages");
        assert!(out_dir.is_dir());
        assert_eq!(std::fs::read_dir(out_dir).unwrap().count(), 0);
    }
}
