//! Configuration types for PDF-to-PNG conversion.
//!
//! Per-document behaviour is controlled through [`ConversionConfig`], built
//! via [`ConversionConfigBuilder`]. Which documents are processed, and where
//! they are looked up, is the business of [`crate::batch::BatchConfig`].

use crate::error::Pdf2PngError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default rendering resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 200;

/// Accepted DPI range.
pub const MIN_DPI: u32 = 36;
pub const MAX_DPI: u32 = 1200;

/// Configuration for converting one PDF into page images.
///
/// # Example
/// ```rust
/// use pdf2png::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .output_dir("scans/report_pages")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI. Range: 36–1200. Default: 200.
    ///
    /// pdfium lays pages out in points (1/72 inch), so each page is scaled by
    /// `dpi / 72`. A US-letter page at 200 DPI comes out at 1700 × 2200 px.
    pub dpi: u32,

    /// Optional cap on the longest edge of a rendered page, in pixels.
    ///
    /// Oversized pages (posters, engineering drawings) are scaled down to fit
    /// instead of being rendered at full DPI. `None` renders at the requested
    /// DPI whatever the page size.
    pub max_rendered_pixels: Option<u32>,

    /// Directory receiving the page images.
    ///
    /// `None` derives `<parent>/<stem>_pages` from the input path.
    pub output_dir: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives per-document and per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            max_rendered_pixels: None,
            output_dir: None,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("output_dir", &self.output_dir)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = Some(px.max(100));
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PngError> {
        let c = &self.config;
        if !(MIN_DPI..=MAX_DPI).contains(&c.dpi) {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if matches!(&c.output_dir, Some(d) if d.as_os_str().is_empty()) {
            return Err(Pdf2PngError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_render_at_200_dpi_beside_the_input() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 200);
        assert!(c.output_dir.is_none());
        assert!(c.max_rendered_pixels.is_none());
    }

    #[test]
    fn dpi_is_clamped() {
        let c = ConversionConfig::builder().dpi(5).build().unwrap();
        assert_eq!(c.dpi, MIN_DPI);
        let c = ConversionConfig::builder().dpi(50_000).build().unwrap();
        assert_eq!(c.dpi, MAX_DPI);
    }

    #[test]
    fn empty_output_dir_is_rejected() {
        let err = ConversionConfig::builder().output_dir("").build().unwrap_err();
        assert!(matches!(err, Pdf2PngError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("redacted"));
    }
}
