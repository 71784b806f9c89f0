//! PDF rasterisation: render every page to a `DynamicImage`.
//!
//! The rendering engine sits behind [`PageRenderer`] so the pipeline receives
//! it as an explicit dependency. [`PdfiumRenderer`] is the production
//! implementation; it is bound once at startup and reused for every document.

use crate::config::ConversionConfig;
use crate::error::{DocumentError, Pdf2PngError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// One rasterised page, 1-indexed in document order.
pub struct RenderedPage {
    pub page_num: usize,
    pub image: DynamicImage,
}

/// The subset of [`ConversionConfig`] a renderer needs.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub dpi: u32,
    pub max_rendered_pixels: Option<u32>,
    pub password: Option<String>,
}

impl RenderOptions {
    /// Multiplier from PDF points (1/72 in) to output pixels.
    pub fn scale_factor(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

impl From<&ConversionConfig> for RenderOptions {
    fn from(config: &ConversionConfig) -> Self {
        Self {
            dpi: config.dpi,
            max_rendered_pixels: config.max_rendered_pixels,
            password: config.password.clone(),
        }
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Something that can turn a PDF into an ordered list of page images.
pub trait PageRenderer {
    /// Render every page of `pdf_path`, first page first.
    fn render(
        &self,
        pdf_path: &Path,
        options: &RenderOptions,
    ) -> Result<Vec<RenderedPage>, DocumentError>;
}

/// [`PageRenderer`] backed by a bound pdfium library.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Locate and bind pdfium (see [`pdfium_bootstrap::bind_pdfium`]).
    ///
    /// Fails fast when no library can be loaded; nothing is downloaded.
    pub fn bind(explicit_lib: Option<&Path>) -> Result<Self, Pdf2PngError> {
        let pdfium = pdfium_bootstrap::bind_pdfium(explicit_lib)?;
        Ok(Self::new(pdfium))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render(
        &self,
        pdf_path: &Path,
        options: &RenderOptions,
    ) -> Result<Vec<RenderedPage>, DocumentError> {
        let password = options.password.as_deref();
        let document = self
            .pdfium
            .load_pdf_from_file(pdf_path, password)
            .map_err(|e| classify_load_error(pdf_path, password.is_some(), format!("{:?}", e)))?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let render_config = render_config(options);
        let mut rendered = Vec::with_capacity(total_pages);

        for (idx, page) in pages.iter().enumerate() {
            let page_num = idx + 1;
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| DocumentError::RenderFailed {
                    path: pdf_path.to_path_buf(),
                    detail: format!("page {page_num}: {:?}", e),
                })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                page_num,
                image.width(),
                image.height()
            );
            rendered.push(RenderedPage { page_num, image });
        }

        Ok(rendered)
    }
}

fn render_config(options: &RenderOptions) -> PdfRenderConfig {
    let render_config = PdfRenderConfig::new().scale_page_by_factor(options.scale_factor());
    match options.max_rendered_pixels {
        Some(px) => {
            let edge = pixel_limit(px);
            render_config
                .set_maximum_width(edge)
                .set_maximum_height(edge)
        }
        None => render_config,
    }
}

/// pdfium takes pixel limits as `i32`; larger caps saturate.
fn pixel_limit(px: u32) -> i32 {
    i32::try_from(px).unwrap_or(i32::MAX)
}

/// Map a pdfium load failure to the matching [`DocumentError`].
fn classify_load_error(pdf_path: &Path, password_given: bool, detail: String) -> DocumentError {
    if detail.contains("Password") || detail.contains("password") {
        if password_given {
            DocumentError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            DocumentError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        DocumentError::RenderFailed {
            path: pdf_path.to_path_buf(),
            detail,
        }
    }
}
