//! # pdf2png
//!
//! Rasterise every page of a PDF into numbered PNG files, one directory per
//! document, and run that over a batch of documents.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   check the file exists, create `<stem>_pages/`
//!  ├─ 2. Render  rasterise every page via pdfium at the configured DPI
//!  └─ 3. Write   page_001.png … page_NNN.png, in document order
//! ```
//!
//! The pdfium library is bound once, up front, by
//! [`PdfiumRenderer::bind`]. A missing library is reported immediately
//! with every location searched; nothing is installed behind the caller's
//! back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{run_batch, BatchConfig, ConversionConfig, PdfiumRenderer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let renderer = PdfiumRenderer::bind(None)?;
//!     let batch = BatchConfig::new("scans").with_documents(["invoice.pdf", "contract.pdf"]);
//!     let config = ConversionConfig::builder().dpi(300).build()?;
//!
//!     let report = run_batch(&renderer, &batch, &config);
//!     eprintln!("{} documents written, {} pages", report.written(), report.total_pages_written());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `cli`     | on      | Enables the `pdf2png` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `bundled` | off     | Embeds the pdfium library given by `PDFIUM_BUNDLE_LIB` at build time |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{program_dir, run_batch, BatchConfig, DEFAULT_DOCUMENTS};
pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI};
pub use convert::convert;
pub use error::{DocumentError, ErrorKind, Pdf2PngError};
pub use output::{BatchReport, ConversionOutput, DocumentReport, DocumentStatus};
pub use pipeline::input::default_output_dir;
pub use pipeline::render::{PageRenderer, PdfiumRenderer, RenderOptions, RenderedPage};
pub use pipeline::write::page_file_name;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
