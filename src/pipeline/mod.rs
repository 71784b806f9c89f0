//! Pipeline stages for PDF-to-PNG conversion.
//!
//! Each submodule implements exactly one step, and each step fails with its
//! own [`crate::error::DocumentError`] variants.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ write
//! (path)   (pdfium)   (PNG files)
//! ```
//!
//! 1. [`input`]  — validate the input path and create the output directory
//! 2. [`render`] — rasterise every page at the configured DPI
//! 3. [`write`]  — PNG-encode and persist `page_001.png … page_NNN.png`

pub mod input;
pub mod render;
pub mod write;
