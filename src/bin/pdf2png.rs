//! CLI binary for pdf2png.
//!
//! A thin shim over the library crate: binds pdfium, maps CLI flags to
//! `ConversionConfig` / `BatchConfig`, runs the batch and prints progress.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2png::{
    program_dir, run_batch, BatchConfig, ConversionConfig, ConversionProgressCallback,
    DocumentError, ErrorKind, PdfiumRenderer, ProgressCallback,
};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Prints the per-document console lines to `out` (stdout in `main`) and,
/// when enabled, keeps a page progress bar on stderr while a document is
/// being written.
struct CliProgressCallback<W> {
    out: Mutex<W>,
    show_bar: bool,
    color: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl<W: Write + Send> CliProgressCallback<W> {
    fn new(out: W, show_bar: bool, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            show_bar,
            color,
            bar: Mutex::new(None),
        }
    }

    fn paint(&self, style: fn(&str) -> String, s: &str) -> String {
        if self.color {
            style(s)
        } else {
            s.to_string()
        }
    }

    /// Print a line above the bar (if one is active).
    fn say(&self, line: &str) {
        let emit = || {
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "{line}");
            }
        };
        let bar = self.bar.lock().ok().and_then(|slot| slot.clone());
        match bar {
            Some(bar) => bar.suspend(emit),
            None => emit(),
        }
    }

    fn start_bar(&self, total: usize) {
        if !self.show_bar {
            return;
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        bar.set_prefix("Writing");
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn finish_bar(&self) {
        if let Some(bar) = self.bar.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_and_clear();
        }
    }
}

impl<W: Write + Send> ConversionProgressCallback for CliProgressCallback<W> {
    fn on_document_start(&self, pdf_path: &Path, output_dir: &Path) {
        let name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| pdf_path.display().to_string());
        self.say(&format!("Converting {name} to images..."));
        self.say(&format!("Output directory: {}", output_dir.display()));
    }

    fn on_pages_rendered(&self, page_count: usize) {
        self.say(&format!("Found {page_count} pages"));
        self.start_bar(page_count);
    }

    fn on_page_saved(&self, page_num: usize, _total_pages: usize, path: &Path) {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.say(&format!("  Saved page {page_num}: {file}"));
        if let Some(bar) = self.bar.lock().ok().as_deref().and_then(Option::as_ref) {
            bar.inc(1);
        }
    }

    fn on_document_complete(&self, page_count: usize, output_dir: &Path) {
        self.finish_bar();
        self.say("");
        self.say(&format!(
            "{} Successfully converted {page_count} pages to {}",
            self.paint(green, "✓"),
            output_dir.display()
        ));
    }

    fn on_document_error(&self, _pdf_path: &Path, error: &DocumentError) {
        self.finish_bar();
        let label = match error.kind() {
            ErrorKind::MissingInput => "Error:",
            _ => "Error converting PDF:",
        };
        self.say(&format!("{} {error}", self.paint(red, label)));
    }

    fn on_document_skipped(&self, name: &str) {
        self.say(&format!(
            "{} {name} not found, skipping...",
            self.paint(yellow, "Warning:")
        ));
    }

    fn on_document_finished(&self) {
        self.say("");
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the built-in document list found next to the executable
  pdf2png

  # Convert specific files at 300 DPI
  pdf2png --dpi 300 invoice.pdf contract.pdf

  # One document into a chosen directory
  pdf2png report.pdf -o /tmp/report-images

  # Download pdfium into the cache first (one-off)
  pdf2png --fetch-pdfium

  # Machine-readable summary
  pdf2png --json scans/*.pdf > report.json

OUTPUT:
  For every X.pdf a directory X_pages/ is created beside it, holding
  page_001.png … page_NNN.png in document order. Existing files in that
  directory are left untouched.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium
  PDFIUM_CACHE_DIR        Override the pdfium cache directory
  PDF2PNG_BASE_DIR        Directory document names are resolved against
  RUST_LOG                Tracing filter (e.g. pdf2png=debug)

PDFIUM:
  pdf2png needs the pdfium shared library. It is looked up in
  PDFIUM_LIB_PATH, the cache directory, next to the executable, and on the
  system library path, in that order. Nothing is downloaded unless you pass
  --fetch-pdfium.
"#;

/// Convert every page of PDF documents into numbered PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2png",
    version,
    about = "Convert every page of PDF documents into numbered PNG images",
    long_about = "Rasterise every page of each PDF with pdfium and write the pages as \
page_001.png, page_002.png, … into a <name>_pages directory beside the document. \
With no arguments, the built-in document list is converted.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF documents to convert. Default: the built-in document list.
    documents: Vec<PathBuf>,

    /// Directory relative document paths are resolved against.
    /// Default: the directory containing this executable.
    #[arg(long, env = "PDF2PNG_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Write page images here instead of <name>_pages (single document only).
    #[arg(short, long, env = "PDF2PNG_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Rendering resolution in dots per inch.
    #[arg(long, env = "PDF2PNG_DPI", default_value_t = pdf2png::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(36..=1200))]
    dpi: u32,

    /// Cap the longest edge of each page image, in pixels.
    #[arg(long, env = "PDF2PNG_MAX_PIXELS")]
    max_pixels: Option<u32>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PNG_PASSWORD")]
    password: Option<String>,

    /// Path to the pdfium shared library (also read from PDFIUM_LIB_PATH).
    #[arg(long)]
    pdfium_lib: Option<PathBuf>,

    /// Download pdfium into the cache directory before converting.
    #[arg(long)]
    fetch_pdfium: bool,

    /// Print the batch report as JSON instead of progress lines.
    #[arg(long, env = "PDF2PNG_JSON")]
    json: bool,

    /// Disable the page progress bar.
    #[arg(long, env = "PDF2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PNG_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress callback already prints everything a user needs, so
    // library logs stay at ERROR unless asked for.
    let filter = if cli.verbose {
        "debug"
    } else if cli.json && !cli.quiet {
        "info"
    } else {
        "error"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── PDF engine ───────────────────────────────────────────────────────
    if cli.fetch_pdfium {
        fetch_pdfium(cli.quiet)?;
    }

    let renderer = PdfiumRenderer::bind(cli.pdfium_lib.as_deref())
        .context("Cannot start without the PDF rendering engine")?;

    // ── Build config ─────────────────────────────────────────────────────
    let batch = build_batch(&cli)?;

    let progress: Option<ProgressCallback> = if cli.quiet || cli.json {
        None
    } else {
        let color = io::stdout().is_terminal();
        let cb = CliProgressCallback::new(io::stdout(), !cli.no_progress, color);
        Some(Arc::new(cb) as Arc<dyn ConversionProgressCallback>)
    };
    let config = build_config(&cli, progress)?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = run_batch(&renderer, &batch, &config);

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        let summary = format!(
            "{} written, {} skipped, {} failed, {} pages",
            report.written(),
            report.skipped(),
            report.failed(),
            report.total_pages_written()
        );
        if io::stderr().is_terminal() {
            eprintln!("{}", dim(&summary));
        } else {
            eprintln!("{summary}");
        }
    }

    // Per-document failures were reported above; they do not change the
    // exit status.
    Ok(())
}

/// Explicit, user-requested pdfium download with a byte progress bar.
fn fetch_pdfium(quiet: bool) -> Result<()> {
    if quiet {
        pdfium_bootstrap::fetch_pdfium_library(None).context("Failed to download pdfium")?;
        return Ok(());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS),
    );
    bar.set_prefix("pdfium");
    bar.enable_steady_tick(Duration::from_millis(80));

    let on_progress = |downloaded: u64, total: Option<u64>| {
        if let Some(t) = total {
            if bar.length() != Some(t) {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    };

    let path = pdfium_bootstrap::fetch_pdfium_library(Some(&on_progress))
        .context("Failed to download pdfium")?;
    bar.finish_and_clear();
    eprintln!("{} pdfium ready at {}", green("✓"), path.display());
    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_batch(cli: &Cli) -> Result<BatchConfig> {
    let base_dir = cli.base_dir.clone().unwrap_or_else(program_dir);
    let mut batch = BatchConfig::new(base_dir);
    if !cli.documents.is_empty() {
        batch = batch.with_documents(cli.documents.iter().cloned());
    }

    if cli.output_dir.is_some() && batch.documents.len() != 1 {
        anyhow::bail!(
            "--output-dir needs exactly one document, got {}",
            batch.documents.len()
        );
    }
    Ok(batch)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().dpi(cli.dpi);

    if let Some(px) = cli.max_pixels {
        builder = builder.max_rendered_pixels(px);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
