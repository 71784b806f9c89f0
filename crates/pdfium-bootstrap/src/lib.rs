//! # pdfium-bootstrap
//!
//! Find and bind the [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library that `pdfium-render` drives, failing with a readable diagnostic
//! when it is nowhere to be found.
//!
//! ## Search order
//!
//! [`bind_pdfium`] tries, first match wins:
//!
//! 1. An explicit path (argument, else `PDFIUM_LIB_PATH`). A path that is
//!    given but does not exist is an error, not a fall-through.
//! 2. The cache directory ([`pdfium_cache_dir`]).
//! 3. The directory containing the running executable.
//! 4. The copy embedded at compile time (`bundled` feature).
//! 5. The system library search path.
//!
//! Nothing is downloaded implicitly. [`fetch_pdfium_library`] downloads the
//! platform archive from
//! [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//! into the cache directory and must be called on purpose.
//!
//! ```rust,no_run
//! use pdfium_bootstrap::{bind_pdfium, fetch_pdfium_library};
//!
//! // Opt-in download, then bind from the cache.
//! fetch_pdfium_library(None).expect("download failed");
//! let pdfium = bind_pdfium(None).expect("PDFium unavailable");
//! ```
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH` — path to an existing pdfium library.
//! - `PDFIUM_CACHE_DIR` — override the default cache directory.

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(feature = "bundled")]
mod bundled {
    include!(concat!(env!("OUT_DIR"), "/bundled.rs"));
}

// ── Public constants ─────────────────────────────────────────────────────────

/// The pdfium-binaries release tag used by [`fetch_pdfium_library`].
pub const PDFIUM_VERSION: &str = "7690";

/// GitHub release base URL.
const BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Environment variable naming an existing pdfium library.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "PDFIUM_CACHE_DIR";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while locating, fetching or binding pdfium.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The caller named a library path that does not exist.
    #[error("PDFium library not found at '{}' (from {origin})", .path.display())]
    ExplicitPathMissing { path: PathBuf, origin: &'static str },

    /// No library in any of the searched locations could be bound.
    #[error(
        "PDFium library not found.\nSearched:\n{}\n\
To fix this, either:\n  \
  • run once with --fetch-pdfium to download it into the cache,\n  \
  • set PDFIUM_LIB_PATH=/path/to/{lib_name}, or\n  \
  • place {lib_name} next to the executable.",
        format_locations(.searched)
    )]
    NotFound {
        searched: Vec<PathBuf>,
        lib_name: String,
    },

    /// The current OS/architecture has no published pdfium build.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Could not create or write the local cache directory.
    #[error("Cache directory error at '{}': {source}", .path.display())]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("Archive extraction failed: {0}")]
    Extract(String),

    /// `pdfium-render` could not load the library.
    #[error("Failed to bind PDFium from '{}': {reason}", .path.display())]
    Bind { path: PathBuf, reason: String },
}

fn format_locations(paths: &[PathBuf]) -> String {
    let mut out = String::new();
    for p in paths {
        let _ = writeln!(out, "  - {}", p.display());
    }
    out.push_str("  - system library search path");
    out
}

// ── Platform metadata ────────────────────────────────────────────────────────

/// File name of the pdfium shared library on this platform,
/// e.g. `libpdfium.so`, `libpdfium.dylib`, `pdfium.dll`.
pub fn library_file_name() -> String {
    format!(
        "{}pdfium{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    )
}

struct ReleaseAsset {
    /// Asset filename in the GitHub release, e.g. `pdfium-mac-arm64.tgz`.
    archive_name: &'static str,
    /// Directory inside the archive holding the library.
    dir_in_archive: &'static str,
}

fn release_asset() -> Result<ReleaseAsset, BootstrapError> {
    let asset = |archive_name, dir_in_archive| ReleaseAsset {
        archive_name,
        dir_in_archive,
    };

    match (std::env::consts::OS, std::env::consts::ARCH) {
        ("macos", "aarch64") => Ok(asset("pdfium-mac-arm64.tgz", "lib")),
        ("macos", "x86_64") => Ok(asset("pdfium-mac-x64.tgz", "lib")),
        ("linux", "x86_64") => Ok(asset("pdfium-linux-x64.tgz", "lib")),
        ("linux", "aarch64") => Ok(asset("pdfium-linux-arm64.tgz", "lib")),
        ("windows", "x86_64") => Ok(asset("pdfium-win-x64.tgz", "bin")),
        ("windows", "aarch64") => Ok(asset("pdfium-win-arm64.tgz", "bin")),
        ("windows", "x86") => Ok(asset("pdfium-win-x86.tgz", "bin")),
        (os, arch) => Err(BootstrapError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}

// ── Locations ────────────────────────────────────────────────────────────────

/// Per-version cache directory for the pdfium library.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/pdf2png/pdfium-{VERSION}/`
/// - **Linux**: `~/.cache/pdf2png/pdfium-{VERSION}/`
/// - **Windows**: `%LOCALAPPDATA%\pdf2png\pdfium-{VERSION}\`
///
/// Override the root with `PDFIUM_CACHE_DIR`.
pub fn pdfium_cache_dir() -> PathBuf {
    if let Ok(root) = std::env::var(CACHE_DIR_ENV) {
        if !root.is_empty() {
            return PathBuf::from(root).join(format!("pdfium-{PDFIUM_VERSION}"));
        }
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("pdf2png").join(format!("pdfium-{PDFIUM_VERSION}"))
}

/// The explicit library path, if one was given as an argument or through
/// `PDFIUM_LIB_PATH`, together with where it came from.
fn explicit_path(explicit: Option<&Path>) -> Option<(PathBuf, &'static str)> {
    if let Some(p) = explicit {
        return Some((p.to_path_buf(), "argument"));
    }
    match std::env::var(LIB_PATH_ENV) {
        Ok(p) if !p.is_empty() => Some((PathBuf::from(p), LIB_PATH_ENV)),
        _ => None,
    }
}

/// Library paths checked on disk, in search order, excluding the system
/// search path.
pub fn search_locations(explicit: Option<&Path>) -> Vec<PathBuf> {
    let lib_name = library_file_name();
    let mut paths = Vec::with_capacity(3);

    if let Some((p, _)) = explicit_path(explicit) {
        paths.push(p);
    }
    paths.push(pdfium_cache_dir().join(&lib_name));
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(&lib_name));
    }

    paths
}

/// Returns the first on-disk library from [`search_locations`] that exists.
pub fn locate_pdfium_library(explicit: Option<&Path>) -> Option<PathBuf> {
    search_locations(explicit).into_iter().find(|p| p.is_file())
}

// ── Binding ──────────────────────────────────────────────────────────────────

/// Binds to pdfium following the documented search order.
///
/// Never touches the network. Returns [`BootstrapError::NotFound`] listing
/// every location tried when no library could be loaded.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, BootstrapError> {
    if let Some((path, origin)) = explicit_path(explicit) {
        if !path.is_file() {
            return Err(BootstrapError::ExplicitPathMissing { path, origin });
        }
        return bind_pdfium_from_path(&path);
    }

    let searched = search_locations(None);
    for candidate in searched.iter().filter(|p| p.is_file()) {
        match bind_pdfium_from_path(candidate) {
            Ok(pdfium) => return Ok(pdfium),
            Err(e) => warn!("Skipping unusable pdfium candidate: {}", e),
        }
    }

    bind_fallback(searched)
}

#[cfg(feature = "bundled")]
fn bind_fallback(_searched: Vec<PathBuf>) -> Result<Pdfium, BootstrapError> {
    let path = ensure_bundled_library()?;
    bind_pdfium_from_path(&path)
}

#[cfg(not(feature = "bundled"))]
fn bind_fallback(searched: Vec<PathBuf>) -> Result<Pdfium, BootstrapError> {
    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            info!("Bound pdfium from the system library path");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            debug!("System pdfium lookup failed: {}", e);
            Err(BootstrapError::NotFound {
                searched,
                lib_name: library_file_name(),
            })
        }
    }
}

/// Binds to a pdfium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, BootstrapError> {
    let pdfium = Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| BootstrapError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    info!("Bound pdfium from {}", path.display());
    Ok(pdfium)
}

/// Writes the embedded library into the cache directory (once) and returns
/// its path.
#[cfg(feature = "bundled")]
pub fn ensure_bundled_library() -> Result<PathBuf, BootstrapError> {
    let cache_dir = pdfium_cache_dir();
    let lib_path = cache_dir.join(library_file_name());

    let up_to_date = std::fs::metadata(&lib_path)
        .map(|m| m.len() == bundled::PDFIUM_BYTES.len() as u64)
        .unwrap_or(false);
    if up_to_date {
        return Ok(lib_path);
    }

    std::fs::create_dir_all(&cache_dir).map_err(|source| BootstrapError::CacheDir {
        path: cache_dir.clone(),
        source,
    })?;
    let partial = lib_path.with_extension("part");
    std::fs::write(&partial, bundled::PDFIUM_BYTES)
        .and_then(|()| std::fs::rename(&partial, &lib_path))
        .map_err(|source| BootstrapError::CacheDir {
            path: lib_path.clone(),
            source,
        })?;

    debug!("Extracted bundled pdfium to {}", lib_path.display());
    Ok(lib_path)
}

// ── Explicit fetch ───────────────────────────────────────────────────────────

/// Downloads the platform pdfium archive and extracts the library into
/// [`pdfium_cache_dir`]. Returns the library path.
///
/// Skips the network when the library is already cached. `on_progress`
/// receives `(bytes_downloaded, total_bytes)` while the archive streams in.
pub fn fetch_pdfium_library(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, BootstrapError> {
    let asset = release_asset()?;
    let lib_name = library_file_name();
    let cache_dir = pdfium_cache_dir();
    let lib_path = cache_dir.join(&lib_name);

    if lib_path.is_file() {
        debug!("pdfium already cached at {}", lib_path.display());
        return Ok(lib_path);
    }

    std::fs::create_dir_all(&cache_dir).map_err(|source| BootstrapError::CacheDir {
        path: cache_dir.clone(),
        source,
    })?;

    let url = format!(
        "{}/chromium%2F{}/{}",
        BASE_URL, PDFIUM_VERSION, asset.archive_name
    );
    info!("Downloading pdfium from {}", url);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-bootstrap/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| BootstrapError::Download(e.to_string()))?;

    let response = client
        .get(&url)
        .send()
        .map_err(|e| BootstrapError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(BootstrapError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let reader = ProgressReader {
        inner: response,
        read: 0,
        total,
        on_progress,
    };

    let entry = format!("{}/{}", asset.dir_in_archive, lib_name);
    extract_library(reader, &entry, &lib_path)?;

    info!("pdfium cached at {}", lib_path.display());
    Ok(lib_path)
}

/// Reader adapter reporting cumulative bytes through a callback.
struct ProgressReader<'a, R> {
    inner: R,
    read: u64,
    total: Option<u64>,
    on_progress: Option<&'a dyn Fn(u64, Option<u64>)>,
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        if let Some(cb) = self.on_progress {
            cb(self.read, self.total);
        }
        Ok(n)
    }
}

/// Streams a gzipped tar archive and unpacks the single entry named
/// `entry_name` to `dest_path`. The file appears under its final name only
/// once fully written.
fn extract_library(
    archive: impl Read,
    entry_name: &str,
    dest_path: &Path,
) -> Result<(), BootstrapError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let mut archive = Archive::new(GzDecoder::new(archive));
    let entries = archive
        .entries()
        .map_err(|e| BootstrapError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| BootstrapError::Extract(e.to_string()))?;
        let matches = entry
            .path()
            .map(|p| p.to_string_lossy().trim_start_matches("./") == entry_name)
            .map_err(|e| BootstrapError::Extract(e.to_string()))?;
        if !matches {
            continue;
        }

        let partial = dest_path.with_extension("part");
        entry
            .unpack(&partial)
            .map_err(|e| BootstrapError::Extract(format!("Unpack failed: {e}")))?;
        std::fs::rename(&partial, dest_path).map_err(|source| BootstrapError::CacheDir {
            path: dest_path.to_path_buf(),
            source,
        })?;
        return Ok(());
    }

    Err(BootstrapError::Extract(format!(
        "'{entry_name}' not found in archive"
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
