//! Page output: PNG-encode each rendered page and write it to disk.
//!
//! PNG is lossless, so rendered text stays crisp at any DPI. Each page is
//! encoded in memory and persisted through a temporary file in the output
//! directory, then renamed into place, so a failed write never leaves a
//! truncated `page_NNN.png` behind.

use crate::error::DocumentError;
use crate::pipeline::render::RenderedPage;
use crate::progress::ConversionProgressCallback;
use image::DynamicImage;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// File name for a 1-indexed page: `page_001.png`, `page_002.png`, …
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{page_num:03}.png")
}

/// Encode an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded page → {} bytes PNG", buf.len());
    Ok(buf)
}

/// Write `pages` into `output_dir` as `page_001.png … page_NNN.png`.
///
/// Pages are consumed in order and dropped as soon as they are written;
/// each file is named after [`RenderedPage::page_num`].
/// The first failure stops the remaining writes and is returned as
/// [`DocumentError::WriteFailed`] carrying the count already on disk.
pub fn write_pages(
    pages: Vec<RenderedPage>,
    output_dir: &Path,
    progress: Option<&dyn ConversionProgressCallback>,
) -> Result<Vec<PathBuf>, DocumentError> {
    let total = pages.len();
    let mut written = Vec::with_capacity(total);

    for (idx, page) in pages.into_iter().enumerate() {
        let page_num = page.page_num;
        debug_assert_eq!(page_num, idx + 1, "pages must arrive in document order");
        let path = output_dir.join(page_file_name(page_num));

        write_png(&page.image, output_dir, &path).map_err(|source| {
            DocumentError::WriteFailed {
                path: path.clone(),
                page: page_num,
                written: written.len(),
                source,
            }
        })?;

        debug!("Saved page {} → {}", page_num, path.display());
        if let Some(cb) = progress {
            cb.on_page_saved(page_num, total, &path);
        }
        written.push(path);
    }

    Ok(written)
}

fn write_png(img: &DynamicImage, dir: &Path, dest: &Path) -> std::io::Result<()> {
    let bytes = encode_png(img).map_err(std::io::Error::other)?;
    let mut tmp = page_temp_file(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Temp file for a page, created with the same mode a plain `File::create`
/// would get (0666 minus the umask) rather than tempfile's private 0600.
#[cfg(unix)]
fn page_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn page_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    fn page(page_num: usize, shade: u8) -> RenderedPage {
        RenderedPage {
            page_num,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                4,
                6,
                Rgba([shade, shade, shade, 255]),
            )),
        }
    }

    #[derive(Default)]
    struct Recorder {
        saved: Mutex<Vec<(usize, usize, PathBuf)>>,
    }

    impl ConversionProgressCallback for Recorder {
        fn on_page_saved(&self, page_num: usize, total_pages: usize, path: &Path) {
            self.saved
                .lock()
                .unwrap()
                .push((page_num, total_pages, path.to_path_buf()));
        }
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(page_file_name(1), "page_001.png");
        assert_eq!(page_file_name(42), "page_042.png");
        assert_eq!(page_file_name(999), "page_999.png");
        assert_eq!(page_file_name(1000), "page_1000.png");
    }

    #[test]
    fn encoded_bytes_are_png() {
        let bytes = encode_png(&page(1, 0).image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn pages_are_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();

        let paths = write_pages(
            vec![page(1, 10), page(2, 20), page(3, 30)],
            dir.path(),
            Some(&recorder),
        )
        .unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["page_001.png", "page_002.png", "page_003.png"]);

        // The Nth file holds the Nth page.
        for (i, path) in paths.iter().enumerate() {
            let img = image::open(path).unwrap().to_rgba8();
            assert_eq!(img.get_pixel(0, 0)[0], (i as u8 + 1) * 10);
        }

        let saved = recorder.saved.lock().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!((saved[0].0, saved[0].1), (1, 3));
        assert_eq!(saved[2].2, paths[2]);
    }

    #[test]
    fn no_temp_files_are_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(vec![page(1, 0), page(2, 0)], dir.path(), None).unwrap();

        let count = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 2);
    }

    #[cfg(unix)]
    #[test]
    fn page_files_get_the_same_mode_as_a_plain_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.bin");
        std::fs::write(&plain, b"x").unwrap();

        let paths = write_pages(vec![page(1, 0)], dir.path(), None).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&paths[0]), mode(&plain));
    }

    #[test]
    fn empty_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_pages(Vec::new(), dir.path(), None).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn missing_directory_fails_on_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");

        let err = write_pages(vec![page(1, 0), page(2, 0)], &gone, None).unwrap_err();
        match err {
            DocumentError::WriteFailed { page, written, .. } => {
                assert_eq!(page, 1);
                assert_eq!(written, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
