// build.rs — pdfium-bootstrap
//
// Handles the optional `bundled` feature: copies the platform pdfium shared
// library named by `PDFIUM_BUNDLE_LIB` into OUT_DIR and generates a small
// source file that embeds its bytes with `include_bytes!`.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=PDFIUM_BUNDLE_LIB");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_BUNDLED");

    if std::env::var("CARGO_FEATURE_BUNDLED").is_err() {
        return;
    }

    let lib_src = match std::env::var("PDFIUM_BUNDLE_LIB") {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => panic!(
            "\n\
             pdfium-bootstrap: the `bundled` feature is enabled but PDFIUM_BUNDLE_LIB is not set.\n\
             Point it at the platform pdfium library:\n\
             \n\
               macOS  : path/to/libpdfium.dylib\n\
               Linux  : path/to/libpdfium.so\n\
               Windows: path\\to\\pdfium.dll\n\
             \n\
             Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
        ),
    };

    if !lib_src.exists() {
        panic!(
            "pdfium-bootstrap: PDFIUM_BUNDLE_LIB points to a missing file: {}",
            lib_src.display()
        );
    }

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR not set"));
    let lib_dest = out_dir.join("bundled_pdfium_lib");

    std::fs::copy(&lib_src, &lib_dest).unwrap_or_else(|e| {
        panic!(
            "pdfium-bootstrap: failed to copy {} → {}: {}",
            lib_src.display(),
            lib_dest.display(),
            e
        )
    });

    // `include_bytes!` needs a literal path at the expansion site, so the
    // invocation is written into a generated file and pulled in with `include!`.
    let bundled_rs = out_dir.join("bundled.rs");
    let code = format!(
        "/// The pdfium shared library embedded at compile time.\n\
         pub static PDFIUM_BYTES: &[u8] = include_bytes!({:?});\n",
        lib_dest
    );
    std::fs::write(&bundled_rs, code).unwrap_or_else(|e| {
        panic!(
            "pdfium-bootstrap: failed to write {}: {}",
            bundled_rs.display(),
            e
        )
    });

    println!("cargo:rerun-if-changed={}", lib_src.display());
}
