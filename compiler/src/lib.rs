//! fuse-wire-compiler
//!
//! This crate implements:
//!  1) A comment-stripping parser for fuse definition files (`fuses.json5`),
//!  2) A verifier (one-byte version and count, identifier and accessor checks),
//!  3) Wire compilation (`compile_document` → `(FuseDocument, FuseWire)`),
//!  4) C++ code generation (`compile_header` / `compile_source` → `String`),
//!  5) Reading and patching fuses inside compiled binaries, and
//!  6) Error types (`FuseError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod parser;
pub mod verifier;
pub mod compiler;
pub mod gen_cpp;
pub mod patch;

use std::{fs, path::Path};

use log::info;

pub use compiler::{accessors, build_wire, compile_document};
pub use error::FuseError;
pub use gen_cpp::{compile_header, compile_source, CodegenOptions};
pub use patch::{read_fuses, write_fuses};
pub use types::{Accessor, Fuse, FuseDocument};

pub use fuse_wire_schema::{FuseState, FuseWire, SENTINEL};

/// What a `generate` run produced.
#[derive(Debug)]
pub struct GeneratedFuses {
    pub document: FuseDocument,
    pub wire:     FuseWire,
    pub header:   String,
    pub source:   String,
}

/// Compile `config` and write the declarations header and definitions
/// source. Both texts are rendered before anything is written, so parse and
/// constraint errors leave the output paths untouched. A failed source write
/// leaves the already written header in place.
pub fn generate(
    config: &str,
    header_path: impl AsRef<Path>,
    source_path: impl AsRef<Path>,
    options: &CodegenOptions,
) -> Result<GeneratedFuses, FuseError> {
    let (document, wire) = compile_document(config)?;
    let header = compile_header(&document, options);
    let source = compile_source(&document, &wire, options);

    let header_path = header_path.as_ref();
    let source_path = source_path.as_ref();
    fs::write(header_path, &header)?;
    info!("wrote fuse declarations to {}", header_path.display());
    fs::write(source_path, &source)?;
    info!(
        "wrote fuse wire (version {}, {} fuses) to {}",
        wire.version(),
        wire.fuses().len(),
        source_path.display()
    );

    Ok(GeneratedFuses {
        document,
        wire,
        header,
        source,
    })
}
