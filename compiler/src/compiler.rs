use fuse_wire_schema::FuseWire;
use log::debug;
use crate::{
    types::{Accessor, FuseDocument},
    verifier::verify_document,
    parser::parse_document,
    utils::accessor_name,
    error::FuseError,
};

/// Compile a fuse definition file into `(FuseDocument, FuseWire)`.
/// Returns `Err(FuseError)` if parsing or verification fails.
pub fn compile_document(text: &str) -> Result<(FuseDocument, FuseWire), FuseError> {
    let doc = parse_document(text)?;
    verify_document(&doc)?;
    let wire = build_wire(&doc)?;
    Ok((doc, wire))
}

/// Lay the document's defaults out on a wire.
pub fn build_wire(doc: &FuseDocument) -> Result<FuseWire, FuseError> {
    let version = u8::try_from(doc.version).map_err(|_| {
        FuseError::SchemaConstraint(format!(
            "Fuse version {} can not exceed one byte in size",
            doc.version
        ))
    })?;
    let states = doc.fuses.iter().map(|fuse| fuse.default).collect();
    let wire = FuseWire::new(version, states)?;
    debug!(
        "built fuse wire: version {}, {} fuses, {} bytes",
        wire.version(),
        wire.fuses().len(),
        wire.len()
    );
    Ok(wire)
}

/// One accessor per fuse, reading `SENTINEL.len() + 2 + index`.
pub fn accessors(doc: &FuseDocument) -> Vec<Accessor> {
    doc.fuses
        .iter()
        .enumerate()
        .map(|(index, fuse)| {
            let accessor = Accessor {
                name:    accessor_name(&fuse.name),
                fuse:    fuse.name.clone(),
                offset:  FuseWire::fuse_offset(index),
                default: fuse.default,
            };
            debug!("fuse {} -> {}() at offset {}", fuse.name, accessor.name, accessor.offset);
            accessor
        })
        .collect()
}

/// Evaluate accessors against an encoded wire the way the generated code
/// does: `wire[offset] == '1'`.
pub fn evaluate(accessors: &[Accessor], wire: &[u8]) -> Vec<bool> {
    accessors
        .iter()
        .map(|accessor| wire.get(accessor.offset) == Some(&b'1'))
        .collect()
}
