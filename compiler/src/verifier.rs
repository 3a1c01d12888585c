use std::collections::HashMap;
use crate::{
    types::FuseDocument,
    utils::{accessor_name, quote},
    error::FuseError,
};
use fuse_wire_schema::MAX_BYTE_VALUE;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Returns `Ok(())` if the document can be laid out on a wire and rendered
/// into valid, unambiguous accessors.
pub fn verify_document(doc: &FuseDocument) -> Result<(), FuseError> {
    // 1) Version and count each occupy a single byte
    if doc.version > MAX_BYTE_VALUE as u64 {
        return Err(FuseError::SchemaConstraint(format!(
            "Fuse version {} can not exceed one byte in size",
            doc.version
        )));
    }
    if doc.fuses.len() > MAX_BYTE_VALUE {
        return Err(FuseError::SchemaConstraint(format!(
            "Fuse count {} can not exceed one byte in size",
            doc.fuses.len()
        )));
    }

    // 2) Names must produce distinct, valid identifiers
    let mut seen: HashMap<String, &str> = HashMap::new();
    for fuse in &doc.fuses {
        if !IDENTIFIER.is_match(&fuse.name) {
            return Err(FuseError::VerifierError(format!(
                "The fuse name {} is not a valid identifier",
                quote(&fuse.name)
            )));
        }
        let accessor = accessor_name(&fuse.name);
        if let Some(other) = seen.insert(accessor.clone(), &fuse.name) {
            return Err(FuseError::VerifierError(format!(
                "The fuses {} and {} both map to accessor {}",
                quote(other),
                quote(&fuse.name),
                accessor
            )));
        }
    }

    Ok(())
}
