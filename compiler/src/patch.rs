use fuse_wire_schema::{FuseState, FuseWire, WireError};
use log::{debug, warn};
use crate::{
    compiler::{accessors, evaluate},
    error::FuseError,
    types::FuseDocument,
};

/// Read the fuse states out of a compiled binary, named after `doc`.
///
/// Fuses present in `doc` but missing from the binary's wire (an older
/// build) are skipped.
pub fn read_fuses(doc: &FuseDocument, image: &[u8]) -> Result<Vec<(String, FuseState)>, FuseError> {
    let start = FuseWire::locate(image)?;
    let wire = FuseWire::decode(image)?;
    check_version(doc, &wire)?;
    if wire.fuses().len() != doc.fuses.len() {
        warn!(
            "binary carries {} fuses, the definition file declares {}",
            wire.fuses().len(),
            doc.fuses.len()
        );
    }

    let getters: Vec<_> = accessors(doc).into_iter().take(wire.fuses().len()).collect();
    let enabled = evaluate(&getters, &image[start..]);
    Ok(getters
        .into_iter()
        .zip(enabled)
        .map(|(accessor, on)| (accessor.fuse, FuseState::from(on)))
        .collect())
}

/// Flip the named fuses inside a compiled binary. Every name is resolved and
/// checked against the binary's wire before the image is touched.
pub fn write_fuses(
    doc: &FuseDocument,
    image: &mut [u8],
    changes: &[(String, FuseState)],
) -> Result<(), FuseError> {
    let wire = FuseWire::decode(image)?;
    check_version(doc, &wire)?;

    let indices = changes
        .iter()
        .map(|(name, state)| {
            let index = doc
                .position(name)
                .ok_or_else(|| FuseError::UnknownFuse(name.clone()))?;
            if index >= wire.fuses().len() {
                return Err(FuseError::Wire(WireError::IndexOutOfRange {
                    index,
                    len: wire.fuses().len(),
                }));
            }
            Ok((index, *state))
        })
        .collect::<Result<Vec<_>, FuseError>>()?;

    for (index, state) in indices {
        let previous = FuseWire::set_fuse(image, index, state)?;
        debug!(
            "fuse {}: {} -> {}",
            doc.fuses[index].name, previous, state
        );
    }
    Ok(())
}

fn check_version(doc: &FuseDocument, wire: &FuseWire) -> Result<(), FuseError> {
    if u64::from(wire.version()) != doc.version {
        return Err(FuseError::SchemaConstraint(format!(
            "Binary fuse version {} does not match definition version {}",
            wire.version(),
            doc.version
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_document;

    const DOC: &str = r#"{"_version": 4, "run_as_node": "1", "cookie_encryption": "0"}"#;

    fn binary() -> (FuseDocument, Vec<u8>) {
        let (doc, wire) = compile_document(DOC).unwrap();
        let mut image = b"\x7fELF\x02\x01\x01\x00".to_vec();
        image.extend_from_slice(&wire.encode());
        image.extend_from_slice(b"\x00\x00trailing");
        (doc, image)
    }

    #[test]
    fn read_named_states() {
        let (doc, image) = binary();
        let states = read_fuses(&doc, &image).unwrap();
        assert_eq!(
            states,
            vec![
                ("run_as_node".to_string(), FuseState::Enabled),
                ("cookie_encryption".to_string(), FuseState::Disabled),
            ]
        );
    }

    #[test]
    fn write_then_read() {
        let (doc, mut image) = binary();
        let len = image.len();
        write_fuses(
            &doc,
            &mut image,
            &[
                ("run_as_node".to_string(), FuseState::Disabled),
                ("cookie_encryption".to_string(), FuseState::Enabled),
            ],
        )
        .unwrap();
        assert_eq!(image.len(), len);
        let states: Vec<FuseState> = read_fuses(&doc, &image).unwrap().into_iter().map(|(_, s)| s).collect();
        assert_eq!(states, vec![FuseState::Disabled, FuseState::Enabled]);
    }

    #[test]
    fn unknown_fuse_leaves_image_alone() {
        let (doc, mut image) = binary();
        let before = image.clone();
        let err = write_fuses(
            &doc,
            &mut image,
            &[
                ("run_as_node".to_string(), FuseState::Disabled),
                ("no_such_fuse".to_string(), FuseState::Enabled),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, FuseError::UnknownFuse(name) if name == "no_such_fuse"));
        assert_eq!(image, before);
    }

    #[test]
    fn version_mismatch() {
        let (_, image) = binary();
        let (other, _) = compile_document(r#"{"_version": 5, "run_as_node": "1"}"#).unwrap();
        assert!(matches!(read_fuses(&other, &image), Err(FuseError::SchemaConstraint(_))));
    }

    #[test]
    fn missing_wire() {
        let (doc, _) = binary();
        assert!(matches!(
            read_fuses(&doc, b"plain bytes"),
            Err(FuseError::Wire(WireError::SentinelNotFound))
        ));
    }

    #[test]
    fn older_binary_with_fewer_fuses() {
        let (older, wire) = compile_document(r#"{"_version": 4, "run_as_node": "0"}"#).unwrap();
        let (newer, _) = compile_document(DOC).unwrap();
        let image = wire.encode();
        assert_eq!(older.fuses.len(), 1);
        assert_eq!(
            read_fuses(&newer, &image).unwrap(),
            vec![("run_as_node".to_string(), FuseState::Disabled)]
        );
        assert!(matches!(
            write_fuses(&newer, &mut image.clone(), &[("cookie_encryption".to_string(), FuseState::Enabled)]),
            Err(FuseError::Wire(WireError::IndexOutOfRange { index: 1, len: 1 }))
        ));
    }

    #[test]
    fn out_of_range_change_leaves_image_alone() {
        let (_, wire) = compile_document(r#"{"_version": 4, "run_as_node": "1"}"#).unwrap();
        let (newer, _) = compile_document(DOC).unwrap();
        let mut image = wire.encode();
        let before = image.clone();

        let err = write_fuses(
            &newer,
            &mut image,
            &[
                ("run_as_node".to_string(), FuseState::Disabled),
                ("cookie_encryption".to_string(), FuseState::Enabled),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FuseError::Wire(WireError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(image, before);
    }
}
