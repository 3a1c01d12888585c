use crate::{
    error::FuseError,
    types::{Fuse, FuseDocument},
};
use fuse_wire_schema::FuseState;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref COMMENT_LINE: Regex = Regex::new(r"^\s*/").unwrap();
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "_version")]
    version: u64,
    #[serde(rename = "_schema", default)]
    schema:  Option<serde_json::Value>,
    #[serde(rename = "_comment", default)]
    comment: Option<String>,
    #[serde(flatten)]
    fuses:   IndexMap<String, FuseState>,
}

/// Blank out every line whose first non-whitespace character is `/`.
/// Lines are kept as empty lines so parse errors point at the right line.
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| if COMMENT_LINE.is_match(line) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_document(text: &str) -> Result<FuseDocument, FuseError> {
    let stripped = strip_comments(text);
    let raw: RawDocument = serde_json::from_str(&stripped)?;

    let fuses = raw
        .fuses
        .into_iter()
        .map(|(name, default)| Fuse { name, default })
        .collect();

    Ok(FuseDocument {
        version: raw.version,
        schema:  raw.schema,
        comment: raw.comment,
        fuses,
    })
}
