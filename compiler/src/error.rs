use fuse_wire_schema::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FuseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error at line {line}, column {column}: {msg}")]
    ConfigParse {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Schema constraint error: {0}")]
    SchemaConstraint(String),

    #[error("Verifier error: {0}")]
    VerifierError(String),

    #[error("Unknown fuse \"{0}\"")]
    UnknownFuse(String),

    #[error("Fuse wire error: {0}")]
    Wire(#[from] WireError),
}

impl From<serde_json::Error> for FuseError {
    fn from(err: serde_json::Error) -> Self {
        FuseError::ConfigParse {
            msg:    err.to_string(),
            line:   err.line(),
            column: err.column(),
        }
    }
}
