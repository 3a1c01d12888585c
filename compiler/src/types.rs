use fuse_wire_schema::FuseState;

/// A parsed fuse definition file with the reserved `_` keys split out.
#[derive(Debug, Clone, PartialEq)]
pub struct FuseDocument {
    pub version: u64,
    pub schema:  Option<serde_json::Value>,
    pub comment: Option<String>,
    pub fuses:   Vec<Fuse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fuse {
    pub name:    String,
    pub default: FuseState,
}

/// A generated `Is<Name>Enabled` function and the wire offset it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub name:    String,
    pub fuse:    String,
    pub offset:  usize,
    pub default: FuseState,
}

impl FuseDocument {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fuses.iter().position(|fuse| fuse.name == name)
    }
}
