//! Layout of the fuse wire: a fixed byte sequence that a compiled binary
//! carries so that flags can be flipped after the build by patching bytes.
//!
//! ```
//! use fuse_wire_schema::*;
//!
//! let wire = FuseWire::new(1, vec![FuseState::Enabled, FuseState::Disabled]).unwrap();
//! let bytes = wire.encode();
//! assert_eq!(bytes.len(), SENTINEL.len() + 4);
//! assert_eq!(&bytes[SENTINEL.len()..], &[0x01, 0x02, b'1', b'0']);
//!
//! let mut image = b"\x7fELF....".to_vec();
//! image.extend_from_slice(&bytes);
//! assert_eq!(FuseWire::decode(&image).unwrap(), wire);
//! ```

pub mod bb;
pub mod wire;

pub use bb::*;
pub use wire::*;

/// Marker that precedes the wire so external tools can find it inside a
/// compiled binary.
pub const SENTINEL: &[u8; 32] = b"dL7pKGdnNz796PbbjQWNKmHXBZaB9tsX";

/// Bytes between the sentinel and the first fuse: version and fuse count.
pub const WIRE_PREFIX_LEN: usize = 2;

/// Largest value the single-byte version and count slots can hold.
pub const MAX_BYTE_VALUE: usize = u8::MAX as usize;
