use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{ByteBuffer, MAX_BYTE_VALUE, SENTINEL, WIRE_PREFIX_LEN};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("Fuse sentinel not found in binary")]
    SentinelNotFound,

    #[error("Fuse wire is truncated at byte {0}")]
    Truncated(usize),

    #[error("Invalid fuse state byte 0x{byte:02x} at offset {offset}")]
    InvalidState { byte: u8, offset: usize },

    #[error("A fuse wire holds at most {max} fuses, got {0}", max = MAX_BYTE_VALUE)]
    TooManyFuses(usize),

    #[error("Fuse index {index} is out of range for a wire of {len} fuses")]
    IndexOutOfRange { index: usize, len: usize },
}

/// State of a single fuse, stored as an ASCII digit on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuseState {
    #[serde(rename = "0")]
    Disabled,
    #[serde(rename = "1")]
    Enabled,
}

impl FuseState {
    pub fn as_byte(self) -> u8 {
        match self {
            FuseState::Disabled => b'0',
            FuseState::Enabled  => b'1',
        }
    }

    pub fn from_byte(byte: u8) -> Option<FuseState> {
        match byte {
            b'0' => Some(FuseState::Disabled),
            b'1' => Some(FuseState::Enabled),
            _    => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == FuseState::Enabled
    }
}

impl From<bool> for FuseState {
    fn from(enabled: bool) -> Self {
        if enabled {
            FuseState::Enabled
        } else {
            FuseState::Disabled
        }
    }
}

impl fmt::Display for FuseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuseState::Disabled => f.write_str("disabled"),
            FuseState::Enabled  => f.write_str("enabled"),
        }
    }
}

/// The decoded contents of a fuse wire: a version byte and one state per
/// fuse, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuseWire {
    version: u8,
    fuses:   Vec<FuseState>,
}

impl FuseWire {
    /// Build a wire. Fails when the fuse count does not fit the length byte.
    pub fn new(version: u8, fuses: Vec<FuseState>) -> Result<FuseWire, WireError> {
        if fuses.len() > MAX_BYTE_VALUE {
            return Err(WireError::TooManyFuses(fuses.len()));
        }
        Ok(FuseWire { version, fuses })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn fuses(&self) -> &[FuseState] {
        &self.fuses
    }

    /// Encoded length: sentinel, version, count, one byte per fuse.
    pub fn len(&self) -> usize {
        SENTINEL.len() + WIRE_PREFIX_LEN + self.fuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuses.is_empty()
    }

    /// Offset of fuse `index` relative to the start of the wire.
    pub fn fuse_offset(index: usize) -> usize {
        SENTINEL.len() + WIRE_PREFIX_LEN + index
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.len());
        buffer.extend_from_slice(SENTINEL);
        buffer.push(self.version);
        // `new` keeps the count within a byte.
        buffer.push(self.fuses.len() as u8);
        buffer.extend(self.fuses.iter().map(|state| state.as_byte()));
        buffer
    }

    /// Offset of the first sentinel byte inside `image`.
    pub fn locate(image: &[u8]) -> Result<usize, WireError> {
        ByteBuffer::new(image)
            .seek_to(SENTINEL)
            .map_err(|_| WireError::SentinelNotFound)
    }

    /// Find the wire inside `image` and read it back.
    pub fn decode(image: &[u8]) -> Result<FuseWire, WireError> {
        let mut bb = ByteBuffer::new(image);
        bb.seek_to(SENTINEL).map_err(|_| WireError::SentinelNotFound)?;
        bb.read_bytes(SENTINEL.len())
            .map_err(|_| WireError::Truncated(bb.index()))?;

        let version = bb.read_byte().map_err(|_| WireError::Truncated(bb.index()))?;
        let count   = bb.read_byte().map_err(|_| WireError::Truncated(bb.index()))?;
        let start   = bb.index();
        let states  = bb
            .read_bytes(count as usize)
            .map_err(|_| WireError::Truncated(image.len()))?;

        let fuses = states
            .iter()
            .enumerate()
            .map(|(i, &byte)| {
                FuseState::from_byte(byte).ok_or(WireError::InvalidState {
                    byte,
                    offset: start + i,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FuseWire { version, fuses })
    }

    /// Overwrite the state byte of fuse `index` in place. Returns the state
    /// that was there before.
    pub fn set_fuse(image: &mut [u8], index: usize, state: FuseState) -> Result<FuseState, WireError> {
        let wire_start = Self::locate(image)?;
        let wire = Self::decode(image)?;
        if index >= wire.fuses.len() {
            return Err(WireError::IndexOutOfRange {
                index,
                len: wire.fuses.len(),
            });
        }
        image[wire_start + Self::fuse_offset(index)] = state.as_byte();
        Ok(wire.fuses[index])
    }
}
