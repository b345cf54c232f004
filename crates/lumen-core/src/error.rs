//! Errors raised while constructing model values.

use std::error::Error;
use std::fmt;

/// A model value violates a structural invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// An opaque payload is not a whole number of 4-byte words.
    UnalignedPayload {
        /// Raw tag id of the block.
        tag: u32,
        /// Offending payload length in bytes.
        len: usize,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnalignedPayload { tag, len } => {
                write!(
                    f,
                    "opaque payload for tag 0x{tag:04X} is {len} bytes, not a multiple of 4"
                )
            }
        }
    }
}

impl Error for ModelError {}
