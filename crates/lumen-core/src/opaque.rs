//! Verbatim chunk payloads.

use crate::error::ModelError;
use crate::tag::{OpaqueKind, TagType};

/// A chunk whose payload is kept byte-for-byte without interpretation.
///
/// The tag is stored raw because blocks attached to placements may carry ids
/// outside [`TagType`]. The payload length is always a whole number of
/// 4-byte words, so the declared word count is derived rather than stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueBlock {
    tag: u32,
    payload: Vec<u8>,
}

impl OpaqueBlock {
    /// Wrap a payload. Fails if `payload.len()` is not a multiple of 4.
    pub fn new(tag: u32, payload: Vec<u8>) -> Result<Self, ModelError> {
        if payload.len() % 4 != 0 {
            return Err(ModelError::UnalignedPayload {
                tag,
                len: payload.len(),
            });
        }
        Ok(Self { tag, payload })
    }

    /// An empty block for the given top-level kind.
    pub fn empty(kind: OpaqueKind) -> Self {
        Self {
            tag: kind.tag().raw(),
            payload: Vec::new(),
        }
    }

    /// Raw tag id.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Registered tag, if the raw id is known.
    pub fn tag_type(&self) -> Option<TagType> {
        TagType::from_raw(self.tag)
    }

    /// Declared size in 4-byte words.
    pub fn words(&self) -> usize {
        self.payload.len() / 4
    }

    /// The raw payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the block, returning its payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}
