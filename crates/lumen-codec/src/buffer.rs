//! Growable output buffer, the mirror of [`ByteCursor`](crate::cursor::ByteCursor).

use lumen_core::{OpaqueBlock, TagType};

use crate::error::LumenError;

/// An append-only byte buffer with wire-format writers.
///
/// Chunk bodies are built in their own buffer first so the chunk header can
/// carry a size computed from what was actually written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkBuffer {
    bytes: Vec<u8>,
}

impl ChunkBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append one byte.
    pub fn write_u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    /// Append a big-endian i16.
    pub fn write_i16(&mut self, v: i16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian u16.
    pub fn write_u16(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian i32.
    pub fn write_i32(&mut self, v: i32) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian u32.
    pub fn write_u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a float, byte-reversed from its little-endian layout.
    pub fn write_f32(&mut self, v: f32) {
        let mut bytes = v.to_le_bytes();
        bytes.reverse();
        self.bytes.extend_from_slice(&bytes);
    }

    /// Append a count as an i32, failing if it does not fit.
    pub fn write_count(&mut self, count: usize, what: &str) -> Result<(), LumenError> {
        let v = i32::try_from(count)
            .map_err(|_| LumenError::unencodable(format!("{what} count {count} exceeds i32")))?;
        self.write_i32(v);
        Ok(())
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append another buffer's contents.
    pub fn append(&mut self, other: &ChunkBuffer) {
        self.bytes.extend_from_slice(&other.bytes);
    }

    /// Append zero bytes until the length is a multiple of 4.
    pub fn pad_to_word(&mut self) {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
    }

    /// Append a `{tag, words}` chunk header.
    pub fn write_header(&mut self, tag: u32, words: usize) -> Result<(), LumenError> {
        let words = u32::try_from(words)
            .map_err(|_| LumenError::unencodable(format!("chunk 0x{tag:X} of {words} words")))?;
        self.write_u32(tag);
        self.write_u32(words);
        Ok(())
    }

    /// Append a chunk whose size is computed from `body`.
    ///
    /// The body must already be word-aligned.
    pub fn write_chunk(&mut self, tag: TagType, body: &ChunkBuffer) -> Result<(), LumenError> {
        self.write_raw_chunk(tag.raw(), body.as_bytes())
    }

    /// Append a chunk with a raw tag id and payload.
    pub fn write_raw_chunk(&mut self, tag: u32, payload: &[u8]) -> Result<(), LumenError> {
        if payload.len() % 4 != 0 {
            return Err(LumenError::unencodable(format!(
                "chunk 0x{tag:X} body of {} bytes is not word-aligned",
                payload.len()
            )));
        }
        self.write_header(tag, payload.len() / 4)?;
        self.write_bytes(payload);
        Ok(())
    }

    /// Append an opaque block verbatim under its own tag.
    pub fn write_opaque(&mut self, block: &OpaqueBlock) -> Result<(), LumenError> {
        self.write_raw_chunk(block.tag(), block.payload())
    }

    /// Overwrite four bytes at `offset` with a big-endian i32.
    pub fn patch_i32(&mut self, offset: usize, v: i32) -> Result<(), LumenError> {
        let len = self.bytes.len();
        let slot = self.bytes.get_mut(offset..offset + 4).ok_or_else(|| {
            LumenError::unencodable(format!("patch at {offset} past end of {len}-byte buffer"))
        })?;
        slot.copy_from_slice(&v.to_be_bytes());
        Ok(())
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
