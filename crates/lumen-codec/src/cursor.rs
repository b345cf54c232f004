//! Bounds-checked positional reader over an immutable byte slice.
//!
//! All integers are big-endian. Floats are stored with their four bytes
//! reversed relative to the host's little-endian IEEE-754 layout, which
//! composes to plain big-endian single precision.

use crate::error::LumenError;

/// A read position over a borrowed buffer.
///
/// Every read checks bounds first and fails with
/// [`LumenError::BoundsViolation`] without moving the cursor.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Start reading at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when nothing is left to read.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], LumenError> {
        if n > self.remaining() {
            return Err(LumenError::BoundsViolation {
                offset: self.pos,
                requested: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], LumenError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, LumenError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16, LumenError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, LumenError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, LumenError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, LumenError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    /// Read a float stored byte-reversed.
    pub fn read_f32(&mut self) -> Result<f32, LumenError> {
        let mut bytes: [u8; 4] = self.take_array()?;
        bytes.reverse();
        Ok(f32::from_le_bytes(bytes))
    }

    /// Read a non-negative i32 count as `usize`.
    pub fn read_count(&mut self, what: &str) -> Result<usize, LumenError> {
        let offset = self.pos;
        let raw = self.read_i32()?;
        usize::try_from(raw)
            .map_err(|_| LumenError::malformed(offset, format!("negative {what} count {raw}")))
    }

    /// Copy the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, LumenError> {
        Ok(self.take(n)?.to_vec())
    }

    /// Read a NUL-terminated string at the current position, consuming the
    /// terminator. Bytes map one-to-one onto chars (Latin-1).
    pub fn read_cstr(&mut self) -> Result<String, LumenError> {
        let len = self.cstr_len(self.pos)?;
        let text = latin1(self.take(len)?);
        self.pos += 1;
        Ok(text)
    }

    /// Read a NUL-terminated string at an absolute offset without moving
    /// the cursor.
    pub fn read_cstr_at(&self, offset: usize) -> Result<String, LumenError> {
        let len = self.cstr_len(offset)?;
        Ok(latin1(&self.data[offset..offset + len]))
    }

    fn cstr_len(&self, offset: usize) -> Result<usize, LumenError> {
        let tail = self.data.get(offset..).unwrap_or(&[]);
        tail.iter()
            .position(|&b| b == 0)
            .ok_or(LumenError::BoundsViolation {
                offset,
                requested: tail.len() + 1,
                available: tail.len(),
            })
    }

    /// Advance by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), LumenError> {
        self.take(n).map(|_| ())
    }

    /// Advance until `position() - origin` is a multiple of `align`.
    pub fn align_from(&mut self, origin: usize, align: usize) -> Result<(), LumenError> {
        let misalign = (self.pos - origin) % align;
        if misalign != 0 {
            self.skip(align - misalign)?;
        }
        Ok(())
    }

    /// A `Vec` capacity for `count` records of at least `record_bytes` each,
    /// clamped to what the remaining input could possibly hold.
    pub fn capacity_hint(&self, count: usize, record_bytes: usize) -> usize {
        count.min(self.remaining() / record_bytes.max(1))
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
