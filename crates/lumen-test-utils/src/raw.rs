//! Hand-assembled container bytes.
//!
//! Writes big-endian words directly so tests can build streams the encoder
//! refuses to produce: zero tag ids, unregistered tags, truncated chunks,
//! stray frame children.

/// Builder for raw container bytes.
#[derive(Clone, Debug, Default)]
pub struct RawContainer {
    bytes: Vec<u8>,
}

impl RawContainer {
    /// Start with a 16-word header: `magic` in word 0, `filesize` in word 7,
    /// zeros elsewhere.
    pub fn with_header(magic: i32, filesize: i32) -> Self {
        let mut raw = Self::default();
        for word in 0..16 {
            let v = match word {
                0 => magic,
                7 => filesize,
                _ => 0,
            };
            raw.word(v);
        }
        raw
    }

    /// Append a big-endian i32.
    pub fn word(&mut self, v: i32) -> &mut Self {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Append a big-endian u32.
    pub fn uword(&mut self, v: u32) -> &mut Self {
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Append raw bytes.
    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(data);
        self
    }

    /// Append a chunk header with an explicit word count.
    pub fn header(&mut self, tag: u32, words: u32) -> &mut Self {
        self.uword(tag).uword(words)
    }

    /// Append a chunk whose word count is derived from `payload`.
    ///
    /// # Panics
    ///
    /// If `payload` is not a whole number of words.
    pub fn chunk(&mut self, tag: u32, payload: &[u8]) -> &mut Self {
        assert_eq!(payload.len() % 4, 0, "chunk payload must be word-aligned");
        self.header(tag, (payload.len() / 4) as u32).bytes(payload)
    }

    /// Append a chunk made of i32 words.
    pub fn chunk_words(&mut self, tag: u32, words: &[i32]) -> &mut Self {
        self.header(tag, words.len() as u32);
        for &w in words {
            self.word(w);
        }
        self
    }

    /// Append the terminator.
    pub fn end(&mut self) -> &mut Self {
        self.header(0xFF00, 0)
    }

    /// Current length; the offset the next append will land at.
    pub fn offset(&self) -> usize {
        self.bytes.len()
    }

    /// Take the bytes.
    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}
