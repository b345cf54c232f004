//! Error types for decoding and encoding.

use std::fmt;
use std::io;

use lumen_core::TagType;

/// Errors that can occur while decoding or encoding a container.
///
/// Decoding never returns a partial document: any of these aborts the
/// whole call.
#[derive(Debug)]
pub enum LumenError {
    /// An I/O error from a reader or writer entry point.
    Io(io::Error),
    /// The byte stream is structurally invalid (tag id 0 where a chunk is
    /// expected, negative counts, bad presence flags, and similar).
    MalformedContainer {
        /// Byte offset where the problem was detected.
        offset: usize,
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A chunk id with no decoder and no opaque fallback.
    UnsupportedTag {
        /// The raw tag id.
        tag: u32,
        /// Byte offset of the chunk header.
        offset: usize,
    },
    /// A read or skip would pass the end of the buffer.
    BoundsViolation {
        /// Cursor position at the time of the request.
        offset: usize,
        /// Bytes requested.
        requested: usize,
        /// Bytes remaining.
        available: usize,
    },
    /// An opaque section required for encoding is absent.
    MissingSection {
        /// Tag of the missing section.
        tag: TagType,
    },
    /// A value does not fit the wire field it must be written to.
    Unencodable {
        /// Human-readable description of the value.
        detail: String,
    },
}

impl LumenError {
    pub(crate) fn malformed(offset: usize, detail: impl Into<String>) -> Self {
        Self::MalformedContainer {
            offset,
            detail: detail.into(),
        }
    }

    pub(crate) fn unencodable(detail: impl Into<String>) -> Self {
        Self::Unencodable {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for LumenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MalformedContainer { offset, detail } => {
                write!(f, "malformed container at 0x{offset:X}: {detail}")
            }
            Self::UnsupportedTag { tag, offset } => {
                write!(f, "unsupported chunk id 0x{tag:X} at 0x{offset:X}")
            }
            Self::BoundsViolation {
                offset,
                requested,
                available,
            } => {
                write!(
                    f,
                    "read past end of buffer at 0x{offset:X}: \
                     requested {requested} bytes, {available} available"
                )
            }
            Self::MissingSection { tag } => write!(f, "missing section {tag}"),
            Self::Unencodable { detail } => write!(f, "cannot encode: {detail}"),
        }
    }
}

impl std::error::Error for LumenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LumenError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
