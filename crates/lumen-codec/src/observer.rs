//! Structured decode events and the observers that receive them.
//!
//! Decoding itself has no side effects; anything a caller wants to print or
//! collect comes through a [`DecodeObserver`].

use lumen_core::{OpaqueKind, TagType};

/// Something notable that happened during a decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A top-level chunk header was read.
    ChunkStart {
        /// Raw tag id.
        tag: u32,
        /// Offset of the header.
        offset: usize,
        /// Declared size in words.
        words: u32,
    },
    /// An opaque section was captured.
    OpaqueCaptured {
        /// Which section.
        kind: OpaqueKind,
        /// Payload length in bytes.
        bytes: usize,
    },
    /// An opaque section appeared again; the later one replaced the earlier.
    OpaqueReplaced {
        /// Which section.
        kind: OpaqueKind,
        /// Offset of the replacing chunk header.
        offset: usize,
    },
    /// A frame child with an unexpected id was skipped.
    ChildSkipped {
        /// Raw tag id.
        tag: u32,
        /// Offset of the child header.
        offset: usize,
        /// Declared size in words.
        words: u32,
    },
    /// The terminator chunk was reached.
    Terminated {
        /// Offset of the terminator header.
        offset: usize,
    },
}

/// Receives decode events.
pub trait DecodeObserver {
    /// Called once per event, in stream order.
    fn on_event(&mut self, event: &DecodeEvent);
}

/// Discards everything.
impl DecodeObserver for () {
    fn on_event(&mut self, _event: &DecodeEvent) {}
}

/// Records every event.
impl DecodeObserver for Vec<DecodeEvent> {
    fn on_event(&mut self, event: &DecodeEvent) {
        self.push(event.clone());
    }
}

/// Forwards events to the `log` facade.
///
/// Chunk starts go to `trace`, captures and the terminator to `debug`,
/// replacements and skips to `warn`.
#[derive(Clone, Copy, Debug)]
pub struct LogObserver {
    target: &'static str,
}

impl LogObserver {
    /// Log target used by [`LogObserver::default`].
    pub const DEFAULT_TARGET: &'static str = "lumen::decode";

    /// Log under a custom target.
    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::with_target(Self::DEFAULT_TARGET)
    }
}

impl DecodeObserver for LogObserver {
    fn on_event(&mut self, event: &DecodeEvent) {
        let target = self.target;
        match *event {
            DecodeEvent::ChunkStart { tag, offset, words } => {
                log::trace!(target: target, "chunk {} ({words} words) @ 0x{offset:X}", tag_name(tag));
            }
            DecodeEvent::OpaqueCaptured { kind, bytes } => {
                log::debug!(target: target, "captured {kind}: {bytes} bytes");
            }
            DecodeEvent::OpaqueReplaced { kind, offset } => {
                log::warn!(target: target, "duplicate {kind} @ 0x{offset:X} replaces earlier block");
            }
            DecodeEvent::ChildSkipped { tag, offset, words } => {
                log::warn!(
                    target: target,
                    "skipped frame child {} ({words} words) @ 0x{offset:X}",
                    tag_name(tag)
                );
            }
            DecodeEvent::Terminated { offset } => {
                log::debug!(target: target, "end of container @ 0x{offset:X}");
            }
        }
    }
}

fn tag_name(raw: u32) -> String {
    match TagType::from_raw(raw) {
        Some(tag) => tag.to_string(),
        None => format!("0x{raw:04X}"),
    }
}
