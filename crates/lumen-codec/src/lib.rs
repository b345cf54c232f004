//! Decoder and encoder for Lumen vector-animation containers.
//!
//! A container is a fixed 16-word header followed by `{tag, words}` chunks
//! and closed by an end chunk. Tables, shapes, sprites and text fields are
//! decoded into a [`lumen_core::Document`]; script data, properties and the
//! unidentified sections are carried through byte-for-byte.
//!
//! # Architecture
//!
//! - [`ByteCursor`] and [`ChunkBuffer`] handle the primitive wire types
//! - [`registry`] maps tag ids to [`SectionDecoder`]s and holds the
//!   [`DispatchPolicy`] rules
//! - [`geometry`] and [`sprite`] decode the nested record grammars
//! - [`Decoder`] runs the top-level loop, [`Encoder`] writes sections in
//!   their fixed order
//! - [`DecodeObserver`] receives structured events; decoding itself never
//!   prints or logs
//!
//! # Format
//!
//! ```text
//! [header: 16 x i32]
//! [Symbols] [Colors] [Transforms] [Positions] [Bounds] [ActionScript]
//! [TextureAtlases] [F008] [F009] [F00A] [000A] [F00B] [Properties] [F00D]
//! [Shape + Graphics]* [Graphic]* [Sprite + timeline]* [DynamicText]*
//! [Metadata]? [End]
//! ```
//!
//! Integers are big-endian; chunk sizes count 32-bit words.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod observer;
pub mod registry;
pub mod sections;
pub mod sprite;

use std::io::{Read, Write};

use lumen_core::Document;

pub use buffer::ChunkBuffer;
pub use config::{ColorScale, DecodeConfig, EncodeConfig};
pub use cursor::ByteCursor;
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::LumenError;
pub use observer::{DecodeEvent, DecodeObserver, LogObserver};
pub use registry::{
    decoder_for, route, ChunkHeader, DecodeContext, DispatchPolicy, Route, Section, SectionDecoder,
};

/// Decode a container with default settings.
pub fn decode(data: &[u8]) -> Result<Document, LumenError> {
    Decoder::default().decode(data)
}

/// Decode a container with explicit settings and an observer.
pub fn decode_with(
    data: &[u8],
    config: &DecodeConfig,
    observer: &mut dyn DecodeObserver,
) -> Result<Document, LumenError> {
    Decoder::new(config.clone()).decode_observed(data, observer)
}

/// Read a whole stream, then decode it with default settings.
pub fn decode_from_reader<R: Read>(reader: R) -> Result<Document, LumenError> {
    Decoder::default().decode_reader(reader)
}

/// Encode a document with default settings.
pub fn encode(doc: &Document) -> Result<Vec<u8>, LumenError> {
    Encoder::default().encode(doc)
}

/// Encode a document with explicit settings.
pub fn encode_with(doc: &Document, config: &EncodeConfig) -> Result<Vec<u8>, LumenError> {
    Encoder::new(config.clone()).encode(doc)
}

/// Encode a document into `writer`.
pub fn encode_to_writer<W: Write>(
    doc: &Document,
    config: &EncodeConfig,
    writer: W,
) -> Result<(), LumenError> {
    Encoder::new(config.clone()).encode_to_writer(doc, writer)
}
