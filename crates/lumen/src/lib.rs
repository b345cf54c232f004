//! Lumen: decode and re-encode chunked vector-animation containers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Lumen sub-crates. For most users, adding `lumen` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use lumen::prelude::*;
//!
//! let mut doc = Document::new();
//! doc.symbols.push("root".into());
//! doc.colors.push(Color::new(1.0, 0.5, 0.25, 1.0));
//! doc.fill_missing_opaque();
//!
//! let bytes = lumen::encode(&doc).unwrap();
//!
//! let mut events: Vec<DecodeEvent> = Vec::new();
//! let back = lumen::decode_with(&bytes, &DecodeConfig::default(), &mut events).unwrap();
//! assert_eq!(back, doc);
//! assert!(matches!(events.last(), Some(DecodeEvent::Terminated { .. })));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`model`] | `lumen-core` | `Document`, tables, shapes, sprites, tag ids |
//! | [`codec`] | `lumen-codec` | Decoder, encoder, configuration, errors, observers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// In-memory container model (`lumen-core`).
///
/// [`model::Document`] is the root; every other record is reached from it.
pub use lumen_core as model;

/// Binary decoding and encoding (`lumen-codec`).
///
/// [`codec::Decoder`] and [`codec::Encoder`] carry configuration for
/// repeated use; the free functions re-exported at the crate root use
/// defaults.
pub use lumen_codec as codec;

pub use lumen_codec::{
    decode, decode_from_reader, decode_with, encode, encode_to_writer, encode_with,
};

/// Common imports for typical Lumen usage.
///
/// ```rust
/// use lumen::prelude::*;
/// ```
pub mod prelude {
    // Model
    pub use lumen_core::{
        Alignment, Bounds, Color, Document, DynamicText, Frame, FrameChild, Graphic, Header,
        Metadata, OpaqueBlock, OpaqueKind, Position, Shape, Sprite, TagType, TextureAtlas,
        Transform, Vertex,
    };

    // Codec
    pub use lumen_codec::{
        ColorScale, DecodeConfig, DecodeEvent, DecodeObserver, Decoder, EncodeConfig, Encoder,
        LogObserver, LumenError,
    };
}
