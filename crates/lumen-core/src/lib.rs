//! Data model for Lumen vector-animation containers.
//!
//! This is the leaf crate of the Lumen workspace. It holds the in-memory
//! form of a container and the closed set of chunk tags, with no I/O.
//! Decoding and encoding live in `lumen-codec`.
//!
//! Records refer to each other by position (an index into a
//! [`Document`] table), never by value, so every collection here is an
//! order-preserving list.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod document;
pub mod error;
pub mod opaque;
pub mod shape;
pub mod sprite;
pub mod table;
pub mod tag;
pub mod text;

pub use document::{Document, Header, Metadata, HEADER_WORDS};
pub use error::ModelError;
pub use opaque::OpaqueBlock;
pub use shape::{Graphic, Shape, Vertex};
pub use sprite::{Action, Deletion, Frame, FrameChild, FrameChildren, Label, Placement, Sprite};
pub use table::{Bounds, Color, Position, TextureAtlas, Transform};
pub use tag::{OpaqueKind, TagType};
pub use text::{Alignment, DynamicText};
