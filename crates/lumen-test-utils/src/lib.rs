//! Test fixtures for Lumen development.
//!
//! - [`fixtures`] builds in-memory documents, from the smallest encodable
//!   one up to a sample that touches every section.
//! - [`raw`] assembles container bytes by hand, independent of the codec,
//!   so tests can feed it streams the encoder would never produce.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod raw;

pub use fixtures::{minimal_document, opaque_payload, sample_document, SAMPLE_MAGIC};
pub use raw::RawContainer;
