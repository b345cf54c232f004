//! Document serialization in the fixed section order.

use std::io::Write;

use lumen_core::{Document, Header, OpaqueKind, TagType};

use crate::buffer::ChunkBuffer;
use crate::config::EncodeConfig;
use crate::error::LumenError;
use crate::geometry::{encode_graphic, encode_shape};
use crate::sections::{
    encode_atlases, encode_bounds, encode_colors, encode_metadata, encode_positions,
    encode_symbols, encode_text, encode_transforms,
};
use crate::sprite::encode_sprite;

/// Encodes documents with a fixed configuration.
///
/// # Examples
///
/// ```
/// use lumen_codec::{Decoder, Encoder, EncodeConfig};
/// use lumen_core::Document;
///
/// let mut doc = Document::new();
/// doc.symbols.push("root".into());
/// doc.fill_missing_opaque();
///
/// let encoder = Encoder::new(EncodeConfig {
///     recompute_filesize: true,
///     ..EncodeConfig::default()
/// });
/// let bytes = encoder.encode(&doc).unwrap();
/// assert_eq!(bytes.len() % 4, 0);
///
/// let back = Decoder::default().decode(&bytes).unwrap();
/// assert_eq!(back.symbols, doc.symbols);
/// assert_eq!(back.header.filesize as usize, bytes.len());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    config: EncodeConfig,
}

impl Encoder {
    /// An encoder with the given settings.
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Serialize a document.
    ///
    /// Every [`OpaqueKind`] must be present in `doc.opaque`; the first
    /// absent one is reported as [`LumenError::MissingSection`].
    /// [`Document::fill_missing_opaque`] supplies empty blocks.
    pub fn encode(&self, doc: &Document) -> Result<Vec<u8>, LumenError> {
        if let Some(kind) = doc.missing_opaque().first() {
            return Err(LumenError::MissingSection { tag: kind.tag() });
        }

        let mut out = ChunkBuffer::with_capacity(4096);
        for word in doc.header.to_words() {
            out.write_i32(word);
        }

        encode_symbols(&mut out, &doc.symbols)?;
        encode_colors(&mut out, &doc.colors, self.config.color_scale)?;
        encode_transforms(&mut out, &doc.transforms)?;
        encode_positions(&mut out, &doc.positions)?;
        encode_bounds(&mut out, &doc.bounds)?;

        // ActionScript sits between the bounds and the atlases.
        let kinds = OpaqueKind::ALL;
        let (script, rest) = kinds.split_at(1);
        encode_opaque(&mut out, doc, script)?;
        encode_atlases(&mut out, &doc.atlases)?;
        encode_opaque(&mut out, doc, rest)?;

        for shape in &doc.shapes {
            encode_shape(&mut out, shape)?;
        }
        for graphic in &doc.graphics {
            encode_graphic(&mut out, graphic)?;
        }
        for sprite in &doc.sprites {
            encode_sprite(&mut out, sprite)?;
        }
        for text in &doc.texts {
            encode_text(&mut out, text)?;
        }
        if self.config.emit_metadata {
            encode_metadata(&mut out, &doc.metadata)?;
        }

        out.write_header(TagType::End.raw(), 0)?;
        out.pad_to_word();

        if self.config.recompute_filesize {
            let len = i32::try_from(out.len()).map_err(|_| {
                LumenError::unencodable(format!("container of {} bytes", out.len()))
            })?;
            out.patch_i32(Header::FILESIZE_WORD * 4, len)?;
        }

        log::debug!(
            target: "lumen::encode",
            "encoded {} bytes: {} symbols, {} shapes, {} sprites, {} texts",
            out.len(),
            doc.symbols.len(),
            doc.shapes.len(),
            doc.sprites.len(),
            doc.texts.len()
        );
        Ok(out.into_bytes())
    }

    /// Serialize a document into `writer`.
    pub fn encode_to_writer<W: Write>(&self, doc: &Document, mut writer: W) -> Result<(), LumenError> {
        let bytes = self.encode(doc)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

fn encode_opaque(
    out: &mut ChunkBuffer,
    doc: &Document,
    kinds: &[OpaqueKind],
) -> Result<(), LumenError> {
    for &kind in kinds {
        let block = doc
            .opaque(kind)
            .ok_or(LumenError::MissingSection { tag: kind.tag() })?;
        if block.tag() != kind.tag().raw() {
            return Err(LumenError::unencodable(format!(
                "{kind:?} slot holds a block tagged 0x{:X}",
                block.tag()
            )));
        }
        out.write_opaque(block)?;
    }
    Ok(())
}
