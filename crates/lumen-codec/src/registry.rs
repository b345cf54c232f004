//! Chunk routing: which decoder handles which tag id.
//!
//! Every modeled top-level tag has a [`SectionDecoder`] registered through
//! [`decoder_for`]. [`route`] classifies a raw id into a decoder, an opaque
//! capture, the terminator, or a rejection, and [`DispatchPolicy`] decides
//! what a rejection means for the loop that hit it.

use lumen_core::{
    Bounds, Color, Document, DynamicText, Graphic, Metadata, OpaqueBlock, OpaqueKind, Position,
    Shape, Sprite, TagType, TextureAtlas, Transform,
};

use crate::config::DecodeConfig;
use crate::cursor::ByteCursor;
use crate::error::LumenError;
use crate::geometry::{GraphicDecoder, ShapeDecoder};
use crate::observer::{DecodeEvent, DecodeObserver};
use crate::sections::{
    AtlasesDecoder, BoundsDecoder, ColorsDecoder, MetadataDecoder, PositionsDecoder,
    SymbolsDecoder, TextDecoder, TransformsDecoder,
};
use crate::sprite::SpriteDecoder;

/// A `{tag, words}` chunk header and where it was read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Raw tag id.
    pub tag: u32,
    /// Declared payload size in 32-bit words.
    pub words: u32,
    /// Offset of the header's first byte.
    pub offset: usize,
}

impl ChunkHeader {
    /// Encoded size of a header.
    pub const SIZE: usize = 8;

    /// Read a header at the cursor.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, LumenError> {
        let offset = cursor.position();
        let tag = cursor.read_u32()?;
        let words = cursor.read_u32()?;
        Ok(Self { tag, words, offset })
    }

    /// The registered tag, if any.
    pub fn tag_type(&self) -> Option<TagType> {
        TagType::from_raw(self.tag)
    }

    /// Declared payload size in bytes.
    pub fn byte_len(&self) -> usize {
        (self.words as usize).saturating_mul(4)
    }

    /// Offset of the first payload byte.
    pub fn payload_offset(&self) -> usize {
        self.offset + Self::SIZE
    }

    /// Offset just past the declared payload.
    pub fn payload_end(&self) -> usize {
        self.payload_offset().saturating_add(self.byte_len())
    }

    /// Check that a decoder stopped exactly at the declared payload end.
    ///
    /// For chunks that own trailing siblings (shapes, sprites, frames,
    /// placements) call this after the fixed part, before the siblings.
    pub fn expect_end(&self, cursor: &ByteCursor<'_>) -> Result<(), LumenError> {
        let at = cursor.position();
        if at == self.payload_end() {
            return Ok(());
        }
        Err(LumenError::malformed(
            self.offset,
            format!(
                "chunk id 0x{:X} declares {} payload bytes but its body is {}",
                self.tag,
                self.byte_len(),
                at.saturating_sub(self.payload_offset())
            ),
        ))
    }
}

/// Per-decode state shared with section decoders.
pub struct DecodeContext<'a> {
    config: &'a DecodeConfig,
    observer: &'a mut dyn DecodeObserver,
}

impl<'a> DecodeContext<'a> {
    /// Bundle a configuration and an observer.
    pub fn new(config: &'a DecodeConfig, observer: &'a mut dyn DecodeObserver) -> Self {
        Self { config, observer }
    }

    /// Active decoder settings.
    pub fn config(&self) -> &DecodeConfig {
        self.config
    }

    /// Forward an event to the observer.
    pub fn emit(&mut self, event: DecodeEvent) {
        self.observer.on_event(&event);
    }
}

/// The result of decoding one top-level chunk.
#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    /// Symbol table entries.
    Symbols(Vec<String>),
    /// Color table entries.
    Colors(Vec<Color>),
    /// Transform table entries.
    Transforms(Vec<Transform>),
    /// Position table entries.
    Positions(Vec<Position>),
    /// Bounds table entries.
    Bounds(Vec<Bounds>),
    /// Texture atlas entries.
    Atlases(Vec<TextureAtlas>),
    /// One shape with its graphics.
    Shape(Shape),
    /// A graphic outside any shape.
    Graphic(Graphic),
    /// One dynamic text field.
    Text(DynamicText),
    /// One sprite.
    Sprite(Sprite),
    /// Version stamp.
    Metadata(Metadata),
}

impl Section {
    /// Merge into a document. Table sections append, so a table split over
    /// several chunks keeps global index order.
    pub fn apply(self, doc: &mut Document) {
        match self {
            Self::Symbols(v) => doc.symbols.extend(v),
            Self::Colors(v) => doc.colors.extend(v),
            Self::Transforms(v) => doc.transforms.extend(v),
            Self::Positions(v) => doc.positions.extend(v),
            Self::Bounds(v) => doc.bounds.extend(v),
            Self::Atlases(v) => doc.atlases.extend(v),
            Self::Shape(shape) => doc.shapes.push(shape),
            Self::Graphic(graphic) => doc.graphics.push(graphic),
            Self::Text(text) => doc.texts.push(text),
            Self::Sprite(sprite) => doc.sprites.push(sprite),
            Self::Metadata(metadata) => doc.metadata = metadata,
        }
    }
}

/// Decodes the payload of one modeled top-level chunk.
///
/// Called with the cursor just past the chunk header. Decoders that own
/// nested chunks (shapes, sprites) consume those too.
pub trait SectionDecoder {
    /// The tag this decoder is registered for.
    fn tag(&self) -> TagType;

    /// Decode the chunk body.
    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError>;
}

/// The decoder registered for `tag`, if it is a modeled top-level tag.
pub fn decoder_for(tag: TagType) -> Option<&'static dyn SectionDecoder> {
    let decoder: &'static dyn SectionDecoder = match tag {
        TagType::Symbols => &SymbolsDecoder,
        TagType::Colors => &ColorsDecoder,
        TagType::Transforms => &TransformsDecoder,
        TagType::Positions => &PositionsDecoder,
        TagType::Bounds => &BoundsDecoder,
        TagType::TextureAtlases => &AtlasesDecoder,
        TagType::Shape => &ShapeDecoder,
        TagType::Graphic => &GraphicDecoder,
        TagType::DefineEditText => &TextDecoder,
        TagType::DefineSprite => &SpriteDecoder,
        TagType::Metadata => &MetadataDecoder,
        _ => return None,
    };
    Some(decoder)
}

/// How the top-level loop treats a tag id.
#[derive(Clone, Copy)]
pub enum Route {
    /// Decode with a registered section decoder.
    Section(&'static dyn SectionDecoder),
    /// Capture the payload verbatim.
    Opaque(OpaqueKind),
    /// Stop decoding.
    End,
    /// Id 0: the stream is corrupt.
    Invalid,
    /// Unregistered, or only valid nested inside another chunk.
    Unsupported,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Section(decoder) => f.debug_tuple("Section").field(&decoder.tag()).finish(),
            Self::Opaque(kind) => f.debug_tuple("Opaque").field(kind).finish(),
            Self::End => f.write_str("End"),
            Self::Invalid => f.write_str("Invalid"),
            Self::Unsupported => f.write_str("Unsupported"),
        }
    }
}

/// Classify a raw top-level tag id.
pub fn route(raw: u32) -> Route {
    let Some(tag) = TagType::from_raw(raw) else {
        return Route::Unsupported;
    };
    match tag {
        TagType::Invalid => Route::Invalid,
        TagType::End => Route::End,
        _ => {
            if let Some(kind) = tag.opaque_kind() {
                Route::Opaque(kind)
            } else if let Some(decoder) = decoder_for(tag) {
                Route::Section(decoder)
            } else {
                Route::Unsupported
            }
        }
    }
}

/// What a decode loop does with a chunk it has no handler for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Fail with [`LumenError::UnsupportedTag`]. Used for top-level chunks.
    Strict,
    /// Skip the declared payload and emit [`DecodeEvent::ChildSkipped`].
    /// Used for frame children.
    Lenient,
}

impl DispatchPolicy {
    /// Handle an unrecognized chunk whose header has just been read.
    pub fn reject(
        self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<(), LumenError> {
        match self {
            Self::Strict => Err(LumenError::UnsupportedTag {
                tag: header.tag,
                offset: header.offset,
            }),
            Self::Lenient => {
                cursor.skip(header.byte_len())?;
                ctx.emit(DecodeEvent::ChildSkipped {
                    tag: header.tag,
                    offset: header.offset,
                    words: header.words,
                });
                Ok(())
            }
        }
    }
}

/// Read a header plus its declared payload as an opaque block.
pub(crate) fn read_opaque_chunk(cursor: &mut ByteCursor<'_>) -> Result<OpaqueBlock, LumenError> {
    let header = ChunkHeader::read(cursor)?;
    read_opaque_body(cursor, header)
}

/// Read the payload of an already-read header as an opaque block.
pub(crate) fn read_opaque_body(
    cursor: &mut ByteCursor<'_>,
    header: ChunkHeader,
) -> Result<OpaqueBlock, LumenError> {
    let payload = cursor.read_bytes(header.byte_len())?;
    OpaqueBlock::new(header.tag, payload)
        .map_err(|e| LumenError::malformed(header.offset, e.to_string()))
}

/// Read a nested chunk header and check its tag.
pub(crate) fn expect_header(
    cursor: &mut ByteCursor<'_>,
    expected: TagType,
) -> Result<ChunkHeader, LumenError> {
    let header = ChunkHeader::read(cursor)?;
    if header.tag != expected.raw() {
        return Err(LumenError::malformed(
            header.offset,
            format!("expected {expected}, found chunk id 0x{:X}", header.tag),
        ));
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_modeled_decoder_reports_its_own_tag() {
        for tag in TagType::ALL {
            if let Some(decoder) = decoder_for(tag) {
                assert_eq!(decoder.tag(), tag);
            }
        }
    }

    #[test]
    fn routes() {
        assert!(matches!(route(0), Route::Invalid));
        assert!(matches!(route(0xFF00), Route::End));
        assert!(matches!(route(0xF00C), Route::Opaque(OpaqueKind::Properties)));
        assert!(matches!(route(0x000A), Route::Opaque(OpaqueKind::Unk000A)));
        assert!(matches!(route(0xF022), Route::Section(_)));
        assert!(matches!(route(0x8000), Route::Section(_)));
        // Timeline tags are only legal inside sprites.
        for raw in [0x0001, 0x0004, 0x0005, 0x000C, 0x002B, 0xF105, 0xF037] {
            assert!(matches!(route(raw), Route::Unsupported), "0x{raw:X}");
        }
        assert!(matches!(route(0xF014), Route::Unsupported));
    }

    #[test]
    fn strict_rejection_reports_header_offset() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data);
        let config = DecodeConfig::default();
        let mut observer = ();
        let mut ctx = DecodeContext::new(&config, &mut observer);
        let header = ChunkHeader {
            tag: 0xF014,
            words: 2,
            offset: 0x40,
        };
        match DispatchPolicy::Strict.reject(&mut cursor, header, &mut ctx) {
            Err(LumenError::UnsupportedTag { tag, offset }) => {
                assert_eq!((tag, offset), (0xF014, 0x40));
            }
            other => panic!("expected UnsupportedTag, got {other:?}"),
        }
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn lenient_rejection_skips_payload() {
        let data = [0u8; 12];
        let mut cursor = ByteCursor::new(&data);
        let config = DecodeConfig::default();
        let mut events: Vec<DecodeEvent> = Vec::new();
        let mut ctx = DecodeContext::new(&config, &mut events);
        let header = ChunkHeader {
            tag: 0x99,
            words: 2,
            offset: 0,
        };
        DispatchPolicy::Lenient
            .reject(&mut cursor, header, &mut ctx)
            .unwrap();
        assert_eq!(cursor.position(), 8);
        assert_eq!(
            events,
            vec![DecodeEvent::ChildSkipped {
                tag: 0x99,
                offset: 0,
                words: 2
            }]
        );
    }

    #[test]
    fn lenient_rejection_past_end_fails() {
        let data = [0u8; 4];
        let mut cursor = ByteCursor::new(&data);
        let config = DecodeConfig::default();
        let mut observer = ();
        let mut ctx = DecodeContext::new(&config, &mut observer);
        let header = ChunkHeader {
            tag: 0x99,
            words: 2,
            offset: 0,
        };
        assert!(matches!(
            DispatchPolicy::Lenient.reject(&mut cursor, header, &mut ctx),
            Err(LumenError::BoundsViolation { .. })
        ));
    }

    #[test]
    fn nested_header_tag_is_checked() {
        let mut data = Vec::new();
        data.extend_from_slice(&0xF022u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            expect_header(&mut cursor, TagType::Graphic),
            Err(LumenError::MalformedContainer { offset: 0, .. })
        ));
    }

    #[test]
    fn declared_size_must_match_body() {
        let data = [0u8; 24];
        let mut cursor = ByteCursor::new(&data);
        let header = ChunkHeader {
            tag: 0xF002,
            words: 3,
            offset: 4,
        };
        assert_eq!(header.payload_end(), 24);
        cursor.skip(24).unwrap();
        assert!(header.expect_end(&cursor).is_ok());

        let mut short = ByteCursor::new(&data);
        short.skip(20).unwrap();
        assert!(matches!(
            header.expect_end(&short),
            Err(LumenError::MalformedContainer { offset: 4, .. })
        ));
    }

    #[test]
    fn sections_append_tables() {
        let mut doc = Document::new();
        Section::Symbols(vec!["a".into()]).apply(&mut doc);
        Section::Symbols(vec!["b".into()]).apply(&mut doc);
        assert_eq!(doc.symbols, vec!["a", "b"]);
    }
}
