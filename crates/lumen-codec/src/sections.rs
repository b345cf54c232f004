//! Flat sections: the symbol table, the fixed-record tables, dynamic text,
//! and the metadata stamp.

use lumen_core::{
    Alignment, Bounds, Color, DynamicText, Metadata, Position, TagType, TextureAtlas, Transform,
};

use crate::buffer::ChunkBuffer;
use crate::config::ColorScale;
use crate::cursor::ByteCursor;
use crate::error::LumenError;
use crate::registry::{ChunkHeader, DecodeContext, Section, SectionDecoder};

/// Symbol table (`0xF001`).
pub struct SymbolsDecoder;

impl SectionDecoder for SymbolsDecoder {
    fn tag(&self) -> TagType {
        TagType::Symbols
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let origin = cursor.position();
        let count = cursor.read_count("symbol")?;
        let mut symbols = Vec::with_capacity(cursor.capacity_hint(count, 8));
        for _ in 0..count {
            let len = cursor.read_count("symbol length")?;
            let at = cursor.position();
            let text = cursor.read_cstr()?;
            if ctx.config().check_symbol_lengths {
                // One char per wire byte.
                let wire_len = text.chars().count();
                if wire_len != len {
                    return Err(LumenError::malformed(
                        at,
                        format!("symbol length tag {len} but text is {wire_len} bytes"),
                    ));
                }
            }
            cursor.align_from(origin, 4)?;
            symbols.push(text);
        }
        header.expect_end(cursor)?;
        Ok(Section::Symbols(symbols))
    }
}

/// Write the symbol table chunk. Padding is relative to the payload start.
pub(crate) fn encode_symbols(out: &mut ChunkBuffer, symbols: &[String]) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::new();
    body.write_count(symbols.len(), "symbol")?;
    for symbol in symbols {
        let bytes = latin1_bytes(symbol)?;
        body.write_count(bytes.len(), "symbol length")?;
        body.write_bytes(&bytes);
        body.write_u8(0);
        body.pad_to_word();
    }
    out.write_chunk(TagType::Symbols, &body)
}

/// One byte per char. NUL terminates on the wire, so it cannot appear inside.
fn latin1_bytes(text: &str) -> Result<Vec<u8>, LumenError> {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(0) => Err(LumenError::unencodable(format!(
                "symbol {text:?} contains a NUL"
            ))),
            Ok(b) => Ok(b),
            Err(_) => Err(LumenError::unencodable(format!(
                "symbol {text:?} has char U+{:04X} outside Latin-1",
                u32::from(c)
            ))),
        })
        .collect()
}

/// Color table (`0xF002`).
pub struct ColorsDecoder;

impl SectionDecoder for ColorsDecoder {
    fn tag(&self) -> TagType {
        TagType::Colors
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let count = cursor.read_count("color")?;
        let mut colors = Vec::with_capacity(cursor.capacity_hint(count, 8));
        for _ in 0..count {
            let r = ColorScale::decode_channel(cursor.read_i16()?);
            let g = ColorScale::decode_channel(cursor.read_i16()?);
            let b = ColorScale::decode_channel(cursor.read_i16()?);
            let a = ColorScale::decode_channel(cursor.read_i16()?);
            colors.push(Color::new(r, g, b, a));
        }
        header.expect_end(cursor)?;
        Ok(Section::Colors(colors))
    }
}

pub(crate) fn encode_colors(
    out: &mut ChunkBuffer,
    colors: &[Color],
    scale: ColorScale,
) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(4 + colors.len() * 8);
    body.write_count(colors.len(), "color")?;
    for color in colors {
        for channel in color.channels() {
            body.write_i16(scale.encode_channel(channel));
        }
    }
    out.write_chunk(TagType::Colors, &body)
}

/// Transform table (`0xF003`).
pub struct TransformsDecoder;

impl SectionDecoder for TransformsDecoder {
    fn tag(&self) -> TagType {
        TagType::Transforms
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let count = cursor.read_count("transform")?;
        let mut transforms = Vec::with_capacity(cursor.capacity_hint(count, 24));
        for _ in 0..count {
            transforms.push(Transform {
                a: cursor.read_f32()?,
                b: cursor.read_f32()?,
                c: cursor.read_f32()?,
                d: cursor.read_f32()?,
                tx: cursor.read_f32()?,
                ty: cursor.read_f32()?,
            });
        }
        header.expect_end(cursor)?;
        Ok(Section::Transforms(transforms))
    }
}

pub(crate) fn encode_transforms(
    out: &mut ChunkBuffer,
    transforms: &[Transform],
) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(4 + transforms.len() * 24);
    body.write_count(transforms.len(), "transform")?;
    for transform in transforms {
        for v in transform.elements() {
            body.write_f32(v);
        }
    }
    out.write_chunk(TagType::Transforms, &body)
}

/// Position table (`0xF103`).
pub struct PositionsDecoder;

impl SectionDecoder for PositionsDecoder {
    fn tag(&self) -> TagType {
        TagType::Positions
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let count = cursor.read_count("position")?;
        let mut positions = Vec::with_capacity(cursor.capacity_hint(count, 8));
        for _ in 0..count {
            let x = cursor.read_f32()?;
            let y = cursor.read_f32()?;
            positions.push(Position::new(x, y));
        }
        header.expect_end(cursor)?;
        Ok(Section::Positions(positions))
    }
}

pub(crate) fn encode_positions(
    out: &mut ChunkBuffer,
    positions: &[Position],
) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(4 + positions.len() * 8);
    body.write_count(positions.len(), "position")?;
    for p in positions {
        body.write_f32(p.x);
        body.write_f32(p.y);
    }
    out.write_chunk(TagType::Positions, &body)
}

/// Bounds table (`0xF004`).
pub struct BoundsDecoder;

impl SectionDecoder for BoundsDecoder {
    fn tag(&self) -> TagType {
        TagType::Bounds
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let count = cursor.read_count("bounds")?;
        let mut bounds = Vec::with_capacity(cursor.capacity_hint(count, 16));
        for _ in 0..count {
            let left = cursor.read_f32()?;
            let top = cursor.read_f32()?;
            let right = cursor.read_f32()?;
            let bottom = cursor.read_f32()?;
            bounds.push(Bounds::new(left, top, right, bottom));
        }
        header.expect_end(cursor)?;
        Ok(Section::Bounds(bounds))
    }
}

pub(crate) fn encode_bounds(out: &mut ChunkBuffer, bounds: &[Bounds]) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(4 + bounds.len() * 16);
    body.write_count(bounds.len(), "bounds")?;
    for b in bounds {
        body.write_f32(b.left);
        body.write_f32(b.top);
        body.write_f32(b.right);
        body.write_f32(b.bottom);
    }
    out.write_chunk(TagType::Bounds, &body)
}

/// Texture atlas table (`0xF007`).
pub struct AtlasesDecoder;

impl SectionDecoder for AtlasesDecoder {
    fn tag(&self) -> TagType {
        TagType::TextureAtlases
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let count = cursor.read_count("atlas")?;
        let mut atlases = Vec::with_capacity(cursor.capacity_hint(count, 16));
        for _ in 0..count {
            atlases.push(TextureAtlas {
                id: cursor.read_i32()?,
                unknown: cursor.read_i32()?,
                width: cursor.read_f32()?,
                height: cursor.read_f32()?,
            });
        }
        header.expect_end(cursor)?;
        Ok(Section::Atlases(atlases))
    }
}

pub(crate) fn encode_atlases(
    out: &mut ChunkBuffer,
    atlases: &[TextureAtlas],
) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(4 + atlases.len() * 16);
    body.write_count(atlases.len(), "atlas")?;
    for atlas in atlases {
        body.write_i32(atlas.id);
        body.write_i32(atlas.unknown);
        body.write_f32(atlas.width);
        body.write_f32(atlas.height);
    }
    out.write_chunk(TagType::TextureAtlases, &body)
}

/// Dynamic text field (`0x0025`).
pub struct TextDecoder;

impl SectionDecoder for TextDecoder {
    fn tag(&self) -> TagType {
        TagType::DefineEditText
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let text = DynamicText {
            id: cursor.read_i32()?,
            unknown1: cursor.read_i32()?,
            placeholder_symbol: cursor.read_i32()?,
            unknown2: cursor.read_i32()?,
            color_index: cursor.read_i32()?,
            unknown3: cursor.read_i32()?,
            unknown4: cursor.read_i32()?,
            unknown5: cursor.read_i32()?,
            alignment: Alignment::from_raw(cursor.read_i16()?),
            unknown6: cursor.read_i16()?,
            unknown7: cursor.read_i32()?,
            unknown8: cursor.read_i32()?,
            size: cursor.read_f32()?,
            unknown9: cursor.read_i32()?,
            unknown10: cursor.read_i32()?,
            unknown11: cursor.read_i32()?,
            unknown12: cursor.read_i32()?,
        };
        header.expect_end(cursor)?;
        Ok(Section::Text(text))
    }
}

pub(crate) fn encode_text(out: &mut ChunkBuffer, text: &DynamicText) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(64);
    for v in [
        text.id,
        text.unknown1,
        text.placeholder_symbol,
        text.unknown2,
        text.color_index,
        text.unknown3,
        text.unknown4,
        text.unknown5,
    ] {
        body.write_i32(v);
    }
    body.write_i16(text.alignment.raw());
    body.write_i16(text.unknown6);
    body.write_i32(text.unknown7);
    body.write_i32(text.unknown8);
    body.write_f32(text.size);
    for v in [text.unknown9, text.unknown10, text.unknown11, text.unknown12] {
        body.write_i32(v);
    }
    out.write_chunk(TagType::DefineEditText, &body)
}

/// Version stamp (`0x8000`).
pub struct MetadataDecoder;

impl SectionDecoder for MetadataDecoder {
    fn tag(&self) -> TagType {
        TagType::Metadata
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let metadata = Metadata {
            major: cursor.read_i16()?,
            minor: cursor.read_i16()?,
            patch: cursor.read_i16()?,
            flag: cursor.read_i16()?,
        };
        header.expect_end(cursor)?;
        Ok(Section::Metadata(metadata))
    }
}

pub(crate) fn encode_metadata(out: &mut ChunkBuffer, meta: &Metadata) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(8);
    body.write_i16(meta.major);
    body.write_i16(meta.minor);
    body.write_i16(meta.patch);
    body.write_i16(meta.flag);
    out.write_chunk(TagType::Metadata, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use proptest::prelude::*;

    fn decode_one(decoder: &dyn SectionDecoder, chunk: &[u8]) -> Result<Section, LumenError> {
        decode_one_with(decoder, chunk, &DecodeConfig::default())
    }

    fn decode_one_with(
        decoder: &dyn SectionDecoder,
        chunk: &[u8],
        config: &DecodeConfig,
    ) -> Result<Section, LumenError> {
        let mut cursor = ByteCursor::new(chunk);
        let header = ChunkHeader::read(&mut cursor)?;
        assert_eq!(header.tag, decoder.tag().raw());
        let mut observer = ();
        let mut ctx = DecodeContext::new(config, &mut observer);
        let section = decoder.decode(&mut cursor, header, &mut ctx)?;
        assert!(cursor.is_at_end(), "decoder left {} bytes", cursor.remaining());
        Ok(section)
    }

    fn symbols_chunk(symbols: &[&str]) -> Vec<u8> {
        let owned: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        let mut out = ChunkBuffer::new();
        encode_symbols(&mut out, &owned).unwrap();
        out.into_bytes()
    }

    #[test]
    fn symbol_strings_pad_to_word_boundaries() {
        let bytes = symbols_chunk(&["a", "bb", "ccc"]);
        // count + 3 * (len word + one padded data word)
        assert_eq!(&bytes[4..8], &7u32.to_be_bytes());
        assert_eq!(&bytes[12..16], &1i32.to_be_bytes());
        assert_eq!(&bytes[16..20], b"a\0\0\0");
        assert_eq!(&bytes[24..28], b"bb\0\0");
        assert_eq!(&bytes[32..36], b"ccc\0");

        let section = decode_one(&SymbolsDecoder, &bytes).unwrap();
        assert_eq!(section, Section::Symbols(vec!["a".into(), "bb".into(), "ccc".into()]));
    }

    #[test]
    fn four_byte_symbol_gets_a_full_padding_word() {
        let bytes = symbols_chunk(&["dddd"]);
        assert_eq!(&bytes[16..24], b"dddd\0\0\0\0");
    }

    #[test]
    fn symbol_length_mismatch_is_malformed() {
        let mut bytes = symbols_chunk(&["abc"]);
        bytes[15] = 5;
        assert!(matches!(
            decode_one(&SymbolsDecoder, &bytes),
            Err(LumenError::MalformedContainer { offset: 16, .. })
        ));

        let relaxed = DecodeConfig {
            check_symbol_lengths: false,
        };
        let section = decode_one_with(&SymbolsDecoder, &bytes, &relaxed).unwrap();
        assert_eq!(section, Section::Symbols(vec!["abc".into()]));
    }

    #[test]
    fn latin1_symbols_round_trip() {
        let bytes = symbols_chunk(&["caf\u{e9}"]);
        assert_eq!(&bytes[12..16], &4i32.to_be_bytes());
        let section = decode_one(&SymbolsDecoder, &bytes).unwrap();
        assert_eq!(section, Section::Symbols(vec!["caf\u{e9}".into()]));
    }

    #[test]
    fn non_latin1_symbol_is_unencodable() {
        let mut out = ChunkBuffer::new();
        assert!(matches!(
            encode_symbols(&mut out, &["\u{3042}".to_string()]),
            Err(LumenError::Unencodable { .. })
        ));
    }

    #[test]
    fn symbol_with_interior_nul_is_unencodable() {
        let mut out = ChunkBuffer::new();
        assert!(matches!(
            encode_symbols(&mut out, &["a\0b".to_string()]),
            Err(LumenError::Unencodable { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn oversized_color_chunk_is_malformed() {
        // Declares 4 words; one color needs 3.
        let mut out = ChunkBuffer::new();
        let mut body = ChunkBuffer::new();
        body.write_i32(1);
        body.write_i16(256);
        body.write_i16(256);
        body.write_i16(256);
        body.write_i16(256);
        body.write_u32(0xFF00);
        out.write_chunk(TagType::Colors, &body).unwrap();
        assert!(matches!(
            decode_one(&ColorsDecoder, out.as_bytes()),
            Err(LumenError::MalformedContainer { offset: 0, .. })
        ));
    }

    #[test]
    fn undersized_text_chunk_is_malformed() {
        let mut out = ChunkBuffer::new();
        encode_text(&mut out, &DynamicText::default()).unwrap();
        let mut bytes = out.into_bytes();
        bytes[7] = 15;
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(
            decode_one(&TextDecoder, &bytes),
            Err(LumenError::BoundsViolation { .. })
        ));

        let mut out = ChunkBuffer::new();
        encode_text(&mut out, &DynamicText::default()).unwrap();
        let mut bytes = out.into_bytes();
        bytes[7] = 15;
        assert!(matches!(
            decode_one(&TextDecoder, &bytes),
            Err(LumenError::MalformedContainer { offset: 0, .. })
        ));
    }

    #[test]
    fn negative_table_count_is_malformed() {
        let mut out = ChunkBuffer::new();
        let mut body = ChunkBuffer::new();
        body.write_i32(-3);
        out.write_chunk(TagType::Colors, &body).unwrap();
        assert!(matches!(
            decode_one(&ColorsDecoder, out.as_bytes()),
            Err(LumenError::MalformedContainer { offset: 8, .. })
        ));
    }

    #[test]
    fn color_chunk_size_and_scale() {
        let mut out = ChunkBuffer::new();
        let colors = [Color::new(1.0, 2.0, 3.0, 4.0)];
        encode_colors(&mut out, &colors, ColorScale::Symmetric).unwrap();
        let bytes = out.into_bytes();
        assert_eq!(&bytes[4..8], &3u32.to_be_bytes());
        assert_eq!(&bytes[12..20], &[1, 0, 2, 0, 3, 0, 4, 0]);
        assert_eq!(
            decode_one(&ColorsDecoder, &bytes).unwrap(),
            Section::Colors(colors.to_vec())
        );

        let mut legacy = ChunkBuffer::new();
        encode_colors(&mut legacy, &colors, ColorScale::Legacy).unwrap();
        assert_eq!(&legacy.as_bytes()[12..14], &255i16.to_be_bytes());
    }

    #[test]
    fn table_chunk_sizes() {
        let mut out = ChunkBuffer::new();
        encode_transforms(&mut out, &[Transform::IDENTITY; 2]).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &13u32.to_be_bytes());

        let mut out = ChunkBuffer::new();
        encode_positions(&mut out, &[Position::new(1.0, 2.0)]).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &3u32.to_be_bytes());

        let mut out = ChunkBuffer::new();
        encode_bounds(&mut out, &[Bounds::default(); 3]).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &13u32.to_be_bytes());

        let mut out = ChunkBuffer::new();
        encode_atlases(&mut out, &[TextureAtlas::default()]).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &5u32.to_be_bytes());
    }

    #[test]
    fn transform_fields_in_order() {
        let t = Transform {
            a: 1.0,
            b: 2.0,
            c: 3.0,
            d: 4.0,
            tx: 5.0,
            ty: 6.0,
        };
        let mut out = ChunkBuffer::new();
        encode_transforms(&mut out, &[t]).unwrap();
        assert_eq!(&out.as_bytes()[12..16], &1.0f32.to_be_bytes());
        assert_eq!(&out.as_bytes()[32..36], &6.0f32.to_be_bytes());
        assert_eq!(
            decode_one(&TransformsDecoder, out.as_bytes()).unwrap(),
            Section::Transforms(vec![t])
        );
    }

    #[test]
    fn text_is_sixteen_words() {
        let text = DynamicText {
            id: 9,
            placeholder_symbol: 2,
            alignment: Alignment::Other(7),
            size: 12.5,
            unknown12: -1,
            ..Default::default()
        };
        let mut out = ChunkBuffer::new();
        encode_text(&mut out, &text).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &16u32.to_be_bytes());
        assert_eq!(
            decode_one(&TextDecoder, out.as_bytes()).unwrap(),
            Section::Text(text)
        );
    }

    #[test]
    fn metadata_is_four_shorts() {
        let meta = Metadata {
            major: 1,
            minor: 2,
            patch: 3,
            flag: -1,
        };
        let mut out = ChunkBuffer::new();
        encode_metadata(&mut out, &meta).unwrap();
        assert_eq!(
            out.as_bytes(),
            &[0, 0, 0x80, 0, 0, 0, 0, 2, 0, 1, 0, 2, 0, 3, 0xFF, 0xFF]
        );
        assert_eq!(
            decode_one(&MetadataDecoder, out.as_bytes()).unwrap(),
            Section::Metadata(meta)
        );
    }

    proptest! {
        #[test]
        fn symbol_chunks_stay_word_aligned(
            symbols in prop::collection::vec("[a-z]{0,9}", 0..6)
        ) {
            let mut out = ChunkBuffer::new();
            encode_symbols(&mut out, &symbols).unwrap();
            prop_assert_eq!(out.len() % 4, 0);
            let section = decode_one(&SymbolsDecoder, out.as_bytes()).unwrap();
            prop_assert_eq!(section, Section::Symbols(symbols));
        }
    }
}
