//! Shapes and their graphic meshes.
//!
//! A shape chunk's declared size covers only its five header words. The
//! `graphic_count` graphic chunks that follow are siblings on the wire but
//! belong to the shape, so [`ShapeDecoder`] consumes them as well.

use lumen_core::{Graphic, Shape, TagType, Vertex};

use crate::buffer::ChunkBuffer;
use crate::cursor::ByteCursor;
use crate::error::LumenError;
use crate::registry::{expect_header, ChunkHeader, DecodeContext, Section, SectionDecoder};

/// Shape header plus its graphics (`0xF022`).
pub struct ShapeDecoder;

impl SectionDecoder for ShapeDecoder {
    fn tag(&self) -> TagType {
        TagType::Shape
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let id = cursor.read_i32()?;
        let unknown1 = cursor.read_i32()?;
        let bounds_index = cursor.read_i32()?;
        let unknown2 = cursor.read_i32()?;
        let count = cursor.read_count("graphic")?;
        header.expect_end(cursor)?;

        let mut graphics = Vec::with_capacity(cursor.capacity_hint(count, 20));
        for _ in 0..count {
            // Size is recomputed on encode; only the tag matters here.
            expect_header(cursor, TagType::Graphic)?;
            graphics.push(decode_graphic(cursor)?);
        }

        Ok(Section::Shape(Shape {
            id,
            unknown1,
            bounds_index,
            unknown2,
            graphics,
        }))
    }
}

/// A graphic chunk met outside a shape (`0xF024`).
pub struct GraphicDecoder;

impl SectionDecoder for GraphicDecoder {
    fn tag(&self) -> TagType {
        TagType::Graphic
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        _ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let graphic = decode_graphic(cursor)?;
        header.expect_end(cursor)?;
        Ok(Section::Graphic(graphic))
    }
}

/// Decode one graphic body. The cursor must be past its chunk header.
pub fn decode_graphic(cursor: &mut ByteCursor<'_>) -> Result<Graphic, LumenError> {
    let atlas_index = cursor.read_i32()?;
    let unknown = cursor.read_i16()?;
    let vertex_count = usize::from(cursor.read_u16()?);
    let index_count = cursor.read_count("index")?;

    let mut vertices = Vec::with_capacity(cursor.capacity_hint(vertex_count, 16));
    for _ in 0..vertex_count {
        let x = cursor.read_f32()?;
        let y = cursor.read_f32()?;
        let u = cursor.read_f32()?;
        let v = cursor.read_f32()?;
        vertices.push(Vertex::new(x, y, u, v));
    }

    let mut indices = Vec::with_capacity(cursor.capacity_hint(index_count, 2));
    for _ in 0..index_count {
        indices.push(cursor.read_u16()?);
    }
    if index_count % 2 != 0 {
        cursor.skip(2)?;
    }

    Ok(Graphic {
        atlas_index,
        unknown,
        vertices,
        indices,
    })
}

/// Write a graphic chunk with a freshly computed size.
pub fn encode_graphic(out: &mut ChunkBuffer, graphic: &Graphic) -> Result<(), LumenError> {
    let vertex_count = u16::try_from(graphic.vertices.len()).map_err(|_| {
        LumenError::unencodable(format!(
            "graphic has {} vertices, wire limit is {}",
            graphic.vertices.len(),
            u16::MAX
        ))
    })?;

    let mut body = ChunkBuffer::with_capacity(
        12 + graphic.vertices.len() * 16 + (graphic.indices.len() + 1) * 2,
    );
    body.write_i32(graphic.atlas_index);
    body.write_i16(graphic.unknown);
    body.write_u16(vertex_count);
    body.write_count(graphic.indices.len(), "index")?;
    for v in &graphic.vertices {
        body.write_f32(v.x);
        body.write_f32(v.y);
        body.write_f32(v.u);
        body.write_f32(v.v);
    }
    for &i in &graphic.indices {
        body.write_u16(i);
    }
    if graphic.needs_index_padding() {
        body.write_u16(0);
    }
    out.write_chunk(TagType::Graphic, &body)
}

/// Write a shape chunk followed by its graphics.
pub fn encode_shape(out: &mut ChunkBuffer, shape: &Shape) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(20);
    body.write_i32(shape.id);
    body.write_i32(shape.unknown1);
    body.write_i32(shape.bounds_index);
    body.write_i32(shape.unknown2);
    body.write_count(shape.graphics.len(), "graphic")?;
    out.write_chunk(TagType::Shape, &body)?;
    for graphic in &shape.graphics {
        encode_graphic(out, graphic)?;
    }
    Ok(())
}
