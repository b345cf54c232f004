//! Vector shapes: a shape header owning a list of textured meshes.

/// A mesh vertex: position plus texture coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    /// Position x.
    pub x: f32,
    /// Position y.
    pub y: f32,
    /// Texture u.
    pub u: f32,
    /// Texture v.
    pub v: f32,
}

impl Vertex {
    /// Build a vertex.
    pub fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

/// A drawable mesh bound to a texture atlas.
///
/// `indices` may have odd length here; the wire form pads it to an even
/// count with one trailing zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graphic {
    /// Index into the document's texture atlases.
    pub atlas_index: i32,
    /// Unidentified field, preserved verbatim.
    pub unknown: i16,
    /// Vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Index buffer (triangle list).
    pub indices: Vec<u16>,
}

impl Graphic {
    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the index buffer needs a padding short on the wire.
    pub fn needs_index_padding(&self) -> bool {
        self.indices.len() % 2 != 0
    }
}

/// A vector shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    /// Shape id.
    pub id: i32,
    /// Unidentified field, preserved verbatim.
    pub unknown1: i32,
    /// Index into the document's bounds table.
    pub bounds_index: i32,
    /// Unidentified field, preserved verbatim.
    pub unknown2: i32,
    /// Meshes, in draw order.
    pub graphics: Vec<Graphic>,
}
