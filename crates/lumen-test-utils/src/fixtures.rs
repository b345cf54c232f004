//! Reusable documents.
//!
//! Every float here is exactly representable after a divide-by-256, so
//! the samples survive a symmetric decode/encode cycle bit-for-bit.

use lumen_core::{
    Action, Alignment, Bounds, Color, Deletion, Document, DynamicText, Frame, FrameChild, Graphic,
    Label, Metadata, OpaqueBlock, OpaqueKind, Placement, Position, Shape, Sprite, TagType,
    TextureAtlas, Transform, Vertex,
};

/// Header magic used by the fixtures.
pub const SAMPLE_MAGIC: i32 = 0x4C55_4D4E;

/// A recognizable payload of `words` words for an opaque section.
pub fn opaque_payload(kind: OpaqueKind, words: usize) -> Vec<u8> {
    let seed = kind.tag().raw() as u8;
    (0..words * 4)
        .map(|i| seed.wrapping_add(i as u8))
        .collect()
}

/// The smallest document the encoder accepts: a header, empty tables, and
/// an empty block for every opaque kind.
pub fn minimal_document() -> Document {
    let mut doc = Document::new();
    doc.header.magic = SAMPLE_MAGIC;
    doc.fill_missing_opaque();
    doc
}

/// A document that populates every section, including orphan graphics, a
/// placement with both attached blocks, and frames whose children are
/// interleaved.
pub fn sample_document() -> Document {
    let mut doc = Document::new();
    doc.header.magic = SAMPLE_MAGIC;
    doc.header.unknown = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];

    doc.symbols = ["", "root", "walk", "caf\u{e9}", "label_idle"]
        .into_iter()
        .map(String::from)
        .collect();
    doc.colors = vec![
        Color::new(1.0, 1.0, 1.0, 1.0),
        Color::new(0.5, 0.25, 0.0, 1.0),
        Color::new(0.0, 0.0, 0.0, 0.0),
    ];
    doc.transforms = vec![
        Transform::IDENTITY,
        Transform {
            a: 0.0,
            b: 1.0,
            c: -1.0,
            d: 0.0,
            tx: 12.5,
            ty: -3.0,
        },
    ];
    doc.positions = vec![Position::new(0.0, 0.0), Position::new(64.0, -32.5)];
    doc.bounds = vec![Bounds::new(-10.0, -10.0, 10.0, 10.0)];
    doc.atlases = vec![TextureAtlas {
        id: 0,
        unknown: 0,
        width: 1024.0,
        height: 512.0,
    }];

    doc.shapes = vec![Shape {
        id: 1,
        unknown1: 0,
        bounds_index: 0,
        unknown2: 0,
        graphics: vec![quad(0), triangle(0)],
    }];
    doc.graphics = vec![triangle(0)];

    doc.texts = vec![DynamicText {
        id: 2,
        placeholder_symbol: 1,
        color_index: 0,
        alignment: Alignment::Center,
        size: 18.0,
        ..Default::default()
    }];

    doc.sprites = vec![Sprite {
        id: 3,
        labels: vec![Label {
            symbol_index: 4,
            start_frame: 0,
            unknown: 0,
        }],
        frames: vec![interleaved_frame(0), Frame::new(1)],
        keyframes: vec![interleaved_frame(0)],
        ..Default::default()
    }];

    for (i, kind) in OpaqueKind::ALL.into_iter().enumerate() {
        doc.set_opaque(kind, block(kind.tag().raw(), opaque_payload(kind, i)));
    }
    doc.metadata = Metadata {
        major: 1,
        minor: 4,
        patch: 2,
        flag: 0,
    };
    doc
}

fn block(tag: u32, payload: Vec<u8>) -> OpaqueBlock {
    OpaqueBlock::new(tag, payload).expect("fixture payloads are word-aligned")
}

fn quad(atlas_index: i32) -> Graphic {
    Graphic {
        atlas_index,
        unknown: 0,
        vertices: vec![
            Vertex::new(-8.0, -8.0, 0.0, 0.0),
            Vertex::new(8.0, -8.0, 0.5, 0.0),
            Vertex::new(8.0, 8.0, 0.5, 0.5),
            Vertex::new(-8.0, 8.0, 0.0, 0.5),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

fn triangle(atlas_index: i32) -> Graphic {
    Graphic {
        atlas_index,
        unknown: 1,
        vertices: vec![
            Vertex::new(0.0, 0.0, 0.0, 0.0),
            Vertex::new(4.0, 0.0, 0.25, 0.0),
            Vertex::new(0.0, 4.0, 0.0, 0.25),
        ],
        indices: vec![0, 1, 2],
    }
}

fn interleaved_frame(id: i32) -> Frame {
    let mut frame = Frame::new(id);
    frame.push(FrameChild::Placement(Placement {
        object_id: 1,
        placement_id: 0,
        name_symbol: 2,
        transform_index: 1,
        position_index: -1,
        color_mult_index: 0,
        color_add_index: 2,
        color_matrix: Some(block(TagType::ColorMatrix.raw(), vec![0x3F; 80])),
        extra: Some(block(0xF014, vec![0; 4])),
        ..Default::default()
    }));
    frame.push(FrameChild::Deletion(Deletion {
        unknown1: 0,
        clip_object_id: 0,
        unknown2: 0,
    }));
    frame.push(FrameChild::Action(Action {
        action_id: 0,
        unknown1: 0,
    }));
    frame.push(FrameChild::Placement(Placement {
        object_id: 2,
        placement_id: 1,
        name_symbol: -1,
        transform_index: -1,
        position_index: 1,
        color_mult_index: -1,
        color_add_index: -1,
        ..Default::default()
    }));
    frame
}
