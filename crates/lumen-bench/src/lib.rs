//! Benchmark profiles for the Lumen codec.
//!
//! Provides synthetic [`Document`]s sized like real assets:
//!
//! - [`reference_profile`]: a character rig (hundreds of meshes, a dozen
//!   animated sprites)
//! - [`stress_profile`]: ten times the reference content
//! - [`synthetic_document`]: the generator both are built on

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lumen_core::{
    Action, Bounds, Color, Deletion, Document, Frame, FrameChild, Graphic, Label, Placement,
    Position, Shape, Sprite, TextureAtlas, Transform, Vertex,
};

/// Content counts for [`synthetic_document`].
#[derive(Clone, Copy, Debug)]
pub struct ProfileSize {
    /// Number of shapes.
    pub shapes: usize,
    /// Graphics per shape.
    pub graphics_per_shape: usize,
    /// Number of sprites.
    pub sprites: usize,
    /// Frames per sprite.
    pub frames_per_sprite: usize,
}

/// Build the reference profile: 200 shapes x 2 graphics, 12 sprites x 48 frames.
pub fn reference_profile(seed: u64) -> Document {
    synthetic_document(
        ProfileSize {
            shapes: 200,
            graphics_per_shape: 2,
            sprites: 12,
            frames_per_sprite: 48,
        },
        seed,
    )
}

/// Build the stress profile: ten times [`reference_profile`].
pub fn stress_profile(seed: u64) -> Document {
    synthetic_document(
        ProfileSize {
            shapes: 2000,
            graphics_per_shape: 2,
            sprites: 120,
            frames_per_sprite: 48,
        },
        seed,
    )
}

/// Deterministic 64-bit LCG.
struct Lcg(u64);

impl Lcg {
    fn step(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.step() % n.max(1) as u64) as usize
    }

    /// A float with an exact 1/256 step, so color and geometry values
    /// survive a symmetric round trip.
    fn unit(&mut self) -> f32 {
        (self.step() % 257) as f32 / 256.0
    }
}

/// Generate a fully populated document. Same `size` and `seed`, same
/// document.
pub fn synthetic_document(size: ProfileSize, seed: u64) -> Document {
    let mut rng = Lcg(seed);
    let mut doc = Document::new();
    doc.header.magic = 0x4C55_4D4E;

    doc.symbols = (0..size.shapes + size.sprites)
        .map(|i| format!("symbol_{i:05}"))
        .collect();
    doc.colors = (0..64)
        .map(|_| Color::new(rng.unit(), rng.unit(), rng.unit(), rng.unit()))
        .collect();
    doc.transforms = (0..128)
        .map(|_| Transform {
            a: rng.unit(),
            b: rng.unit() - 0.5,
            c: rng.unit() - 0.5,
            d: rng.unit(),
            tx: rng.below(2048) as f32,
            ty: rng.below(2048) as f32,
        })
        .collect();
    doc.positions = (0..128)
        .map(|_| Position::new(rng.below(2048) as f32, rng.below(2048) as f32))
        .collect();
    doc.bounds = (0..size.shapes)
        .map(|_| {
            let half = 1.0 + rng.below(64) as f32;
            Bounds::new(-half, -half, half, half)
        })
        .collect();
    doc.atlases = vec![TextureAtlas {
        id: 0,
        unknown: 0,
        width: 2048.0,
        height: 2048.0,
    }];

    doc.shapes = (0..size.shapes)
        .map(|i| Shape {
            id: i as i32,
            unknown1: 0,
            bounds_index: i as i32,
            unknown2: 0,
            graphics: (0..size.graphics_per_shape)
                .map(|_| mesh(&mut rng))
                .collect(),
        })
        .collect();

    doc.sprites = (0..size.sprites)
        .map(|i| Sprite {
            id: (size.shapes + i) as i32,
            labels: vec![Label {
                symbol_index: (size.shapes + i) as i32,
                start_frame: 0,
                unknown: 0,
            }],
            frames: (0..size.frames_per_sprite)
                .map(|f| frame(&mut rng, f as i32, size.shapes))
                .collect(),
            keyframes: vec![frame(&mut rng, 0, size.shapes)],
            ..Default::default()
        })
        .collect();

    doc.fill_missing_opaque();
    doc
}

fn mesh(rng: &mut Lcg) -> Graphic {
    let vertex_count = 4 + rng.below(12);
    let vertices = (0..vertex_count)
        .map(|_| {
            Vertex::new(
                rng.below(128) as f32 - 64.0,
                rng.below(128) as f32 - 64.0,
                rng.unit(),
                rng.unit(),
            )
        })
        .collect();
    let triangles = vertex_count - 2;
    let indices = (0..triangles * 3)
        .map(|_| rng.below(vertex_count) as u16)
        .collect();
    Graphic {
        atlas_index: 0,
        unknown: 0,
        vertices,
        indices,
    }
}

fn frame(rng: &mut Lcg, id: i32, objects: usize) -> Frame {
    let mut frame = Frame::new(id);
    for depth in 0..1 + rng.below(4) {
        frame.push(FrameChild::Placement(Placement {
            object_id: rng.below(objects) as i32,
            placement_id: depth as i32,
            name_symbol: -1,
            transform_index: rng.below(128) as i16,
            position_index: -1,
            color_mult_index: rng.below(64) as i32,
            color_add_index: -1,
            ..Default::default()
        }));
    }
    if rng.below(4) == 0 {
        frame.push(FrameChild::Deletion(Deletion {
            unknown1: 0,
            clip_object_id: rng.below(4) as i16,
            unknown2: 0,
        }));
    }
    if rng.below(16) == 0 {
        frame.push(FrameChild::Action(Action {
            action_id: 0,
            unknown1: 0,
        }));
    }
    frame
}
