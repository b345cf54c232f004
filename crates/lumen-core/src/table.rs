//! Positional lookup tables: colors, transforms, positions, bounds, atlases.
//!
//! Entries are referenced elsewhere by their index in the owning
//! [`Document`](crate::Document) list, so order is identity.

/// An RGBA color. Channels are held as floats; the wire stores 16-bit
/// quantities scaled by the codec's color scale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Build a color from channel values.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels in wire order.
    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A 2×3 affine matrix: basis columns `(a, b)` and `(c, d)` plus translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Row 1, column 1.
    pub a: f32,
    /// Row 1, column 2.
    pub b: f32,
    /// Row 2, column 1.
    pub c: f32,
    /// Row 2, column 2.
    pub d: f32,
    /// X translation.
    pub tx: f32,
    /// Y translation.
    pub ty: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Translation component.
    pub fn translation(&self) -> Position {
        Position::new(self.tx, self.ty)
    }

    /// Signed scale along each axis.
    ///
    /// The sign follows the diagonal element, so a mirrored axis reports a
    /// negative scale.
    pub fn scale(&self) -> (f32, f32) {
        let sx = self.a.signum() * (self.a * self.a + self.c * self.c).sqrt();
        let sy = self.d.signum() * (self.b * self.b + self.d * self.d).sqrt();
        (sx, sy)
    }

    /// Rotation in degrees, measured as `atan2(c, d)`.
    pub fn rotation_degrees(&self) -> f32 {
        self.c.atan2(self.d).to_degrees()
    }

    /// Matrix elements in wire order.
    pub fn elements(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Position {
    /// Build a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Bounds {
    /// Build a rectangle from its edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `right - left`.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// `bottom - top`.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A texture atlas descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextureAtlas {
    /// Atlas id.
    pub id: i32,
    /// Unidentified field, preserved verbatim.
    pub unknown: i32,
    /// Width in texels.
    pub width: f32,
    /// Height in texels.
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_decomposes_cleanly() {
        let t = Transform::IDENTITY;
        assert_eq!(t.scale(), (1.0, 1.0));
        assert_eq!(t.rotation_degrees(), 0.0);
        assert_eq!(t.translation(), Position::new(0.0, 0.0));
    }

    #[test]
    fn scaled_and_translated() {
        let t = Transform {
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: -3.0,
            tx: 10.0,
            ty: -4.5,
        };
        assert_eq!(t.scale(), (2.0, -3.0));
        assert_eq!(t.translation(), Position::new(10.0, -4.5));
    }

    #[test]
    fn quarter_turn_rotation() {
        let t = Transform {
            a: 0.0,
            b: -1.0,
            c: 1.0,
            d: 0.0,
            tx: 0.0,
            ty: 0.0,
        };
        assert!(approx(t.rotation_degrees(), 90.0));
    }

    #[test]
    fn bounds_extent() {
        let b = Bounds::new(-1.0, -2.0, 3.0, 6.0);
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 8.0);
    }
}
