//! Chunk tag identifiers.
//!
//! [`TagType`] is the closed set of ids the codec knows about. Anything
//! outside it is "unregistered" and handled by the caller's dispatch policy.
//! [`OpaqueKind`] is the subset whose payloads are kept verbatim.

use std::fmt;

/// A registered chunk tag id.
///
/// Top-level tags and the inner tags used inside shapes and sprite timelines
/// share one id space, so they live in one enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
    /// `0x0000`. Never valid where a chunk header is expected.
    Invalid,
    /// `0x0001`. Regular frame container inside a sprite.
    ShowFrame,
    /// `0x0004`. Placement child record inside a frame.
    PlaceObject,
    /// `0x0005`. Deletion child record inside a frame.
    RemoveObject,
    /// `0x000A`. Unidentified, stored opaquely.
    Unk000A,
    /// `0x000C`. Script-action child record inside a frame.
    DoAction,
    /// `0x0025`. Dynamic text field definition.
    DefineEditText,
    /// `0x0027`. Sprite definition.
    DefineSprite,
    /// `0x002B`. Sprite label.
    FrameLabel,
    /// `0xF001`. Symbol table.
    Symbols,
    /// `0xF002`. Color table.
    Colors,
    /// `0xF003`. Transform table.
    Transforms,
    /// `0xF004`. Bounds table.
    Bounds,
    /// `0xF005`. Script bytecode, stored opaquely.
    ActionScript,
    /// `0xF007`. Texture atlas table.
    TextureAtlases,
    /// `0xF008`. Unidentified, stored opaquely.
    UnkF008,
    /// `0xF009`. Unidentified, stored opaquely.
    UnkF009,
    /// `0xF00A`. Unidentified, stored opaquely.
    UnkF00A,
    /// `0xF00B`. Unidentified, stored opaquely.
    UnkF00B,
    /// `0xF00C`. Generic properties, stored opaquely.
    Properties,
    /// `0xF00D`. Unidentified, stored opaquely.
    UnkF00D,
    /// `0xF022`. Shape header.
    Shape,
    /// `0xF024`. Graphic mesh.
    Graphic,
    /// `0xF037`. Color matrix attached to a placement.
    ColorMatrix,
    /// `0xF103`. Position table.
    Positions,
    /// `0xF105`. Keyframe container inside a sprite.
    Keyframe,
    /// `0xFF00`. Stream terminator.
    End,
    /// `0x8000`. Tool version metadata.
    Metadata,
}

impl TagType {
    /// Every registered tag, in id order within each range.
    pub const ALL: [TagType; 28] = [
        Self::Invalid,
        Self::ShowFrame,
        Self::PlaceObject,
        Self::RemoveObject,
        Self::Unk000A,
        Self::DoAction,
        Self::DefineEditText,
        Self::DefineSprite,
        Self::FrameLabel,
        Self::Symbols,
        Self::Colors,
        Self::Transforms,
        Self::Bounds,
        Self::ActionScript,
        Self::TextureAtlases,
        Self::UnkF008,
        Self::UnkF009,
        Self::UnkF00A,
        Self::UnkF00B,
        Self::Properties,
        Self::UnkF00D,
        Self::Shape,
        Self::Graphic,
        Self::ColorMatrix,
        Self::Positions,
        Self::Keyframe,
        Self::End,
        Self::Metadata,
    ];

    /// Look up a raw wire id. Returns `None` for unregistered ids.
    pub fn from_raw(raw: u32) -> Option<Self> {
        let tag = match raw {
            0x0000 => Self::Invalid,
            0x0001 => Self::ShowFrame,
            0x0004 => Self::PlaceObject,
            0x0005 => Self::RemoveObject,
            0x000A => Self::Unk000A,
            0x000C => Self::DoAction,
            0x0025 => Self::DefineEditText,
            0x0027 => Self::DefineSprite,
            0x002B => Self::FrameLabel,
            0xF001 => Self::Symbols,
            0xF002 => Self::Colors,
            0xF003 => Self::Transforms,
            0xF004 => Self::Bounds,
            0xF005 => Self::ActionScript,
            0xF007 => Self::TextureAtlases,
            0xF008 => Self::UnkF008,
            0xF009 => Self::UnkF009,
            0xF00A => Self::UnkF00A,
            0xF00B => Self::UnkF00B,
            0xF00C => Self::Properties,
            0xF00D => Self::UnkF00D,
            0xF022 => Self::Shape,
            0xF024 => Self::Graphic,
            0xF037 => Self::ColorMatrix,
            0xF103 => Self::Positions,
            0xF105 => Self::Keyframe,
            0xFF00 => Self::End,
            0x8000 => Self::Metadata,
            _ => return None,
        };
        Some(tag)
    }

    /// The wire id of this tag.
    pub fn raw(self) -> u32 {
        match self {
            Self::Invalid => 0x0000,
            Self::ShowFrame => 0x0001,
            Self::PlaceObject => 0x0004,
            Self::RemoveObject => 0x0005,
            Self::Unk000A => 0x000A,
            Self::DoAction => 0x000C,
            Self::DefineEditText => 0x0025,
            Self::DefineSprite => 0x0027,
            Self::FrameLabel => 0x002B,
            Self::Symbols => 0xF001,
            Self::Colors => 0xF002,
            Self::Transforms => 0xF003,
            Self::Bounds => 0xF004,
            Self::ActionScript => 0xF005,
            Self::TextureAtlases => 0xF007,
            Self::UnkF008 => 0xF008,
            Self::UnkF009 => 0xF009,
            Self::UnkF00A => 0xF00A,
            Self::UnkF00B => 0xF00B,
            Self::Properties => 0xF00C,
            Self::UnkF00D => 0xF00D,
            Self::Shape => 0xF022,
            Self::Graphic => 0xF024,
            Self::ColorMatrix => 0xF037,
            Self::Positions => 0xF103,
            Self::Keyframe => 0xF105,
            Self::End => 0xFF00,
            Self::Metadata => 0x8000,
        }
    }

    /// The opaque kind this tag is stored as, if its payload is not modeled.
    pub fn opaque_kind(self) -> Option<OpaqueKind> {
        OpaqueKind::ALL.into_iter().find(|kind| kind.tag() == self)
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}(0x{:04X})", self.raw())
    }
}

/// Top-level sections whose payloads are preserved byte-for-byte.
///
/// Declaration order matches [`OpaqueKind::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpaqueKind {
    /// Script bytecode.
    ActionScript,
    /// Unidentified `0xF008`.
    UnkF008,
    /// Unidentified `0xF009`.
    UnkF009,
    /// Unidentified `0xF00A`.
    UnkF00A,
    /// Unidentified `0x000A`.
    Unk000A,
    /// Unidentified `0xF00B`.
    UnkF00B,
    /// Generic properties.
    Properties,
    /// Unidentified `0xF00D`.
    UnkF00D,
}

impl OpaqueKind {
    /// All opaque kinds, in the order they are written after the tables.
    pub const ALL: [OpaqueKind; 8] = [
        Self::ActionScript,
        Self::UnkF008,
        Self::UnkF009,
        Self::UnkF00A,
        Self::Unk000A,
        Self::UnkF00B,
        Self::Properties,
        Self::UnkF00D,
    ];

    /// The chunk tag carrying this kind.
    pub fn tag(self) -> TagType {
        match self {
            Self::ActionScript => TagType::ActionScript,
            Self::UnkF008 => TagType::UnkF008,
            Self::UnkF009 => TagType::UnkF009,
            Self::UnkF00A => TagType::UnkF00A,
            Self::Unk000A => TagType::Unk000A,
            Self::UnkF00B => TagType::UnkF00B,
            Self::Properties => TagType::Properties,
            Self::UnkF00D => TagType::UnkF00D,
        }
    }
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
