//! The decoded container.

use indexmap::IndexMap;

use crate::opaque::OpaqueBlock;
use crate::shape::{Graphic, Shape};
use crate::sprite::Sprite;
use crate::table::{Bounds, Color, Position, TextureAtlas, Transform};
use crate::tag::OpaqueKind;
use crate::text::DynamicText;

/// Number of 32-bit words in the fixed container header.
pub const HEADER_WORDS: usize = 16;

/// The fixed 16-word container header.
///
/// Only `magic` and `filesize` are identified; the other fourteen words are
/// kept positionally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Word 0.
    pub magic: i32,
    /// Word 7. Preserved as read; encoders may leave it stale.
    pub filesize: i32,
    /// Words 1-6 and 8-15, in order.
    pub unknown: [i32; 14],
}

impl Header {
    /// Word index of `filesize`.
    pub const FILESIZE_WORD: usize = 7;

    /// Rebuild a header from its wire words.
    pub fn from_words(words: [i32; HEADER_WORDS]) -> Self {
        let mut unknown = [0; 14];
        unknown[..6].copy_from_slice(&words[1..7]);
        unknown[6..].copy_from_slice(&words[8..]);
        Self {
            magic: words[0],
            filesize: words[Self::FILESIZE_WORD],
            unknown,
        }
    }

    /// The header as wire words.
    pub fn to_words(&self) -> [i32; HEADER_WORDS] {
        let mut words = [0; HEADER_WORDS];
        words[0] = self.magic;
        words[1..7].copy_from_slice(&self.unknown[..6]);
        words[Self::FILESIZE_WORD] = self.filesize;
        words[8..].copy_from_slice(&self.unknown[6..]);
        words
    }
}

/// Tool version stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Major version.
    pub major: i16,
    /// Minor version.
    pub minor: i16,
    /// Patch version.
    pub patch: i16,
    /// Build flag.
    pub flag: i16,
}

/// A whole container.
///
/// Every list preserves insertion order because other records refer to
/// entries by index. References are not validated: the codec passes them
/// through untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// Fixed header.
    pub header: Header,
    /// Symbol table.
    pub symbols: Vec<String>,
    /// Color table.
    pub colors: Vec<Color>,
    /// Transform table.
    pub transforms: Vec<Transform>,
    /// Position table.
    pub positions: Vec<Position>,
    /// Bounds table.
    pub bounds: Vec<Bounds>,
    /// Texture atlases.
    pub atlases: Vec<TextureAtlas>,
    /// Shapes, each owning its graphics.
    pub shapes: Vec<Shape>,
    /// Graphic chunks that appeared outside any shape.
    pub graphics: Vec<Graphic>,
    /// Dynamic text fields.
    pub texts: Vec<DynamicText>,
    /// Sprites.
    pub sprites: Vec<Sprite>,
    /// Opaque sections, in the order they were first seen.
    pub opaque: IndexMap<OpaqueKind, OpaqueBlock>,
    /// Version stamp.
    pub metadata: Metadata,
}

impl Document {
    /// An empty document with no opaque sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol at `index`.
    pub fn symbol(&self, index: i32) -> Option<&str> {
        lookup(&self.symbols, index).map(String::as_str)
    }

    /// Color at `index`.
    pub fn color(&self, index: i32) -> Option<&Color> {
        lookup(&self.colors, index)
    }

    /// Transform at `index`.
    pub fn transform(&self, index: i32) -> Option<&Transform> {
        lookup(&self.transforms, index)
    }

    /// Position at `index`.
    pub fn position(&self, index: i32) -> Option<&Position> {
        lookup(&self.positions, index)
    }

    /// Bounds at `index`.
    pub fn bounds_at(&self, index: i32) -> Option<&Bounds> {
        lookup(&self.bounds, index)
    }

    /// Texture atlas at `index`.
    pub fn atlas(&self, index: i32) -> Option<&TextureAtlas> {
        lookup(&self.atlases, index)
    }

    /// Opaque section of the given kind.
    pub fn opaque(&self, kind: OpaqueKind) -> Option<&OpaqueBlock> {
        self.opaque.get(&kind)
    }

    /// Store an opaque section, returning the one it replaced.
    ///
    /// The encoder rejects a block whose tag is not `kind.tag()`.
    pub fn set_opaque(&mut self, kind: OpaqueKind, block: OpaqueBlock) -> Option<OpaqueBlock> {
        self.opaque.insert(kind, block)
    }

    /// Insert an empty block for every opaque kind not already present.
    pub fn fill_missing_opaque(&mut self) {
        for kind in OpaqueKind::ALL {
            self.opaque
                .entry(kind)
                .or_insert_with(|| OpaqueBlock::empty(kind));
        }
    }

    /// Opaque kinds with no stored block.
    pub fn missing_opaque(&self) -> Vec<OpaqueKind> {
        OpaqueKind::ALL
            .into_iter()
            .filter(|kind| !self.opaque.contains_key(kind))
            .collect()
    }
}

fn lookup<T>(items: &[T], index: i32) -> Option<&T> {
    usize::try_from(index).ok().and_then(|i| items.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_words_roundtrip() {
        let mut words = [0i32; HEADER_WORDS];
        for (i, w) in words.iter_mut().enumerate() {
            *w = i as i32 * 11 - 3;
        }
        let header = Header::from_words(words);
        assert_eq!(header.magic, -3);
        assert_eq!(header.filesize, 74);
        assert_eq!(header.to_words(), words);
    }

    #[test]
    fn negative_and_out_of_range_lookups_are_none() {
        let doc = Document {
            symbols: vec!["root".into()],
            ..Default::default()
        };
        assert_eq!(doc.symbol(0), Some("root"));
        assert_eq!(doc.symbol(1), None);
        assert_eq!(doc.symbol(-1), None);
        assert!(doc.color(0).is_none());
    }

    #[test]
    fn fill_missing_opaque_keeps_existing_blocks() {
        let mut doc = Document::new();
        let script = OpaqueBlock::new(OpaqueKind::ActionScript.tag().raw(), vec![9; 8]).unwrap();
        doc.set_opaque(OpaqueKind::ActionScript, script.clone());
        assert_eq!(doc.missing_opaque().len(), OpaqueKind::ALL.len() - 1);

        doc.fill_missing_opaque();
        assert!(doc.missing_opaque().is_empty());
        assert_eq!(doc.opaque(OpaqueKind::ActionScript), Some(&script));
        assert_eq!(doc.opaque(OpaqueKind::UnkF00D).map(|b| b.words()), Some(0));
    }
}
