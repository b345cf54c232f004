//! Dynamic text fields.

/// Horizontal alignment of a text field.
///
/// Raw values outside the known set are kept in [`Alignment::Other`] so the
/// field survives a round trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// `0`.
    #[default]
    Left,
    /// `1`.
    Right,
    /// `2`.
    Center,
    /// Any other raw value.
    Other(i16),
}

impl Alignment {
    /// Decode a raw wire value.
    pub fn from_raw(raw: i16) -> Self {
        match raw {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Center,
            other => Self::Other(other),
        }
    }

    /// The raw wire value.
    pub fn raw(self) -> i16 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Center => 2,
            Self::Other(raw) => raw,
        }
    }
}

/// A fixed-layout dynamic text definition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DynamicText {
    /// Character id.
    pub id: i32,
    /// Unidentified.
    pub unknown1: i32,
    /// Symbol index of the placeholder text.
    pub placeholder_symbol: i32,
    /// Unidentified.
    pub unknown2: i32,
    /// Index into the document's colors.
    pub color_index: i32,
    /// Unidentified.
    pub unknown3: i32,
    /// Unidentified.
    pub unknown4: i32,
    /// Unidentified.
    pub unknown5: i32,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// Unidentified.
    pub unknown6: i16,
    /// Unidentified.
    pub unknown7: i32,
    /// Unidentified.
    pub unknown8: i32,
    /// Font size.
    pub size: f32,
    /// Unidentified.
    pub unknown9: i32,
    /// Unidentified.
    pub unknown10: i32,
    /// Unidentified.
    pub unknown11: i32,
    /// Unidentified.
    pub unknown12: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_raw_roundtrip() {
        for raw in [-1i16, 0, 1, 2, 3, 0x7FFF] {
            assert_eq!(Alignment::from_raw(raw).raw(), raw);
        }
        assert_eq!(Alignment::from_raw(2), Alignment::Center);
        assert_eq!(Alignment::from_raw(9), Alignment::Other(9));
    }
}
