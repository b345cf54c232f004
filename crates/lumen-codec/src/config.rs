//! Codec configuration parameters.

/// How color channels map between wire shorts and in-memory floats.
///
/// Decoding always divides by 256. The reference tool multiplied by 255 when
/// writing, so a decode/encode cycle through it drifted every channel;
/// [`ColorScale::Legacy`] reproduces that output, [`ColorScale::Symmetric`]
/// round-trips exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScale {
    /// Divide and multiply by 256.
    #[default]
    Symmetric,
    /// Divide by 256, multiply by 255.
    Legacy,
}

impl ColorScale {
    /// Divisor applied when decoding a channel.
    pub const DECODE_DIVISOR: f32 = 256.0;

    /// Wire short to float. Independent of the scale.
    pub fn decode_channel(raw: i16) -> f32 {
        f32::from(raw) / Self::DECODE_DIVISOR
    }

    /// Multiplier applied when encoding a channel.
    pub fn encode_multiplier(self) -> f32 {
        match self {
            Self::Symmetric => 256.0,
            Self::Legacy => 255.0,
        }
    }

    /// Float to wire short, rounded to nearest and saturated to `i16`.
    pub fn encode_channel(self, value: f32) -> i16 {
        // `as` saturates and maps NaN to 0.
        (value * self.encode_multiplier()).round() as i16
    }
}

/// Decoder settings.
#[derive(Clone, Debug)]
pub struct DecodeConfig {
    /// Reject symbols whose length prefix disagrees with the NUL-terminated
    /// text that follows.
    ///
    /// Default: `true`.
    pub check_symbol_lengths: bool,
}

impl DecodeConfig {
    /// Default for [`DecodeConfig::check_symbol_lengths`].
    pub const DEFAULT_CHECK_SYMBOL_LENGTHS: bool = true;
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            check_symbol_lengths: Self::DEFAULT_CHECK_SYMBOL_LENGTHS,
        }
    }
}

/// Encoder settings.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Color channel scaling on write.
    pub color_scale: ColorScale,

    /// Write the metadata chunk before the terminator.
    ///
    /// Default: `false`, matching the reference tool, which never wrote it.
    pub emit_metadata: bool,

    /// Replace the header's `filesize` word with the encoded length.
    ///
    /// Default: `false`; the stored value is written back unchanged.
    pub recompute_filesize: bool,
}

impl EncodeConfig {
    /// Default for [`EncodeConfig::emit_metadata`].
    pub const DEFAULT_EMIT_METADATA: bool = false;

    /// Default for [`EncodeConfig::recompute_filesize`].
    pub const DEFAULT_RECOMPUTE_FILESIZE: bool = false;

    /// Settings that reproduce the reference tool's output byte-for-byte.
    pub fn legacy() -> Self {
        Self {
            color_scale: ColorScale::Legacy,
            ..Self::default()
        }
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            color_scale: ColorScale::default(),
            emit_metadata: Self::DEFAULT_EMIT_METADATA,
            recompute_filesize: Self::DEFAULT_RECOMPUTE_FILESIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_scale_is_lossless() {
        let scale = ColorScale::Symmetric;
        for raw in [0i16, 1, 255, 256, 512, 768, 1024, -256, i16::MAX, i16::MIN] {
            assert_eq!(scale.encode_channel(ColorScale::decode_channel(raw)), raw);
        }
    }

    #[test]
    fn legacy_scale_drifts() {
        let scale = ColorScale::Legacy;
        assert_eq!(ColorScale::decode_channel(256), 1.0);
        assert_eq!(scale.encode_channel(1.0), 255);
    }

    #[test]
    fn out_of_range_channels_saturate() {
        assert_eq!(ColorScale::Symmetric.encode_channel(1.0e9), i16::MAX);
        assert_eq!(ColorScale::Symmetric.encode_channel(-1.0e9), i16::MIN);
        assert_eq!(ColorScale::Symmetric.encode_channel(f32::NAN), 0);
    }

    #[test]
    fn defaults() {
        let enc = EncodeConfig::default();
        assert_eq!(enc.color_scale, ColorScale::Symmetric);
        assert!(!enc.emit_metadata);
        assert!(!enc.recompute_filesize);
        assert_eq!(EncodeConfig::legacy().color_scale, ColorScale::Legacy);
        assert!(DecodeConfig::default().check_symbol_lengths);
    }
}
