/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Pixel formats, numeric sample types and pixel layout
//!
//! Every buffer moving between a codec and the conversion engine is described
//! by a [`PixelFormat`], a channel count paired with a numeric sample type.
//!
//! All queries on a format are total, every format has a channel count,
//! a byte width, a bit depth and a maximum value.
#![allow(non_camel_case_types)]

use core::fmt::{Display, Formatter};
use core::str::FromStr;

use crate::bytestream::ByteEndian;

/// The numeric type of a single sample
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelType {
    /// 8 bit unsigned integer, `[0, 255]`
    U8,
    /// 10 bit unsigned integer, only exists packed three to a 32 bit word
    U10,
    /// 16 bit unsigned integer, `[0, 65535]`
    U16,
    /// 32 bit unsigned integer, `[0, 4294967295]`
    U32,
    /// IEEE half float, `[0.0, 1.0]` nominal range
    F16,
    /// IEEE single float, `[0.0, 1.0]` nominal range
    F32
}

impl PixelType {
    /// Number of significant bits in one sample
    pub const fn bit_depth(self) -> u8 {
        match self {
            PixelType::U8 => 8,
            PixelType::U10 => 10,
            PixelType::U16 | PixelType::F16 => 16,
            PixelType::U32 | PixelType::F32 => 32
        }
    }
    /// Whether samples of this type are floating point
    pub const fn is_float(self) -> bool {
        matches!(self, PixelType::F16 | PixelType::F32)
    }
    /// The value representing full intensity
    ///
    /// Integers use their full range, floats are normalized to `1.0`
    pub const fn max_value(self) -> f64 {
        match self {
            PixelType::U8 => 255.0,
            PixelType::U10 => 1023.0,
            PixelType::U16 => 65535.0,
            PixelType::U32 => 4294967295.0,
            PixelType::F16 | PixelType::F32 => 1.0
        }
    }
}

/// Whether a bit depth should be looked up as an integer
/// or floating point format
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PixelKind {
    Integer,
    Float
}

/// Every pixel format a decoder can produce or an encoder can consume
///
/// The 10 bit format only exists for three channels, where a pixel is
/// one native endian `u32` holding `r << 22 | g << 12 | b << 2`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    L_U8,
    L_U16,
    L_U32,
    L_F16,
    L_F32,
    LA_U8,
    LA_U16,
    LA_U32,
    LA_F16,
    LA_F32,
    RGB_U8,
    RGB_U10,
    RGB_U16,
    RGB_U32,
    RGB_F16,
    RGB_F32,
    RGBA_U8,
    RGBA_U16,
    RGBA_U32,
    RGBA_F16,
    RGBA_F32
}

impl PixelFormat {
    /// All formats, in declaration order
    pub const ALL: [PixelFormat; 21] = [
        PixelFormat::L_U8,
        PixelFormat::L_U16,
        PixelFormat::L_U32,
        PixelFormat::L_F16,
        PixelFormat::L_F32,
        PixelFormat::LA_U8,
        PixelFormat::LA_U16,
        PixelFormat::LA_U32,
        PixelFormat::LA_F16,
        PixelFormat::LA_F32,
        PixelFormat::RGB_U8,
        PixelFormat::RGB_U10,
        PixelFormat::RGB_U16,
        PixelFormat::RGB_U32,
        PixelFormat::RGB_F16,
        PixelFormat::RGB_F32,
        PixelFormat::RGBA_U8,
        PixelFormat::RGBA_U16,
        PixelFormat::RGBA_U32,
        PixelFormat::RGBA_F16,
        PixelFormat::RGBA_F32
    ];

    /// Number of channels, between 1 and 4
    pub const fn channels(self) -> usize {
        use PixelFormat::*;
        match self {
            L_U8 | L_U16 | L_U32 | L_F16 | L_F32 => 1,
            LA_U8 | LA_U16 | LA_U32 | LA_F16 | LA_F32 => 2,
            RGB_U8 | RGB_U10 | RGB_U16 | RGB_U32 | RGB_F16 | RGB_F32 => 3,
            RGBA_U8 | RGBA_U16 | RGBA_U32 | RGBA_F16 | RGBA_F32 => 4
        }
    }

    /// The numeric type of each sample
    pub const fn pixel_type(self) -> PixelType {
        use PixelFormat::*;
        match self {
            L_U8 | LA_U8 | RGB_U8 | RGBA_U8 => PixelType::U8,
            RGB_U10 => PixelType::U10,
            L_U16 | LA_U16 | RGB_U16 | RGBA_U16 => PixelType::U16,
            L_U32 | LA_U32 | RGB_U32 | RGBA_U32 => PixelType::U32,
            L_F16 | LA_F16 | RGB_F16 | RGBA_F16 => PixelType::F16,
            L_F32 | LA_F32 | RGB_F32 | RGBA_F32 => PixelType::F32
        }
    }

    /// Number of bytes one sample occupies in memory
    ///
    /// The packed 10 bit format reports the size of its packing word
    pub const fn sample_byte_width(self) -> usize {
        match self.pixel_type() {
            PixelType::U8 => 1,
            PixelType::U16 | PixelType::F16 => 2,
            PixelType::U10 | PixelType::U32 | PixelType::F32 => 4
        }
    }

    /// Number of bytes one pixel occupies in memory
    pub const fn byte_width(self) -> usize {
        match self {
            PixelFormat::RGB_U10 => 4,
            _ => self.channels() * self.sample_byte_width()
        }
    }

    /// Number of significant bits per sample
    pub const fn bit_depth(self) -> u8 {
        self.pixel_type().bit_depth()
    }

    /// The numeric value of a full intensity sample
    pub const fn max_value(self) -> f64 {
        self.pixel_type().max_value()
    }

    /// Whether the last channel is alpha
    pub const fn has_alpha(self) -> bool {
        matches!(self.channels(), 2 | 4)
    }

    /// Combine a channel count and a sample type into a format
    ///
    /// Returns `None` for a 10 bit type with anything but three channels
    /// and for channel counts outside `1..=4`
    pub const fn from_parts(channels: usize, pixel_type: PixelType) -> Option<PixelFormat> {
        use PixelFormat::*;
        let format = match (channels, pixel_type) {
            (1, PixelType::U8) => L_U8,
            (1, PixelType::U16) => L_U16,
            (1, PixelType::U32) => L_U32,
            (1, PixelType::F16) => L_F16,
            (1, PixelType::F32) => L_F32,
            (2, PixelType::U8) => LA_U8,
            (2, PixelType::U16) => LA_U16,
            (2, PixelType::U32) => LA_U32,
            (2, PixelType::F16) => LA_F16,
            (2, PixelType::F32) => LA_F32,
            (3, PixelType::U8) => RGB_U8,
            (3, PixelType::U10) => RGB_U10,
            (3, PixelType::U16) => RGB_U16,
            (3, PixelType::U32) => RGB_U32,
            (3, PixelType::F16) => RGB_F16,
            (3, PixelType::F32) => RGB_F32,
            (4, PixelType::U8) => RGBA_U8,
            (4, PixelType::U16) => RGBA_U16,
            (4, PixelType::U32) => RGBA_U32,
            (4, PixelType::F16) => RGBA_F16,
            (4, PixelType::F32) => RGBA_F32,
            _ => return None
        };
        Some(format)
    }

    /// Look up a format from a header's channel count and bit depth
    ///
    /// # Returns
    /// - `Some(format)`: The matching format
    /// - `None`: The combination is unsupported, e.g 10 bit luminance or 8 bit float
    ///
    /// # Example
    /// ```
    /// use kino_core::pixel::{PixelFormat, PixelKind};
    /// assert_eq!(PixelFormat::from_channels_and_depth(3, 10, PixelKind::Integer), Some(PixelFormat::RGB_U10));
    /// assert_eq!(PixelFormat::from_channels_and_depth(1, 10, PixelKind::Integer), None);
    /// ```
    pub const fn from_channels_and_depth(
        channels: usize, bit_depth: u8, kind: PixelKind
    ) -> Option<PixelFormat> {
        let pixel_type = match (kind, bit_depth) {
            (PixelKind::Integer, 8) => PixelType::U8,
            (PixelKind::Integer, 10) => PixelType::U10,
            (PixelKind::Integer, 16) => PixelType::U16,
            (PixelKind::Integer, 32) => PixelType::U32,
            (PixelKind::Float, 16) => PixelType::F16,
            (PixelKind::Float, 32) => PixelType::F32,
            _ => return None
        };
        PixelFormat::from_parts(channels, pixel_type)
    }

    /// The label for this format, e.g `RGB_U8`
    pub const fn name(self) -> &'static str {
        use PixelFormat::*;
        match self {
            L_U8 => "L_U8",
            L_U16 => "L_U16",
            L_U32 => "L_U32",
            L_F16 => "L_F16",
            L_F32 => "L_F32",
            LA_U8 => "LA_U8",
            LA_U16 => "LA_U16",
            LA_U32 => "LA_U32",
            LA_F16 => "LA_F16",
            LA_F32 => "LA_F32",
            RGB_U8 => "RGB_U8",
            RGB_U10 => "RGB_U10",
            RGB_U16 => "RGB_U16",
            RGB_U32 => "RGB_U32",
            RGB_F16 => "RGB_F16",
            RGB_F32 => "RGB_F32",
            RGBA_U8 => "RGBA_U8",
            RGBA_U16 => "RGBA_U16",
            RGBA_U32 => "RGBA_U32",
            RGBA_F16 => "RGBA_F16",
            RGBA_F32 => "RGBA_F32"
        }
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::ALL
            .iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or("Unknown pixel format name")
    }
}

/// Horizontal and vertical mirroring of the stored pixels
///
/// A set flag means the stored order must be reversed along that axis
/// to reach the canonical order, left to right and bottom to top.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mirror {
    pub x: bool,
    pub y: bool
}

/// How channels are arranged in the stored data
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interleave {
    /// `RGBRGBRGB`
    #[default]
    Interleaved,
    /// `RRR..GGG..BBB`, one plane per channel
    Planar
}

/// Integer downscale applied while reading, for quick previews
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Proxy {
    #[default]
    None,
    /// Half width and height
    Half,
    /// Quarter width and height
    Quarter,
    /// Eighth width and height
    Eighth
}

impl Proxy {
    /// The integer divisor applied to width and height
    pub const fn divisor(self) -> usize {
        match self {
            Proxy::None => 1,
            Proxy::Half => 2,
            Proxy::Quarter => 4,
            Proxy::Eighth => 8
        }
    }
    /// Scale a dimension down, never below one pixel
    pub const fn scale(self, dimension: usize) -> usize {
        let scaled = dimension / self.divisor();
        if scaled == 0 && dimension != 0 {
            1
        } else {
            scaled
        }
    }
}

/// Describes how the bytes of a decoded buffer relate to the canonical layout
///
/// Pure metadata, a layout never owns pixels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelLayout {
    /// Byte order of multi-byte samples
    pub endian:     ByteEndian,
    /// Whether the first and third channel are swapped (blue first)
    pub bgr:        bool,
    pub mirror:     Mirror,
    pub interleave: Interleave,
    pub proxy:      Proxy
}

impl Default for PixelLayout {
    fn default() -> Self {
        PixelLayout {
            endian:     ByteEndian::native(),
            bgr:        false,
            mirror:     Mirror::default(),
            interleave: Interleave::Interleaved,
            proxy:      Proxy::None
        }
    }
}

impl PixelLayout {
    /// Whether the layout already matches canonical
    /// memory order and nothing needs to be rearranged
    pub fn is_canonical(&self) -> bool {
        self.endian == ByteEndian::native()
            && !self.bgr
            && !self.mirror.x
            && !self.mirror.y
            && self.interleave == Interleave::Interleaved
            && self.proxy == Proxy::None
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn byte_widths_match_channel_and_type() {
        let expected = [
            (PixelFormat::L_U8, 1),
            (PixelFormat::L_U16, 2),
            (PixelFormat::L_U32, 4),
            (PixelFormat::L_F16, 2),
            (PixelFormat::L_F32, 4),
            (PixelFormat::LA_U8, 2),
            (PixelFormat::LA_U16, 4),
            (PixelFormat::LA_U32, 8),
            (PixelFormat::LA_F16, 4),
            (PixelFormat::LA_F32, 8),
            (PixelFormat::RGB_U8, 3),
            (PixelFormat::RGB_U10, 4),
            (PixelFormat::RGB_U16, 6),
            (PixelFormat::RGB_U32, 12),
            (PixelFormat::RGB_F16, 6),
            (PixelFormat::RGB_F32, 12),
            (PixelFormat::RGBA_U8, 4),
            (PixelFormat::RGBA_U16, 8),
            (PixelFormat::RGBA_U32, 16),
            (PixelFormat::RGBA_F16, 8),
            (PixelFormat::RGBA_F32, 16)
        ];
        for (format, width) in expected {
            assert_eq!(format.byte_width(), width, "{format}");
        }
    }

    #[test]
    fn ten_bit_only_exists_for_rgb() {
        for channels in [1, 2, 4] {
            assert_eq!(
                PixelFormat::from_channels_and_depth(channels, 10, PixelKind::Integer),
                None
            );
        }
        assert_eq!(
            PixelFormat::from_channels_and_depth(3, 10, PixelKind::Integer),
            Some(PixelFormat::RGB_U10)
        );
        assert_eq!(
            PixelFormat::from_channels_and_depth(3, 8, PixelKind::Float),
            None
        );
        assert_eq!(
            PixelFormat::from_channels_and_depth(5, 8, PixelKind::Integer),
            None
        );
    }

    #[test]
    fn lookup_is_consistent_with_accessors() {
        for format in PixelFormat::ALL {
            let kind = if format.pixel_type().is_float() {
                PixelKind::Float
            } else {
                PixelKind::Integer
            };
            let found =
                PixelFormat::from_channels_and_depth(format.channels(), format.bit_depth(), kind);
            assert_eq!(found, Some(format));
            assert_eq!(format.name().parse::<PixelFormat>(), Ok(format));
            assert_eq!(format.to_string(), format.name());
        }
    }

    #[test]
    fn max_values() {
        assert_eq!(PixelFormat::L_U8.max_value(), 255.0);
        assert_eq!(PixelFormat::RGB_U10.max_value(), 1023.0);
        assert_eq!(PixelFormat::LA_U16.max_value(), 65535.0);
        assert_eq!(PixelFormat::RGBA_U32.max_value(), 4294967295.0);
        assert_eq!(PixelFormat::RGB_F16.max_value(), 1.0);
        assert_eq!(PixelFormat::L_F32.max_value(), 1.0);
    }

    #[test]
    fn proxy_never_scales_to_zero() {
        assert_eq!(Proxy::Eighth.scale(3), 1);
        assert_eq!(Proxy::Half.scale(9), 4);
        assert_eq!(Proxy::None.scale(0), 0);
    }
}
