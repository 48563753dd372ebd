/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Bit depth used for the values of a table
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LutType {
    /// Smallest of 8, 10 and 16 bits holding the largest value
    #[default]
    Auto,
    U8,
    U10,
    U16
}

impl LutType {
    /// The forced bit depth, `None` for [`LutType::Auto`]
    pub const fn bit_depth(self) -> Option<u8> {
        match self {
            LutType::Auto => None,
            LutType::U8 => Some(8),
            LutType::U10 => Some(10),
            LutType::U16 => Some(16)
        }
    }
}

/// The two text layouts a table can be stored in
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LutDialect {
    /// `LUT: <channels> <size>` followed by each channel's values in turn
    #[default]
    Inferno,
    /// One entry per line, one column per channel, `#` comments
    Kodak
}

impl LutDialect {
    /// Pick the dialect from a file extension, without the dot
    pub fn from_extension(extension: &str) -> Option<LutDialect> {
        if extension.eq_ignore_ascii_case("lut") {
            Some(LutDialect::Inferno)
        } else if extension.eq_ignore_ascii_case("1dl") {
            Some(LutDialect::Kodak)
        } else {
            None
        }
    }
}

/// Settings a user may change for LUT input
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields, default))]
pub struct LutOptions {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: LutType
}
