/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use kino_core::info::Compression;
use kino_core::options::EncoderOptions;

/// Settings a user may change for PIC output
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields, default))]
pub struct PicOptions {
    pub compression: Compression
}

impl Default for PicOptions {
    fn default() -> Self {
        PicOptions {
            compression: Compression::Rle
        }
    }
}

impl PicOptions {
    /// Carry these settings over to encoder options
    pub fn apply(&self, options: EncoderOptions) -> EncoderOptions {
        options.set_compression(self.compression)
    }
}
