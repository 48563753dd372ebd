/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub const SGI_MAGIC: u16 = 474;

/// Pixel data or offset tables always start here
pub const SGI_HEADER_SIZE: usize = 512;

/// Bytes of the header that carry fields, the rest is padding
pub const SGI_HEADER_FIELDS: usize = 108;

pub const SGI_NAME_LENGTH: usize = 80;

pub const STORAGE_VERBATIM: u8 = 0;
pub const STORAGE_RLE: u8 = 1;

/// Colormap id of a plain image
pub const COLORMAP_NORMAL: u32 = 0;

/// Extensions SGI files are found with
pub const SGI_EXTENSIONS: [&str; 4] = ["sgi", "rgba", "rgb", "bw"];
