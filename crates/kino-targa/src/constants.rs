/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub const TARGA_HEADER_SIZE: usize = 18;

pub const TYPE_TRUE_COLOR: u8 = 2;
pub const TYPE_GREY: u8 = 3;
/// Added to a raw image type for its run length encoded variant
pub const TYPE_RLE_OFFSET: u8 = 8;

pub const DESCRIPTOR_ALPHA_MASK: u8 = 0x0f;
pub const DESCRIPTOR_MIRROR_X: u8 = 1 << 4;
pub const DESCRIPTOR_MIRROR_Y: u8 = 1 << 5;

pub const TARGA_EXTENSIONS: [&str; 1] = ["tga"];
