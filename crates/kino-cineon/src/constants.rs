/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Magic of a file whose fields are big endian, read as big endian
pub const CINEON_MAGIC: u32 = 0x802a_5fd7;
/// The same magic read from a little endian file
pub const CINEON_MAGIC_SWAPPED: u32 = 0xd75f_2a80;

pub const CINEON_HEADER_SIZE: usize = 2048;
/// Generic part of the header, file and image blocks
pub const CINEON_GENERIC_SIZE: u32 = 1024;
/// Motion picture industry part, source and film blocks
pub const CINEON_INDUSTRY_SIZE: u32 = 1024;

/// Start of each header block
pub const IMAGE_BLOCK: usize = 192;
pub const DATA_FORMAT_BLOCK: usize = 680;
pub const SOURCE_BLOCK: usize = 712;
pub const FILM_BLOCK: usize = 1024;

/// Byte offset of the total file size field
pub const FILE_SIZE_OFFSET: usize = 20;

pub const MAX_CHANNELS: usize = 8;

pub const ORIENT_LEFT_RIGHT_TOP_BOTTOM: u8 = 0;
pub const ORIENT_LEFT_RIGHT_BOTTOM_TOP: u8 = 1;
pub const ORIENT_RIGHT_LEFT_TOP_BOTTOM: u8 = 2;
pub const ORIENT_RIGHT_LEFT_BOTTOM_TOP: u8 = 3;

pub const DESCRIPTOR_L: u8 = 0;
pub const DESCRIPTOR_R_FILM_PRINT: u8 = 1;
pub const DESCRIPTOR_G_FILM_PRINT: u8 = 2;
pub const DESCRIPTOR_B_FILM_PRINT: u8 = 3;

/// Bits per channel of the only supported layout
pub const BIT_DEPTH: u8 = 10;
/// Three 10 bit samples packed into a 32 bit word, filled from the top
pub const PACKING_FILLED_32: u8 = 5;

/// Undefined integer fields
pub const UNDEFINED_U8: u8 = 0xff;
pub const UNDEFINED_U32: u32 = 0xffff_ffff;
pub const UNDEFINED_I32: i32 = i32::MIN;
/// Undefined floats are positive infinity
pub const UNDEFINED_F32_BITS: u32 = 0x7f80_0000;

/// Numeric fields outside this range are treated as undefined
pub const FIELD_LIMIT: f64 = 1_000_000.0;

/// Frame rates below this are not turned into a speed
pub const MIN_FRAME_RATE: f32 = 0.000001;

pub const CINEON_EXTENSIONS: [&str; 1] = ["cin"];
