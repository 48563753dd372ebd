/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub const PIC_MAGIC: u32 = 0x5380_f634;
pub const PIC_ID: [u8; 4] = *b"PICT";
pub const PIC_HEADER_SIZE: usize = 104;
pub const PIC_COMMENT_LENGTH: usize = 80;

/// Version and field values written into new files
pub const PIC_VERSION: f32 = 3.71;
pub const PIC_FULL_FRAME: u16 = 3;

/// Channel mask bits of a channel packet
pub const CHANNEL_R: u8 = 0x80;
pub const CHANNEL_G: u8 = 0x40;
pub const CHANNEL_B: u8 = 0x20;
pub const CHANNEL_A: u8 = 0x10;
pub const CHANNEL_RGB: u8 = CHANNEL_R | CHANNEL_G | CHANNEL_B;

/// Packet encodings
pub const PACKET_RAW: u8 = 0;
pub const PACKET_MIXED_RLE: u8 = 2;

/// Bits per channel, the only size supported
pub const PACKET_BITS: u8 = 8;

pub const PIC_EXTENSIONS: [&str; 1] = ["pic"];
