/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A Truevision Targa decoder and encoder
//!
//! Supports true colour (types 2 and 10) and grey (types 3 and 11)
//! images with 8 bits per channel, raw or run length encoded.
//! Colour mapped images are not supported.
//!
//! The 18 byte header is little endian
//!
//! ```text
//! offset  size  field
//!      0     1  id length
//!      1     1  colour map type
//!      2     1  image type
//!      3     2  colour map start
//!      5     2  colour map length
//!      7     1  colour map entry bits
//!      8     2  x origin
//!     10     2  y origin
//!     12     2  width
//!     14     2  height
//!     16     1  bits per pixel
//!     17     1  descriptor, alpha bits in 0..=3, mirror x in 4, mirror y in 5
//! ```
//!
//! Decoded pixels keep the blue first channel order and row order of
//! the file, the returned [`ImageInfo`](kino_core::info::ImageInfo)
//! layout records both.
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub use constants::TARGA_EXTENSIONS;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use header::TargaHeader;
pub use kino_core;
pub use options::TargaOptions;

mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod options;
