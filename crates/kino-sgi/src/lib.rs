/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A Silicon Graphics image decoder and encoder
//!
//! An SGI file is a 512 byte big endian header followed by the pixels
//! stored one channel plane after the other, each plane bottom row first.
//!
//! ```text
//! offset  size  field
//!      0     2  magic, always 474
//!      2     1  storage, 0 verbatim, 1 RLE
//!      3     1  bytes per channel, 1 or 2
//!      4     2  dimension
//!      6     2  width
//!      8     2  height
//!     10     2  channels
//!     12     4  minimum pixel value
//!     16     4  maximum pixel value
//!     24    80  image name
//!    104     4  colormap id
//!    512        offset tables (RLE) or pixel planes (verbatim)
//! ```
//!
//! RLE images carry two tables of `height * channels` big endian `u32`s
//! after the header, the absolute start offset and the byte length of
//! every encoded scanline, indexed by `row + height * channel`.
//!
//! The decoder returns the planes as they are stored, the
//! [`PixelLayout`](kino_core::pixel::PixelLayout) of the returned
//! [`ImageInfo`](kino_core::info::ImageInfo) marks them planar.
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use header::SgiHeader;
pub use kino_core;
pub use constants::SGI_EXTENSIONS;
pub use options::SgiOptions;

mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod options;
