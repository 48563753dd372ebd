/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Run length codecs used by the still image containers
//!
//! There are two of them and they are intentionally kept apart,
//! their control bytes use opposite polarities.
//!
//! - [`planar`]: one channel of one scanline at a time, SGI style.
//!   Bit 7 **clear** is a repeat packet, the low seven bits are the count.
//! - [`interleaved`]: whole pixels, Targa style.
//!   Bit 7 **set** is a repeat packet, the low seven bits are `count - 1`.
//!
//! Both decoders write exactly as many samples as the output holds and
//! fail instead of reading past the end of their input.
use core::fmt::Formatter;

pub mod interleaved;
pub mod planar;

/// Errors from the run length decoders and encoders
pub enum RleError {
    /// The stream ended before the output was filled,
    /// `position, needed`
    Truncated(usize, usize),
    /// A packet expands past the end of the output,
    /// `count, space left`
    Overrun(usize, usize),
    /// Sample or pixel width the codec cannot handle
    UnsupportedWidth(usize),
    /// Input and output sizes disagree with the sample width
    BadLength(usize, usize)
}

impl core::fmt::Debug for RleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            RleError::Truncated(position, needed) => {
                writeln!(
                    f,
                    "Truncated RLE stream, needed {needed} more bytes at position {position}"
                )
            }
            RleError::Overrun(count, left) => {
                writeln!(
                    f,
                    "RLE packet of {count} samples overruns output with {left} samples left"
                )
            }
            RleError::UnsupportedWidth(width) => {
                writeln!(f, "Unsupported RLE sample width {width}")
            }
            RleError::BadLength(length, width) => {
                writeln!(f, "Buffer length {length} is not a multiple of sample width {width}")
            }
        }
    }
}

impl core::fmt::Display for RleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RleError {}

/// Fetch `len` bytes at `pos` or report how far short the stream is
#[inline]
fn take(src: &[u8], pos: usize, len: usize) -> Result<&[u8], RleError> {
    match pos.checked_add(len).and_then(|end| src.get(pos..end)) {
        Some(bytes) => Ok(bytes),
        None => Err(RleError::Truncated(pos, len))
    }
}
