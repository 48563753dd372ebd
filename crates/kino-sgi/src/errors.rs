/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::{Debug, Display, Formatter};

use kino_core::bytestream::ByteIoError;
use kino_core::pixel::PixelFormat;
use kino_core::rle::RleError;

/// Errors possible during decoding
pub enum SgiDecodeErrors {
    /// The image does not start with 474
    ///
    /// Indicates the file is not an SGI image
    WrongMagicBytes(u16),
    /// Storage is neither verbatim (0) nor RLE (1)
    UnsupportedStorage(u8),
    /// The header's channel count and bytes per channel
    /// do not describe a pixel format
    ///
    /// # Arguments
    /// - channels
    /// - bytes per channel
    UnsupportedFormat(usize, u8),
    /// Width or height larger than the decoder options allow
    ///
    /// # Arguments
    /// - dimension name
    /// - maximum allowed
    /// - found
    TooLargeDimensions(&'static str, usize, usize),
    /// An RLE offset table entry points outside the file
    ///
    /// # Arguments
    /// - scanline index in the table
    /// - offset found
    BadScanlineOffset(usize, u32),
    /// The output buffer cannot hold the image
    TooSmallOutput(usize, usize),
    RleErrors(RleError),
    IoErrors(ByteIoError),
    GenericStatic(&'static str)
}

impl Debug for SgiDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SgiDecodeErrors::WrongMagicBytes(magic) => {
                writeln!(f, "Wrong magic {magic}, expected 474 as image start")
            }
            SgiDecodeErrors::UnsupportedStorage(storage) => {
                writeln!(f, "Unsupported storage {storage}, expected 0 or 1")
            }
            SgiDecodeErrors::UnsupportedFormat(channels, bytes) => {
                writeln!(
                    f,
                    "Unsupported combination of {channels} channels and {bytes} bytes per channel"
                )
            }
            SgiDecodeErrors::TooLargeDimensions(name, max, found) => {
                writeln!(
                    f,
                    "Too large image {name} {found}, configured maximum is {max}"
                )
            }
            SgiDecodeErrors::BadScanlineOffset(index, offset) => {
                writeln!(f, "Scanline {index} starts at invalid offset {offset}")
            }
            SgiDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            SgiDecodeErrors::RleErrors(err) => {
                writeln!(f, "RLE error: {err:?}")
            }
            SgiDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
            SgiDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for SgiDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SgiDecodeErrors {}

impl From<&'static str> for SgiDecodeErrors {
    fn from(value: &'static str) -> Self {
        SgiDecodeErrors::GenericStatic(value)
    }
}

impl From<ByteIoError> for SgiDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        SgiDecodeErrors::IoErrors(value)
    }
}

impl From<RleError> for SgiDecodeErrors {
    fn from(value: RleError) -> Self {
        SgiDecodeErrors::RleErrors(value)
    }
}

/// Errors encountered during encoding
pub enum SgiEncodeErrors {
    /// The format cannot be stored, SGI only holds 8 and 16 bit integers
    UnsupportedFormat(PixelFormat),
    /// Width or height does not fit the 16 bit header fields
    TooLargeDimensions(usize),
    /// Width or height is zero
    ZeroDimensions(usize, usize),
    /// Input holds fewer bytes than the options describe
    ///
    /// # Arguments
    /// - expected
    /// - found
    TooShortInput(usize, usize),
    RleErrors(RleError),
    IoErrors(ByteIoError)
}

impl Debug for SgiEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SgiEncodeErrors::UnsupportedFormat(format) => {
                writeln!(f, "Cannot encode image with format {format} into SGI")
            }
            SgiEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, SGI can only encode images up to {}",
                    u16::MAX
                )
            }
            SgiEncodeErrors::ZeroDimensions(width, height) => {
                writeln!(f, "Cannot encode an empty image of {width}x{height} pixels")
            }
            SgiEncodeErrors::TooShortInput(expected, found) => {
                writeln!(f, "Expected {expected} bytes of pixels but found {found}")
            }
            SgiEncodeErrors::RleErrors(err) => {
                writeln!(f, "RLE error: {err:?}")
            }
            SgiEncodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for SgiEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SgiEncodeErrors {}

impl From<ByteIoError> for SgiEncodeErrors {
    fn from(value: ByteIoError) -> Self {
        SgiEncodeErrors::IoErrors(value)
    }
}

impl From<RleError> for SgiEncodeErrors {
    fn from(value: RleError) -> Self {
        SgiEncodeErrors::RleErrors(value)
    }
}
