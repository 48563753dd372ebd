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
pub enum PicDecodeErrors {
    /// The image does not start with `0x5380f634`
    ///
    /// Indicates the file is not a PIC image
    WrongMagicBytes(u32),
    /// The id field is not `PICT`
    WrongId([u8; 4]),
    /// The channel packets describe neither RGB, RGBA nor RGB plus A
    ///
    /// # Arguments
    /// - channel mask of the first packet
    /// - bits of the first packet
    UnsupportedChannels(u8, u8),
    /// A packet uses an encoding other than raw or mixed RLE
    UnsupportedEncoding(u8),
    /// Width or height larger than the decoder options allow
    ///
    /// # Arguments
    /// - dimension name
    /// - maximum allowed
    /// - found
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer cannot hold the image
    TooSmallOutput(usize, usize),
    RleErrors(RleError),
    IoErrors(ByteIoError),
    GenericStatic(&'static str)
}

impl Debug for PicDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PicDecodeErrors::WrongMagicBytes(magic) => {
                writeln!(f, "Wrong magic {magic:#010x}, expected 0x5380f634")
            }
            PicDecodeErrors::WrongId(id) => {
                writeln!(f, "Wrong id {id:?}, expected PICT")
            }
            PicDecodeErrors::UnsupportedChannels(mask, bits) => {
                writeln!(
                    f,
                    "Unsupported channel packets, mask {mask:#04x} with {bits} bits"
                )
            }
            PicDecodeErrors::UnsupportedEncoding(kind) => {
                writeln!(f, "Unsupported packet encoding {kind}, expected 0 or 2")
            }
            PicDecodeErrors::TooLargeDimensions(name, max, found) => {
                writeln!(
                    f,
                    "Too large image {name} {found}, configured maximum is {max}"
                )
            }
            PicDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            PicDecodeErrors::RleErrors(err) => {
                writeln!(f, "RLE error: {err:?}")
            }
            PicDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
            PicDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for PicDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PicDecodeErrors {}

impl From<&'static str> for PicDecodeErrors {
    fn from(value: &'static str) -> Self {
        PicDecodeErrors::GenericStatic(value)
    }
}

impl From<ByteIoError> for PicDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        PicDecodeErrors::IoErrors(value)
    }
}

impl From<RleError> for PicDecodeErrors {
    fn from(value: RleError) -> Self {
        PicDecodeErrors::RleErrors(value)
    }
}

/// Errors encountered during encoding
pub enum PicEncodeErrors {
    /// Only RGB and RGBA with 8 bits per channel can be written
    UnsupportedFormat(PixelFormat),
    /// Width or height does not fit the 16 bit header fields
    TooLargeDimensions(usize),
    /// Input holds fewer bytes than the options describe
    ///
    /// # Arguments
    /// - expected
    /// - found
    TooShortInput(usize, usize),
    IoErrors(ByteIoError)
}

impl Debug for PicEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PicEncodeErrors::UnsupportedFormat(format) => {
                writeln!(f, "Cannot encode image with format {format} into PIC")
            }
            PicEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, PIC can only encode images up to {}",
                    u16::MAX
                )
            }
            PicEncodeErrors::TooShortInput(expected, found) => {
                writeln!(f, "Expected {expected} bytes of pixels but found {found}")
            }
            PicEncodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for PicEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PicEncodeErrors {}

impl From<ByteIoError> for PicEncodeErrors {
    fn from(value: ByteIoError) -> Self {
        PicEncodeErrors::IoErrors(value)
    }
}
