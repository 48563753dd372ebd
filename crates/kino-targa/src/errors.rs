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

/// Possible errors that may occur during decoding
pub enum TargaDecodeErrors {
    /// The image type is not one Targa defines
    ///
    /// Targa has no magic bytes, so this is the best sign that the
    /// input is not a Targa file
    UnknownImageType(u8),
    /// A valid image type this decoder does not handle,
    /// e.g colour mapped images
    UnsupportedImageType(u8),
    /// Bits per pixel do not match the image type
    ///
    /// # Arguments
    /// - image type
    /// - bits per pixel
    UnsupportedPixelBits(u8, u8),
    /// Alpha bits in the descriptor are neither 0 nor 8
    UnsupportedAlphaBits(u8),
    /// Pixel and alpha bits together are not byte aligned
    /// or too few for the channels
    InvalidBitCount(u32),
    /// Width or height larger than the decoder options allow
    ///
    /// # Arguments
    /// - dimension name
    /// - maximum allowed
    /// - found
    TooLargeDimensions(&'static str, usize, usize),
    TooSmallOutput(usize, usize),
    RleErrors(RleError),
    IoErrors(ByteIoError),
    GenericStatic(&'static str)
}

impl Debug for TargaDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TargaDecodeErrors::UnknownImageType(kind) => {
                writeln!(f, "Unknown image type {kind}, input is likely not a Targa file")
            }
            TargaDecodeErrors::UnsupportedImageType(kind) => {
                writeln!(f, "Unsupported image type {kind}, only 2, 3, 10 and 11 are supported")
            }
            TargaDecodeErrors::UnsupportedPixelBits(kind, bits) => {
                writeln!(f, "Unsupported {bits} bits per pixel for image type {kind}")
            }
            TargaDecodeErrors::UnsupportedAlphaBits(bits) => {
                writeln!(f, "Unsupported {bits} alpha bits, expected 0 or 8")
            }
            TargaDecodeErrors::InvalidBitCount(bits) => {
                writeln!(f, "Invalid total bit count {bits}")
            }
            TargaDecodeErrors::TooLargeDimensions(name, max, found) => {
                writeln!(
                    f,
                    "Too large image {name} {found}, configured maximum is {max}"
                )
            }
            TargaDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            TargaDecodeErrors::RleErrors(err) => {
                writeln!(f, "RLE error: {err:?}")
            }
            TargaDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
            TargaDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for TargaDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TargaDecodeErrors {}

impl From<&'static str> for TargaDecodeErrors {
    fn from(value: &'static str) -> Self {
        TargaDecodeErrors::GenericStatic(value)
    }
}

impl From<ByteIoError> for TargaDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        TargaDecodeErrors::IoErrors(value)
    }
}

impl From<RleError> for TargaDecodeErrors {
    fn from(value: RleError) -> Self {
        TargaDecodeErrors::RleErrors(value)
    }
}

/// Errors encountered during encoding
pub enum TargaEncodeErrors {
    /// Only 8 bit formats can be stored
    UnsupportedFormat(PixelFormat),
    /// Width or height does not fit the 16 bit header fields
    TooLargeDimensions(usize),
    TooShortInput(usize, usize),
    RleErrors(RleError),
    IoErrors(ByteIoError)
}

impl Debug for TargaEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TargaEncodeErrors::UnsupportedFormat(format) => {
                writeln!(f, "Cannot encode image with format {format} into Targa")
            }
            TargaEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, Targa can only encode images up to {}",
                    u16::MAX
                )
            }
            TargaEncodeErrors::TooShortInput(expected, found) => {
                writeln!(f, "Expected {expected} bytes of pixels but found {found}")
            }
            TargaEncodeErrors::RleErrors(err) => {
                writeln!(f, "RLE error: {err:?}")
            }
            TargaEncodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for TargaEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TargaEncodeErrors {}

impl From<ByteIoError> for TargaEncodeErrors {
    fn from(value: ByteIoError) -> Self {
        TargaEncodeErrors::IoErrors(value)
    }
}

impl From<RleError> for TargaEncodeErrors {
    fn from(value: RleError) -> Self {
        TargaEncodeErrors::RleErrors(value)
    }
}
