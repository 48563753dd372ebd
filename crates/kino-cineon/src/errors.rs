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

/// Errors possible during decoding
pub enum CineonDecodeErrors {
    /// The first four bytes are not the Cineon magic in either byte order
    WrongMagicBytes(u32),
    /// The header announces no channels or more than eight
    UnsupportedChannels(u8),
    /// A channel differs from the first one in size or bit depth
    ///
    /// # Arguments
    /// - channel index
    MismatchedChannel(usize),
    /// Only three 10 bit channels are supported
    ///
    /// # Arguments
    /// - channels
    /// - bits per channel
    UnsupportedLayout(u8, u8),
    /// Rows or channels are padded
    ///
    /// # Arguments
    /// - line padding
    /// - channel padding
    UnsupportedPadding(u32, u32),
    /// Width or height larger than the decoder options allow
    ///
    /// # Arguments
    /// - dimension name
    /// - maximum allowed
    /// - found
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer cannot hold the image
    TooSmallOutput(usize, usize),
    IoErrors(ByteIoError),
    GenericStatic(&'static str)
}

impl Debug for CineonDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CineonDecodeErrors::WrongMagicBytes(magic) => {
                writeln!(f, "Wrong magic {magic:#010x}, expected 0x802a5fd7 in either byte order")
            }
            CineonDecodeErrors::UnsupportedChannels(channels) => {
                writeln!(f, "Unsupported channel count {channels}")
            }
            CineonDecodeErrors::MismatchedChannel(index) => {
                writeln!(f, "Channel {index} differs in size or depth from channel 0")
            }
            CineonDecodeErrors::UnsupportedLayout(channels, bits) => {
                writeln!(
                    f,
                    "Unsupported layout of {channels} channels at {bits} bits, expected 3 channels at 10 bits"
                )
            }
            CineonDecodeErrors::UnsupportedPadding(line, channel) => {
                writeln!(
                    f,
                    "Padded data is not supported, line padding {line}, channel padding {channel}"
                )
            }
            CineonDecodeErrors::TooLargeDimensions(name, max, found) => {
                writeln!(
                    f,
                    "Too large image {name} {found}, configured maximum is {max}"
                )
            }
            CineonDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            CineonDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
            CineonDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for CineonDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CineonDecodeErrors {}

impl From<&'static str> for CineonDecodeErrors {
    fn from(value: &'static str) -> Self {
        CineonDecodeErrors::GenericStatic(value)
    }
}

impl From<ByteIoError> for CineonDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        CineonDecodeErrors::IoErrors(value)
    }
}

/// Errors encountered during encoding
pub enum CineonEncodeErrors {
    /// Only 10 bit RGB can be written
    UnsupportedFormat(PixelFormat),
    /// Input holds fewer bytes than the options describe
    ///
    /// # Arguments
    /// - expected
    /// - found
    TooShortInput(usize, usize),
    /// Width or height does not fit the 32 bit header fields
    TooLargeDimensions(usize),
    /// Encoded file would not fit the 32 bit size field
    TooLargeFile(usize),
    IoErrors(ByteIoError)
}

impl Debug for CineonEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CineonEncodeErrors::UnsupportedFormat(format) => {
                writeln!(f, "Cannot encode image with format {format} into Cineon")
            }
            CineonEncodeErrors::TooShortInput(expected, found) => {
                writeln!(f, "Expected {expected} bytes of pixels but found {found}")
            }
            CineonEncodeErrors::TooLargeDimensions(found) => {
                writeln!(f, "Too large image dimensions {found}")
            }
            CineonEncodeErrors::TooLargeFile(size) => {
                writeln!(f, "Cineon file of {size} bytes exceeds the 4 GiB limit")
            }
            CineonEncodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for CineonEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CineonEncodeErrors {}

impl From<ByteIoError> for CineonEncodeErrors {
    fn from(value: ByteIoError) -> Self {
        CineonEncodeErrors::IoErrors(value)
    }
}
