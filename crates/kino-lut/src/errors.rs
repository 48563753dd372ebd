/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

use kino_core::bytestream::ByteIoError;
use kino_core::pixel::PixelFormat;

/// Errors possible during decoding
pub enum LutDecodeErrors {
    /// An Inferno table does not start with `LUT:`
    ///
    /// Indicates the file is not an Inferno table
    WrongMagic(String),
    /// No entry line was found in a Kodak table
    NoEntries,
    /// The channel count and bit depth do not describe a pixel format
    ///
    /// # Arguments
    /// - channels
    /// - bit depth
    UnsupportedFormat(usize, u8),
    /// A word that should be a number is not one
    InvalidNumber(String),
    /// The table holds fewer values than the header announces
    ///
    /// # Arguments
    /// - expected
    /// - found
    MissingValues(usize, usize),
    /// Table size larger than the decoder options allow
    ///
    /// # Arguments
    /// - maximum allowed
    /// - found
    TooLargeDimensions(usize, usize),
    /// The output buffer cannot hold the table
    TooSmallOutput(usize, usize),
    IoErrors(ByteIoError),
    GenericStatic(&'static str)
}

impl Debug for LutDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            LutDecodeErrors::WrongMagic(word) => {
                writeln!(f, "Expected LUT: as the first word but found {word:?}")
            }
            LutDecodeErrors::NoEntries => {
                writeln!(f, "Table has no entries")
            }
            LutDecodeErrors::UnsupportedFormat(channels, depth) => {
                writeln!(f, "Unsupported table of {channels} channels at {depth} bits")
            }
            LutDecodeErrors::InvalidNumber(word) => {
                writeln!(f, "Invalid number {word:?}")
            }
            LutDecodeErrors::MissingValues(expected, found) => {
                writeln!(f, "Expected {expected} values but found {found}")
            }
            LutDecodeErrors::TooLargeDimensions(max, found) => {
                writeln!(
                    f,
                    "Too large table size {found}, configured maximum width is {max}"
                )
            }
            LutDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            LutDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
            LutDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
        }
    }
}

impl Display for LutDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LutDecodeErrors {}

impl From<&'static str> for LutDecodeErrors {
    fn from(value: &'static str) -> Self {
        LutDecodeErrors::GenericStatic(value)
    }
}

impl From<ByteIoError> for LutDecodeErrors {
    fn from(value: ByteIoError) -> Self {
        LutDecodeErrors::IoErrors(value)
    }
}

/// Errors encountered during encoding
pub enum LutEncodeErrors {
    /// Tables hold 8, 10 or 16 bit integers
    UnsupportedFormat(PixelFormat),
    /// Tables are a single row
    NotOneRow(usize),
    /// Input holds fewer bytes than the options describe
    ///
    /// # Arguments
    /// - expected
    /// - found
    TooShortInput(usize, usize),
    IoErrors(ByteIoError)
}

impl Debug for LutEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            LutEncodeErrors::UnsupportedFormat(format) => {
                writeln!(f, "Cannot write a table with format {format}")
            }
            LutEncodeErrors::NotOneRow(height) => {
                writeln!(f, "Tables are one row high, image has {height} rows")
            }
            LutEncodeErrors::TooShortInput(expected, found) => {
                writeln!(f, "Expected {expected} bytes of pixels but found {found}")
            }
            LutEncodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for LutEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LutEncodeErrors {}

impl From<ByteIoError> for LutEncodeErrors {
    fn from(value: ByteIoError) -> Self {
        LutEncodeErrors::IoErrors(value)
    }
}
