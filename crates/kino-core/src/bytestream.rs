/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A simple implementation of a bytestream reader
//! and writer.
//!
//! The container formats handled by kino disagree on byte order,
//! SGI and PIC are big endian, Targa is little endian and a Cineon file
//! announces its order through its magic number.
//! Readers and writers here therefore take the endianness
//! as a runtime [`ByteEndian`] argument.
use alloc::string::String;

pub use cursor::ByteCursor;
pub use reader::{ByteIoError, ByteReader, SeekFrom};
pub use traits::{ByteReaderTrait, ByteWriterTrait};
pub use writer::ByteWriter;

mod cursor;
mod reader;
mod std_impls;
mod traits;
mod writer;

/// Byte order of multi-byte values in a stream or buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteEndian {
    /// Little endian, least significant byte first
    LE,
    /// Big endian, most significant byte first
    BE
}

impl ByteEndian {
    /// Byte order of the machine we are running on
    pub const fn native() -> ByteEndian {
        if cfg!(target_endian = "big") {
            ByteEndian::BE
        } else {
            ByteEndian::LE
        }
    }
    /// Whether values in this order must be swapped to be used natively
    pub const fn needs_swap(self) -> bool {
        !matches!(
            (self, ByteEndian::native()),
            (ByteEndian::LE, ByteEndian::LE) | (ByteEndian::BE, ByteEndian::BE)
        )
    }
}

/// Read a fixed size, NUL padded text field
///
/// Stops at the first NUL, invalid UTF-8 is replaced.
pub fn fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Reverse the byte order of every `width` sized sample in `data`
///
/// Used to convert multi-byte samples between stream and native order.
/// A trailing partial sample is left untouched.
pub fn swap_samples(data: &mut [u8], width: usize) {
    if width > 1 {
        data.chunks_exact_mut(width).for_each(|sample| sample.reverse());
    }
}
