/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Traits for reading and writing images in kino
//!
//! This exposes the traits and implementations for readers
//! and writers used by the kino decoders and encoders.
use alloc::vec::Vec;

use crate::bytestream::reader::{ByteIoError, SeekFrom};

/// The input trait implemented for readers.
///
/// # Considerations
///
/// If you have an in memory buffer, use [`ByteCursor`](crate::bytestream::ByteCursor),
/// file backed input goes through a [`BufReader`](std::io::BufReader) when the `std` feature
/// is enabled.
pub trait ByteReaderTrait {
    /// Read exact bytes required to fill `buf` or return an error if that isn't possible
    ///
    /// ## Errors
    /// In case of an error, the implementation should not increment the internal position
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError>;

    /// Same as [`read_exact_bytes`](Self::read_exact_bytes) but with a size known at compile time
    fn read_const_bytes<const N: usize>(&mut self, buf: &mut [u8; N]) -> Result<(), ByteIoError>;

    /// Read bytes into `buf` returning how many bytes were read
    ///
    /// This doesn't guarantee that buf will be filled
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError>;

    /// Seek into a new position from the buffer
    ///
    /// Seeking past the end is allowed, the next read will fail.
    fn z_seek(&mut self, from: SeekFrom) -> Result<u64, ByteIoError>;

    /// Return the current position of the inner cursor.
    fn z_position(&mut self) -> Result<u64, ByteIoError>;

    /// Read all bytes remaining in this input to `sink` until we hit eof
    ///
    /// # Returns
    /// - `Ok(usize)` The actual number of bytes added to the sink
    fn read_remaining(&mut self, sink: &mut Vec<u8>) -> Result<usize, ByteIoError>;
}

/// The writer trait implemented for kino encoders
///
/// Anything that implements this trait can be used as a sink
/// for writing encoded images
pub trait ByteWriterTrait {
    /// Write all bytes to the sink or return an error if something occurred
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), ByteIoError>;

    /// Write a fixed number of bytes and error out if we can't write the bytes
    fn write_const_bytes<const N: usize>(&mut self, buf: &[u8; N]) -> Result<(), ByteIoError> {
        self.write_all_bytes(buf)
    }

    /// Ensure bytes are written to the sink.
    fn flush_bytes(&mut self) -> Result<(), ByteIoError>;

    /// A hint of how big we expect the encoded image to be
    ///
    /// In memory sinks may reserve space, others ignore it.
    fn reserve_capacity(&mut self, size: usize) -> Result<(), ByteIoError>;
}

impl ByteWriterTrait for &mut Vec<u8> {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), ByteIoError> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn flush_bytes(&mut self) -> Result<(), ByteIoError> {
        Ok(())
    }

    fn reserve_capacity(&mut self, size: usize) -> Result<(), ByteIoError> {
        self.reserve(size);
        Ok(())
    }
}
