/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Formatter;

use crate::bytestream::{ByteEndian, ByteReaderTrait};

/// Enumeration of possible methods to seek within an I/O object.
///
/// It is analogous to the [SeekFrom](std::io::SeekFrom) in the std library but
/// it's here to allow this to work in no-std crates
#[derive(Copy, PartialEq, Eq, Clone, Debug)]
pub enum SeekFrom {
    /// Sets the offset to the provided number of bytes.
    Start(u64),
    /// Sets the offset to the size of this object plus the specified number of
    /// bytes.
    End(i64),
    /// Sets the offset to the current position plus the specified number of
    /// bytes.
    Current(i64)
}

impl SeekFrom {
    #[cfg(feature = "std")]
    pub(crate) fn to_std_seek(self) -> std::io::SeekFrom {
        match self {
            SeekFrom::Start(pos) => std::io::SeekFrom::Start(pos),
            SeekFrom::End(pos) => std::io::SeekFrom::End(pos),
            SeekFrom::Current(pos) => std::io::SeekFrom::Current(pos)
        }
    }
}

/// Errors from reading or writing a byte stream
pub enum ByteIoError {
    #[cfg(feature = "std")]
    StdIoError(std::io::Error),
    TryFromIntError(core::num::TryFromIntError),
    /// requested, available
    NotEnoughBytes(usize, usize),
    Generic(&'static str),
    SeekError(&'static str),
    SeekErrorOwned(String)
}

impl core::fmt::Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            ByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            ByteIoError::TryFromIntError(err) => {
                writeln!(f, "Cannot convert to int {}", err)
            }
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
            ByteIoError::SeekError(err) => {
                writeln!(f, "Seek error: {err}")
            }
            ByteIoError::SeekErrorOwned(err) => {
                writeln!(f, "Seek error {err}")
            }
        }
    }
}

impl core::fmt::Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ByteIoError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for ByteIoError {
    fn from(value: std::io::Error) -> Self {
        ByteIoError::StdIoError(value)
    }
}

impl From<core::num::TryFromIntError> for ByteIoError {
    fn from(value: core::num::TryFromIntError) -> Self {
        ByteIoError::TryFromIntError(value)
    }
}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

/// An endian aware reader wrapping any [`ByteReaderTrait`] source
pub struct ByteReader<T: ByteReaderTrait> {
    inner:       T,
    temp_buffer: Vec<u8>
}

impl<T: ByteReaderTrait> ByteReader<T> {
    pub fn new(source: T) -> ByteReader<T> {
        ByteReader {
            inner:       source,
            temp_buffer: Vec::new()
        }
    }
    #[inline(always)]
    pub fn skip(&mut self, num: usize) -> Result<u64, ByteIoError> {
        self.inner.z_seek(SeekFrom::Current(i64::try_from(num)?))
    }
    #[inline(always)]
    pub fn seek(&mut self, from: SeekFrom) -> Result<u64, ByteIoError> {
        self.inner.z_seek(from)
    }
    #[inline]
    pub fn set_position(&mut self, position: u64) -> Result<(), ByteIoError> {
        self.seek(SeekFrom::Start(position))?;
        Ok(())
    }
    #[inline(always)]
    pub fn position(&mut self) -> Result<u64, ByteIoError> {
        self.inner.z_position()
    }
    #[inline(always)]
    pub fn get_u8_err(&mut self) -> Result<u8, ByteIoError> {
        let mut buf = [0];
        self.inner.read_const_bytes(&mut buf)?;
        Ok(buf[0])
    }
    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        self.inner.read_const_bytes(&mut byte_store)?;
        Ok(byte_store)
    }
    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.inner.read_exact_bytes(buf)
    }
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.inner.read_bytes(buf)
    }
    /// Read everything from the current position to the end of the stream
    pub fn remaining_bytes(&mut self) -> Result<&[u8], ByteIoError> {
        self.temp_buffer.clear();
        let bytes_read = self.inner.read_remaining(&mut self.temp_buffer)?;
        Ok(&self.temp_buffer[..bytes_read])
    }
    /// Read everything from the current position into a new vector
    pub fn remaining_to_vec(&mut self) -> Result<Vec<u8>, ByteIoError> {
        let mut sink = Vec::new();
        self.inner.read_remaining(&mut sink)?;
        Ok(sink)
    }
}

macro_rules! get_single_type {
    ($name:tt,$name_be:tt,$name_le:tt,$int_type:tt) => {
        impl<T: ByteReaderTrait> ByteReader<T> {
            #[doc=concat!("Read a ",stringify!($int_type)," stored in `endian` byte order")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name(&mut self, endian: ByteEndian) -> Result<$int_type, ByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                self.inner.read_const_bytes(&mut space)?;

                Ok(match endian {
                    ByteEndian::BE => $int_type::from_be_bytes(space),
                    ByteEndian::LE => $int_type::from_le_bytes(space)
                })
            }
            #[doc=concat!("Read ",stringify!($int_type)," as a big endian value")]
            #[inline]
            pub fn $name_be(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name(ByteEndian::BE)
            }
            #[doc=concat!("Read ",stringify!($int_type)," as a little endian value")]
            #[inline]
            pub fn $name_le(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name(ByteEndian::LE)
            }
        }
    };
}

get_single_type!(get_u16, get_u16_be_err, get_u16_le_err, u16);
get_single_type!(get_u32, get_u32_be_err, get_u32_le_err, u32);
get_single_type!(get_i32, get_i32_be_err, get_i32_le_err, i32);
get_single_type!(get_f32, get_f32_be_err, get_f32_le_err, f32);
