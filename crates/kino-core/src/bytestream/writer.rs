/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use crate::bytestream::{ByteEndian, ByteIoError, ByteWriterTrait};

/// Encapsulates a simple byte writer with
/// support for endian aware writes
pub struct ByteWriter<T: ByteWriterTrait> {
    buffer:        T,
    bytes_written: usize
}

impl<T: ByteWriterTrait> ByteWriter<T> {
    /// Create a new writer for the stream
    pub fn new(data: T) -> ByteWriter<T> {
        ByteWriter {
            buffer:        data,
            bytes_written: 0
        }
    }
    /// Destroy this writer returning the sink
    pub fn inner(self) -> T {
        self.buffer
    }
    /// Return the number of bytes the writer has written
    ///
    /// ```
    /// use kino_core::bytestream::ByteWriter;
    /// let mut sink = vec![];
    /// let mut stream = ByteWriter::new(&mut sink);
    /// stream.write_u8_err(1).unwrap();
    /// assert_eq!(stream.bytes_written(), 1);
    /// ```
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }
    /// Write all bytes in `buf` or error out
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), ByteIoError> {
        self.buffer.write_all_bytes(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }
    pub fn write_const_bytes<const N: usize>(&mut self, buf: &[u8; N]) -> Result<(), ByteIoError> {
        self.buffer.write_const_bytes(buf)?;
        self.bytes_written += N;
        Ok(())
    }
    /// Write a single byte into the bytestream or error out
    /// if the sink refuses it
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), ByteIoError> {
        self.write_const_bytes(&[byte])
    }
    /// Write `count` zero bytes, used for header padding
    pub fn write_zeros(&mut self, count: usize) -> Result<(), ByteIoError> {
        self.write_repeated(0, count)
    }
    /// Write `byte` `count` times
    pub fn write_repeated(&mut self, byte: u8, count: usize) -> Result<(), ByteIoError> {
        let chunk = [byte; 64];
        let mut left = count;
        while left > 0 {
            let size = left.min(chunk.len());
            self.write_all(&chunk[..size])?;
            left -= size;
        }
        Ok(())
    }
    /// Write `value` as a fixed size field, truncated or padded with zeros to `N` bytes
    pub fn write_fixed_str<const N: usize>(&mut self, value: &str) -> Result<(), ByteIoError> {
        let mut field = [0_u8; N];
        let len = value.len().min(N);
        field[..len].copy_from_slice(&value.as_bytes()[..len]);
        self.write_const_bytes(&field)
    }
    pub fn flush(&mut self) -> Result<(), ByteIoError> {
        self.buffer.flush_bytes()
    }
    pub fn reserve(&mut self, size: usize) -> Result<(), ByteIoError> {
        self.buffer.reserve_capacity(size)
    }
}

macro_rules! write_single_type {
    ($name:tt,$name_be:tt,$name_le:tt,$int_type:tt) => {
        impl<T: ByteWriterTrait> ByteWriter<T> {
            #[doc=concat!("Write a ",stringify!($int_type)," in `endian` byte order")]
            #[inline]
            pub fn $name(&mut self, value: $int_type, endian: ByteEndian) -> Result<(), ByteIoError> {
                let bytes = match endian {
                    ByteEndian::BE => value.to_be_bytes(),
                    ByteEndian::LE => value.to_le_bytes()
                };
                self.write_const_bytes(&bytes)
            }
            #[doc=concat!("Write ",stringify!($int_type)," as a big endian value")]
            #[inline]
            pub fn $name_be(&mut self, value: $int_type) -> Result<(), ByteIoError> {
                self.$name(value, ByteEndian::BE)
            }
            #[doc=concat!("Write ",stringify!($int_type)," as a little endian value")]
            #[inline]
            pub fn $name_le(&mut self, value: $int_type) -> Result<(), ByteIoError> {
                self.$name(value, ByteEndian::LE)
            }
        }
    };
}

write_single_type!(write_u16, write_u16_be_err, write_u16_le_err, u16);
write_single_type!(write_u32, write_u32_be_err, write_u32_le_err, u32);
write_single_type!(write_i32, write_i32_be_err, write_i32_le_err, i32);
write_single_type!(write_f32, write_f32_be_err, write_f32_le_err, f32);
