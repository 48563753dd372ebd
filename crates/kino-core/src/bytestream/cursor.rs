/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::vec::Vec;

use crate::bytestream::{ByteIoError, ByteReaderTrait, SeekFrom};

/// An in memory reader
///
/// Cheaper than [`std::io::Cursor`] since reads go straight to slices
/// and it works without `std`
pub struct ByteCursor<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

impl<T: AsRef<[u8]>> ByteCursor<T> {
    pub fn new(buffer: T) -> ByteCursor<T> {
        ByteCursor {
            stream:   buffer,
            position: 0
        }
    }
    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.stream.as_ref().len().saturating_sub(self.position)
    }
}

impl<T: AsRef<[u8]>> ByteReaderTrait for ByteCursor<T> {
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let bytes = self.stream.as_ref();
        let end = self.position.saturating_add(buf.len());

        match bytes.get(self.position..end) {
            Some(slice) => {
                buf.copy_from_slice(slice);
                self.position = end;
                Ok(())
            }
            None => Err(ByteIoError::NotEnoughBytes(buf.len(), self.remaining()))
        }
    }

    fn read_const_bytes<const N: usize>(&mut self, buf: &mut [u8; N]) -> Result<(), ByteIoError> {
        self.read_exact_bytes(buf)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        let len = buf.len().min(self.remaining());
        let start = self.position.min(self.stream.as_ref().len());
        buf[..len].copy_from_slice(&self.stream.as_ref()[start..start + len]);
        self.position += len;
        Ok(len)
    }

    fn z_seek(&mut self, from: SeekFrom) -> Result<u64, ByteIoError> {
        let (base, offset) = match from {
            SeekFrom::Start(pos) => (0_i64, i64::try_from(pos)?),
            SeekFrom::End(pos) => (i64::try_from(self.stream.as_ref().len())?, pos),
            SeekFrom::Current(pos) => (i64::try_from(self.position)?, pos)
        };
        match base.checked_add(offset) {
            Some(new_pos) if new_pos >= 0 => {
                self.position = usize::try_from(new_pos)?;
                Ok(new_pos as u64)
            }
            _ => Err(ByteIoError::SeekError(
                "Cannot seek before the start of the stream"
            ))
        }
    }

    fn z_position(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.position as u64)
    }

    fn read_remaining(&mut self, sink: &mut Vec<u8>) -> Result<usize, ByteIoError> {
        let bytes = self.stream.as_ref();
        let start = self.position.min(bytes.len());
        sink.extend_from_slice(&bytes[start..]);
        self.position = bytes.len();
        Ok(bytes.len() - start)
    }
}

#[cfg(test)]
mod tests {
    use crate::bytestream::{ByteCursor, ByteEndian, ByteReader, SeekFrom};

    #[test]
    fn endian_reads() {
        let data = [0x01, 0xDA, 0xDA, 0x01, 0, 0, 0, 7];
        let mut reader = ByteReader::new(ByteCursor::new(&data));
        assert_eq!(reader.get_u16_be_err().unwrap(), 474);
        assert_eq!(reader.get_u16(ByteEndian::LE).unwrap(), 474);
        assert_eq!(reader.get_u32_be_err().unwrap(), 7);
        assert!(reader.get_u8_err().is_err());
    }

    #[test]
    fn failed_read_keeps_position() {
        let data = [1, 2, 3];
        let mut reader = ByteReader::new(ByteCursor::new(&data));
        reader.skip(2).unwrap();
        assert!(reader.get_u16_be_err().is_err());
        assert_eq!(reader.position().unwrap(), 2);
        assert!(reader.seek(SeekFrom::Current(-3)).is_err());
        assert_eq!(reader.remaining_bytes().unwrap(), &[3]);
    }
}
