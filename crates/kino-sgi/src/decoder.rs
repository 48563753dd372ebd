/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::vec;
use alloc::vec::Vec;

use kino_core::bytestream::{ByteEndian, ByteReader, ByteReaderTrait};
use kino_core::info::{Compression, ImageInfo};
use kino_core::log::trace;
use kino_core::options::DecoderOptions;
use kino_core::rle::planar;

use crate::errors::SgiDecodeErrors;
use crate::header::SgiHeader;

/// An SGI decoder
///
/// Pixels are returned exactly as stored, one channel plane after the
/// other with the bottom row first. 16 bit RLE samples come out native
/// endian, verbatim 16 bit samples keep their big endian byte order.
/// The layout in [`info`](SgiDecoder::info) records which is the case.
pub struct SgiDecoder<T: ByteReaderTrait> {
    stream:          ByteReader<T>,
    options:         DecoderOptions,
    header:          SgiHeader,
    info:            ImageInfo,
    decoded_headers: bool
}

impl<T: ByteReaderTrait> SgiDecoder<T> {
    /// Create a new decoder with default options
    pub fn new(data: T) -> SgiDecoder<T> {
        SgiDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: T, options: DecoderOptions) -> SgiDecoder<T> {
        SgiDecoder {
            stream: ByteReader::new(data),
            options,
            header: SgiHeader::default(),
            info: ImageInfo::default(),
            decoded_headers: false
        }
    }

    /// Read and validate the header
    ///
    /// Called implicitly by [`decode`](Self::decode)
    pub fn decode_headers(&mut self) -> Result<(), SgiDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        self.header = SgiHeader::read(&mut self.stream)?;
        self.info = self.header.to_info(&self.options)?;
        self.decoded_headers = true;
        Ok(())
    }

    /// Image information, or `None` before headers are decoded
    pub fn info(&self) -> Option<&ImageInfo> {
        self.decoded_headers.then_some(&self.info)
    }

    pub fn header(&self) -> Option<&SgiHeader> {
        self.decoded_headers.then_some(&self.header)
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.info().map(ImageInfo::dimensions)
    }

    /// Bytes needed to hold the decoded image
    pub fn output_buffer_size(&self) -> Option<usize> {
        self.info().map(ImageInfo::data_byte_count)
    }

    /// Decode the image into a newly allocated buffer
    pub fn decode(&mut self) -> Result<Vec<u8>, SgiDecodeErrors> {
        self.decode_headers()?;
        let mut out = vec![0; self.info.data_byte_count()];
        self.decode_into(&mut out)?;
        Ok(out)
    }

    /// Decode the image into `sink`
    ///
    /// `sink` must hold at least [`output_buffer_size`](Self::output_buffer_size) bytes
    pub fn decode_into(&mut self, sink: &mut [u8]) -> Result<(), SgiDecodeErrors> {
        self.decode_headers()?;

        let size = self.info.data_byte_count();
        if sink.len() < size {
            return Err(SgiDecodeErrors::TooSmallOutput(size, sink.len()));
        }
        let sink = &mut sink[..size];

        match self.info.compression {
            Compression::None => self.stream.read_exact_bytes(sink)?,
            Compression::Rle => self.decode_rle(sink)?
        }
        Ok(())
    }

    fn decode_rle(&mut self, sink: &mut [u8]) -> Result<(), SgiDecodeErrors> {
        let width = usize::from(self.header.width);
        let height = usize::from(self.header.height);
        let sample_width = usize::from(self.header.bytes_per_channel);
        let scanlines = height * self.header.channel_count();

        let mut starts = vec![0_u32; scanlines];
        let mut lengths = vec![0_u32; scanlines];

        for start in starts.iter_mut() {
            *start = self.stream.get_u32_be_err()?;
        }
        for length in lengths.iter_mut() {
            *length = self.stream.get_u32_be_err()?;
        }
        // offsets in the tables are absolute, so remember where the rest begins
        let base = self.stream.position()? as usize;
        let data = self.stream.remaining_bytes()?;

        trace!("RLE payload: {} bytes after offset {}", data.len(), base);

        let row_bytes = width * sample_width;

        // table index is `row + height * channel`, as are planar scanlines
        for (index, (start, length)) in starts.iter().zip(lengths.iter()).enumerate() {
            let offset = (*start as usize)
                .checked_sub(base)
                .filter(|offset| *offset <= data.len())
                .ok_or(SgiDecodeErrors::BadScanlineOffset(index, *start))?;
            let end = offset.saturating_add(*length as usize).min(data.len());

            let out = &mut sink[index * row_bytes..(index + 1) * row_bytes];
            planar::decode(&data[offset..end], out, sample_width, ByteEndian::BE)?;
        }
        // the RLE decoder already produced native samples
        self.info.default_layer_mut().layout.endian = ByteEndian::native();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kino_core::bytestream::{ByteCursor, ByteEndian};
    use kino_core::info::Compression;
    use kino_core::pixel::PixelFormat;

    use crate::{SgiDecodeErrors, SgiDecoder};

    fn header(storage: u8, bytes: u8, dimension: u16, size: [u16; 3], max: u32) -> Vec<u8> {
        let mut data = vec![0; 512];
        data[0..2].copy_from_slice(&474_u16.to_be_bytes());
        data[2] = storage;
        data[3] = bytes;
        data[4..6].copy_from_slice(&dimension.to_be_bytes());
        data[6..8].copy_from_slice(&size[0].to_be_bytes());
        data[8..10].copy_from_slice(&size[1].to_be_bytes());
        data[10..12].copy_from_slice(&size[2].to_be_bytes());
        data[16..20].copy_from_slice(&max.to_be_bytes());
        data
    }

    #[test]
    fn rle_rgb_header() {
        let data = header(1, 1, 3, [4, 2, 3], 255);
        let mut decoder = SgiDecoder::new(ByteCursor::new(data));
        decoder.decode_headers().unwrap();

        let info = decoder.info().unwrap();
        assert_eq!(info.dimensions(), (4, 2));
        assert_eq!(info.format(), PixelFormat::RGB_U8);
        assert_eq!(info.compression, Compression::Rle);
    }

    #[test]
    fn wrong_magic() {
        let mut data = header(0, 1, 2, [1, 1, 1], 255);
        data[1] = 0;
        let err = SgiDecoder::new(ByteCursor::new(data)).decode_headers();
        assert!(matches!(err, Err(SgiDecodeErrors::WrongMagicBytes(_))));
    }

    #[test]
    fn four_byte_channels_are_unsupported() {
        let data = header(0, 4, 2, [1, 1, 1], 255);
        let err = SgiDecoder::new(ByteCursor::new(data)).decode_headers();
        assert!(matches!(err, Err(SgiDecodeErrors::UnsupportedFormat(1, 4))));
    }

    #[test]
    fn verbatim_planes() {
        let mut data = header(0, 1, 3, [2, 1, 3], 255);
        data.extend_from_slice(&[1, 2, 10, 20, 100, 200]);

        let mut decoder = SgiDecoder::new(ByteCursor::new(data));
        let pixels = decoder.decode().unwrap();
        assert_eq!(pixels, [1, 2, 10, 20, 100, 200]);
    }

    #[test]
    fn rle_scanlines_with_absolute_offsets() {
        // 2x2 grey, 16 bit, rows written in reverse order in the file
        let mut data = header(1, 2, 2, [2, 2, 1], 65535);
        let tables = 512 + 2 * 4 + 2 * 4;
        // row 0: one repeat packet of 2 * 0x0102, terminator
        let row0: [u8; 6] = [0, 2, 1, 2, 0, 0];
        // row 1: literal packet of two samples
        let row1: [u8; 8] = [0, 0x82, 0, 3, 0, 4, 0, 0];

        let row1_at = tables as u32;
        let row0_at = row1_at + row1.len() as u32;
        for v in [row0_at, row1_at, row0.len() as u32, row1.len() as u32] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(&row1);
        data.extend_from_slice(&row0);

        let mut decoder = SgiDecoder::new(ByteCursor::new(data));
        let pixels = decoder.decode().unwrap();

        let expected: Vec<u8> = [0x0102_u16, 0x0102, 3, 4]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        assert_eq!(pixels, expected);
        assert_eq!(decoder.info().unwrap().layout().endian, ByteEndian::native());
    }

    #[test]
    fn offset_before_payload_is_rejected() {
        let mut data = header(1, 1, 2, [1, 1, 1], 255);
        data.extend_from_slice(&4_u32.to_be_bytes());
        data.extend_from_slice(&2_u32.to_be_bytes());
        data.extend_from_slice(&[0x81, 7]);

        let err = SgiDecoder::new(ByteCursor::new(data)).decode();
        assert!(matches!(err, Err(SgiDecodeErrors::BadScanlineOffset(0, 4))));
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut data = header(0, 1, 3, [2, 2, 3], 255);
        data.extend_from_slice(&[0; 11]);
        assert!(SgiDecoder::new(ByteCursor::new(data)).decode().is_err());
    }
}
