/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::vec;
use alloc::vec::Vec;

use kino_core::bytestream::{ByteReader, ByteReaderTrait};
use kino_core::info::{Compression, ImageInfo};
use kino_core::options::DecoderOptions;
use kino_core::rle::interleaved;

use crate::errors::TargaDecodeErrors;
use crate::header::TargaHeader;

/// A Targa decoder
///
/// Pixels come out in file order, blue first for colour images and
/// with the row and column order the descriptor announces.
pub struct TargaDecoder<T: ByteReaderTrait> {
    stream:          ByteReader<T>,
    options:         DecoderOptions,
    header:          TargaHeader,
    info:            ImageInfo,
    decoded_headers: bool
}

impl<T: ByteReaderTrait> TargaDecoder<T> {
    pub fn new(data: T) -> TargaDecoder<T> {
        TargaDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: T, options: DecoderOptions) -> TargaDecoder<T> {
        TargaDecoder {
            stream: ByteReader::new(data),
            options,
            header: TargaHeader::default(),
            info: ImageInfo::default(),
            decoded_headers: false
        }
    }

    pub fn decode_headers(&mut self) -> Result<(), TargaDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        self.header = TargaHeader::read(&mut self.stream)?;
        self.info = self.header.to_info(&self.options)?;
        self.decoded_headers = true;
        Ok(())
    }

    pub fn info(&self) -> Option<&ImageInfo> {
        self.decoded_headers.then_some(&self.info)
    }

    pub fn header(&self) -> Option<&TargaHeader> {
        self.decoded_headers.then_some(&self.header)
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.info().map(ImageInfo::dimensions)
    }

    pub fn output_buffer_size(&self) -> Option<usize> {
        self.info().map(ImageInfo::data_byte_count)
    }

    pub fn decode(&mut self) -> Result<Vec<u8>, TargaDecodeErrors> {
        self.decode_headers()?;
        let mut out = vec![0; self.info.data_byte_count()];
        self.decode_into(&mut out)?;
        Ok(out)
    }

    pub fn decode_into(&mut self, sink: &mut [u8]) -> Result<(), TargaDecodeErrors> {
        self.decode_headers()?;

        let size = self.info.data_byte_count();
        if sink.len() < size {
            return Err(TargaDecodeErrors::TooSmallOutput(size, sink.len()));
        }
        let sink = &mut sink[..size];

        match self.info.compression {
            Compression::None => self.stream.read_exact_bytes(sink)?,
            Compression::Rle => {
                let pixel_width = self.info.format().byte_width();
                // packets may run across scanlines, decode the whole image at once
                let data = self.stream.remaining_bytes()?;
                interleaved::decode(data, sink, pixel_width)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kino_core::bytestream::ByteCursor;
    use kino_core::pixel::PixelFormat;

    use crate::{TargaDecodeErrors, TargaDecoder};

    fn file(image_type: u8, pixel_bits: u8, descriptor: u8, id: &[u8], body: &[u8]) -> Vec<u8> {
        let mut data = vec![id.len() as u8, 0, image_type, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend_from_slice(&2_u16.to_le_bytes());
        data.extend_from_slice(&1_u16.to_le_bytes());
        data.extend_from_slice(&[pixel_bits, descriptor]);
        data.extend_from_slice(id);
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn raw_bgr_after_id_block() {
        let data = file(2, 24, 0, b"hello", &[1, 2, 3, 4, 5, 6]);
        let mut decoder = TargaDecoder::new(ByteCursor::new(data));
        let pixels = decoder.decode().unwrap();
        let info = decoder.info().unwrap();

        assert_eq!(pixels, [1, 2, 3, 4, 5, 6]);
        assert_eq!(info.format(), PixelFormat::RGB_U8);
        assert!(info.layout().bgr);
        assert_eq!(info.tag("Description"), Some("hello"));
    }

    #[test]
    fn rle_grey_with_alpha() {
        // one repeat packet covering both pixels
        let data = file(11, 16, 0x08, b"", &[0x81, 10, 255]);
        let pixels = TargaDecoder::new(ByteCursor::new(data)).decode().unwrap();
        assert_eq!(pixels, [10, 255, 10, 255]);
    }

    #[test]
    fn truncated_rle_is_an_error() {
        let data = file(10, 24, 0, b"", &[0x01, 1, 2, 3]);
        let err = TargaDecoder::new(ByteCursor::new(data)).decode();
        assert!(matches!(err, Err(TargaDecodeErrors::RleErrors(_))));
    }

    #[test]
    fn short_header_is_an_io_error() {
        let err = TargaDecoder::new(ByteCursor::new([0_u8; 10])).decode_headers();
        assert!(matches!(err, Err(TargaDecodeErrors::IoErrors(_))));
    }
}
