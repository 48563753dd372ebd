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
use kino_core::info::ImageInfo;
use kino_core::log::trace;
use kino_core::options::DecoderOptions;

use crate::errors::CineonDecodeErrors;
use crate::header::CineonHeader;
use crate::options::ColorProfile;

/// A Cineon decoder
///
/// Pixels come out as packed 10 bit RGB words in the file's byte order,
/// with the row order the orientation field announces.
pub struct CineonDecoder<T: ByteReaderTrait> {
    stream:          ByteReader<T>,
    options:         DecoderOptions,
    header:          Option<CineonHeader>,
    info:            ImageInfo,
    decoded_headers: bool
}

impl<T: ByteReaderTrait> CineonDecoder<T> {
    pub fn new(data: T) -> CineonDecoder<T> {
        CineonDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: T, options: DecoderOptions) -> CineonDecoder<T> {
        CineonDecoder {
            stream: ByteReader::new(data),
            options,
            header: None,
            info: ImageInfo::default(),
            decoded_headers: false
        }
    }

    /// Read the header and position the stream at the pixel data
    pub fn decode_headers(&mut self) -> Result<(), CineonDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let header = CineonHeader::read(&mut self.stream)?;
        self.info = header.to_info(&self.options)?;

        let image_offset = header.file.image_offset;
        if image_offset != 0 {
            trace!("Pixels start at {}", image_offset);
            self.stream.set_position(u64::from(image_offset))?;
        }
        self.header = Some(header);
        self.decoded_headers = true;
        Ok(())
    }

    pub fn info(&self) -> Option<&ImageInfo> {
        self.decoded_headers.then_some(&self.info)
    }

    pub fn header(&self) -> Option<&CineonHeader> {
        self.header.as_ref()
    }

    /// Whether the file holds a film print or raw code values
    pub fn color_profile(&self) -> Option<ColorProfile> {
        self.header.as_ref().map(CineonHeader::color_profile)
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.info().map(ImageInfo::dimensions)
    }

    pub fn output_buffer_size(&self) -> Option<usize> {
        self.info().map(ImageInfo::data_byte_count)
    }

    pub fn decode(&mut self) -> Result<Vec<u8>, CineonDecodeErrors> {
        self.decode_headers()?;
        let mut out = vec![0; self.info.data_byte_count()];
        self.decode_into(&mut out)?;
        Ok(out)
    }

    pub fn decode_into(&mut self, sink: &mut [u8]) -> Result<(), CineonDecodeErrors> {
        self.decode_headers()?;

        let size = self.info.data_byte_count();
        if sink.len() < size {
            return Err(CineonDecodeErrors::TooSmallOutput(size, sink.len()));
        }
        self.stream.read_exact_bytes(&mut sink[..size])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kino_core::bytestream::{ByteCursor, ByteEndian, ByteWriter};
    use kino_core::pixel::PixelFormat;

    use crate::header::CineonHeader;
    use crate::{CineonDecodeErrors, CineonDecoder, ColorProfile};

    fn rgb10_header() -> CineonHeader {
        let mut header = CineonHeader::undefined();
        header.file.image_offset = 2048;
        header.image.orient = 0;
        header.image.channels = 3;
        for (i, block) in header.image.channel[..3].iter_mut().enumerate() {
            block.descriptor = [0, i as u8 + 1];
            block.bit_depth = 10;
            block.size = [2, 1];
        }
        header.image.packing = 5;
        header.image.line_padding = 0;
        header.image.channel_padding = 0;
        header
    }

    fn file(header: &CineonHeader, endian: ByteEndian, words: &[u32]) -> Vec<u8> {
        let mut sink = Vec::new();
        let mut writer = ByteWriter::new(&mut sink);
        header.write(&mut writer, endian).unwrap();
        for word in words {
            writer.write_u32(*word, endian).unwrap();
        }
        sink
    }

    #[test]
    fn little_endian_file_keeps_its_byte_order() {
        let words = [0x3ff0_0004_u32, 0x0000_0ffc];
        let data = file(&rgb10_header(), ByteEndian::LE, &words);

        let mut decoder = CineonDecoder::new(ByteCursor::new(data));
        let pixels = decoder.decode().unwrap();
        let info = decoder.info().unwrap();

        assert_eq!(info.format(), PixelFormat::RGB_U10);
        assert_eq!(info.dimensions(), (2, 1));
        assert_eq!(info.layout().endian, ByteEndian::LE);
        assert!(info.layout().mirror.y);
        assert_eq!(&pixels[..4], &words[0].to_le_bytes());
        assert_eq!(decoder.color_profile(), Some(ColorProfile::FilmPrint));
    }

    #[test]
    fn pixels_follow_the_image_offset() {
        let mut header = rgb10_header();
        header.file.image_offset = 2052;
        let data = file(&header, ByteEndian::BE, &[0xdead_beef, 1, 2]);

        let pixels = CineonDecoder::new(ByteCursor::new(data)).decode().unwrap();
        assert_eq!(pixels, [0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn unsupported_layouts() {
        let mut header = rgb10_header();
        header.image.channels = 0;
        let err = CineonDecoder::new(ByteCursor::new(file(&header, ByteEndian::BE, &[])))
            .decode_headers();
        assert!(matches!(err, Err(CineonDecodeErrors::UnsupportedChannels(0))));

        let mut header = rgb10_header();
        header.image.channel[2].size = [3, 1];
        let err = CineonDecoder::new(ByteCursor::new(file(&header, ByteEndian::BE, &[])))
            .decode_headers();
        assert!(matches!(err, Err(CineonDecodeErrors::MismatchedChannel(2))));

        let mut header = rgb10_header();
        header.image.channels = 1;
        let err = CineonDecoder::new(ByteCursor::new(file(&header, ByteEndian::BE, &[])))
            .decode_headers();
        assert!(matches!(err, Err(CineonDecodeErrors::UnsupportedLayout(1, 10))));

        let mut header = rgb10_header();
        header.image.line_padding = 4;
        let err = CineonDecoder::new(ByteCursor::new(file(&header, ByteEndian::BE, &[])))
            .decode_headers();
        assert!(matches!(err, Err(CineonDecodeErrors::UnsupportedPadding(4, 0))));
    }

    #[test]
    fn undefined_padding_is_accepted() {
        let mut header = rgb10_header();
        header.image.line_padding = u32::MAX;
        let data = file(&header, ByteEndian::BE, &[0, 0]);
        assert!(CineonDecoder::new(ByteCursor::new(data)).decode().is_ok());
    }

    #[test]
    fn truncated_pixels_are_an_io_error() {
        let data = file(&rgb10_header(), ByteEndian::BE, &[0]);
        let err = CineonDecoder::new(ByteCursor::new(data)).decode();
        assert!(matches!(err, Err(CineonDecodeErrors::IoErrors(_))));
    }
}
