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
use kino_core::options::DecoderOptions;

use crate::errors::LutDecodeErrors;
use crate::header::LutHeader;
use crate::options::{LutDialect, LutOptions};
use crate::table::{parse_number, store_sample, Words};

/// A LUT text table decoder
///
/// The table comes out as a single row of interleaved native endian
/// pixels, one pixel per entry.
pub struct LutDecoder<T: ByteReaderTrait> {
    stream:          ByteReader<T>,
    options:         DecoderOptions,
    lut_options:     LutOptions,
    dialect:         LutDialect,
    text:            Vec<u8>,
    header:          LutHeader,
    info:            ImageInfo,
    decoded_headers: bool
}

impl<T: ByteReaderTrait> LutDecoder<T> {
    pub fn new(data: T, dialect: LutDialect) -> LutDecoder<T> {
        LutDecoder::new_with_options(data, dialect, DecoderOptions::default(), LutOptions::default())
    }

    pub fn new_with_options(
        data: T, dialect: LutDialect, options: DecoderOptions, lut_options: LutOptions
    ) -> LutDecoder<T> {
        LutDecoder {
            stream: ByteReader::new(data),
            options,
            lut_options,
            dialect,
            text: Vec::new(),
            header: LutHeader::default(),
            info: ImageInfo::default(),
            decoded_headers: false
        }
    }

    pub fn decode_headers(&mut self) -> Result<(), LutDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        // the automatic depth needs every value, so keep the whole table
        self.text = self.stream.remaining_to_vec()?;
        self.header = LutHeader::read(&self.text, self.dialect, self.lut_options.kind)?;
        self.info = self.header.to_info(&self.options)?;
        self.decoded_headers = true;
        Ok(())
    }

    pub fn info(&self) -> Option<&ImageInfo> {
        self.decoded_headers.then_some(&self.info)
    }

    pub fn header(&self) -> Option<&LutHeader> {
        self.decoded_headers.then_some(&self.header)
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.info().map(ImageInfo::dimensions)
    }

    pub fn output_buffer_size(&self) -> Option<usize> {
        self.info().map(ImageInfo::data_byte_count)
    }

    pub fn decode(&mut self) -> Result<Vec<u8>, LutDecodeErrors> {
        self.decode_headers()?;
        let mut out = vec![0; self.info.data_byte_count()];
        self.decode_into(&mut out)?;
        Ok(out)
    }

    pub fn decode_into(&mut self, sink: &mut [u8]) -> Result<(), LutDecodeErrors> {
        self.decode_headers()?;

        let size = self.info.data_byte_count();
        if sink.len() < size {
            return Err(LutDecodeErrors::TooSmallOutput(size, sink.len()));
        }
        let sink = &mut sink[..size];
        sink.fill(0);

        let format = self.info.format();
        let channels = self.header.channels;
        let entries = self.header.size;
        let expected = channels * entries;

        let mut words = Words::new(&self.text, self.header.data_start);
        let mut found = 0;
        let mut next = || -> Result<i64, LutDecodeErrors> {
            let word = words
                .next()
                .ok_or(LutDecodeErrors::MissingValues(expected, found))?;
            found += 1;
            parse_number(word)
        };

        match self.dialect {
            // all values of channel 0, then channel 1 ...
            LutDialect::Inferno => {
                for channel in 0..channels {
                    for x in 0..entries {
                        store_sample(sink, format, x, channel, next()?);
                    }
                }
            }
            LutDialect::Kodak => {
                for x in 0..entries {
                    for channel in 0..channels {
                        store_sample(sink, format, x, channel, next()?);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kino_core::bytestream::ByteCursor;
    use kino_core::options::DecoderOptions;
    use kino_core::pixel::PixelFormat;

    use crate::{LutDecodeErrors, LutDecoder, LutDialect, LutOptions, LutType};

    #[test]
    fn inferno_values_are_channel_major() {
        let text = b"LUT: 2 3\n\n1\n2\n3\n10\n20\n30\n";
        let mut decoder = LutDecoder::new(ByteCursor::new(text), LutDialect::Inferno);
        let pixels = decoder.decode().unwrap();

        assert_eq!(decoder.info().unwrap().format(), PixelFormat::LA_U8);
        assert_eq!(pixels, [1, 10, 2, 20, 3, 30]);
    }

    #[test]
    fn kodak_values_are_pixel_major() {
        let text = b"# comment\n  1000  2000\n  3000  4000\n";
        let mut decoder = LutDecoder::new(ByteCursor::new(text), LutDialect::Kodak);
        let pixels = decoder.decode().unwrap();
        let info = decoder.info().unwrap();

        assert_eq!(info.format(), PixelFormat::LA_U16);
        assert_eq!(info.dimensions(), (2, 1));

        let values: Vec<u16> = pixels
            .chunks_exact(2)
            .map(|v| u16::from_ne_bytes([v[0], v[1]]))
            .collect();
        assert_eq!(values, [1000, 2000, 3000, 4000]);
    }

    #[test]
    fn forced_eight_bit_clamps() {
        let text = b"LUT: 1 2 300 7";
        let options = LutOptions { kind: LutType::U8 };
        let mut decoder = LutDecoder::new_with_options(
            ByteCursor::new(text),
            LutDialect::Inferno,
            DecoderOptions::default(),
            options
        );
        assert_eq!(decoder.decode().unwrap(), [255, 7]);
    }

    #[test]
    fn missing_values_and_bad_numbers() {
        let text = b"LUT: 1 3 1 2";
        let err = LutDecoder::new(ByteCursor::new(text), LutDialect::Inferno).decode();
        assert!(matches!(err, Err(LutDecodeErrors::MissingValues(3, 2))));

        let text = b"LUT: 1 2 1 two";
        let err = LutDecoder::new(ByteCursor::new(text), LutDialect::Inferno).decode();
        assert!(matches!(err, Err(LutDecodeErrors::InvalidNumber(_))));
    }
}
