/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::vec::Vec;

use kino_core::bytestream::{ByteWriter, ByteWriterTrait};
use kino_core::info::Compression;
use kino_core::options::EncoderOptions;
use kino_core::pixel::{PixelFormat, PixelType};
use kino_core::rle::interleaved;

use crate::errors::TargaEncodeErrors;
use crate::header::TargaHeader;

/// A Targa encoder
///
/// Takes interleaved RGB ordered pixels, bottom row first, and writes
/// them blue first with a bottom left origin. RLE packets never cross
/// a scanline.
pub struct TargaEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions,
    id:      &'a str
}

impl<'a> TargaEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> TargaEncoder<'a> {
        TargaEncoder { data, options, id: "" }
    }

    /// Set the text stored in the id block
    pub fn set_id(mut self, id: &'a str) -> TargaEncoder<'a> {
        self.id = id;
        self
    }

    pub const fn supports(format: PixelFormat) -> bool {
        matches!(format.pixel_type(), PixelType::U8)
    }

    pub fn encode<T: ByteWriterTrait>(&self, sink: T) -> Result<usize, TargaEncodeErrors> {
        let format = self.options.get_format();
        if !Self::supports(format) {
            return Err(TargaEncodeErrors::UnsupportedFormat(format));
        }
        let width = self.options.get_width();
        let height = self.options.get_height();

        for dimension in [width, height] {
            if dimension > usize::from(u16::MAX) {
                return Err(TargaEncodeErrors::TooLargeDimensions(dimension));
            }
        }
        let expected = self.options.expected_byte_count();
        if self.data.len() < expected {
            return Err(TargaEncodeErrors::TooShortInput(expected, self.data.len()));
        }
        let compression = self.options.get_compression();
        let header =
            TargaHeader::for_image(width as u16, height as u16, format, compression, self.id);

        let mut writer = ByteWriter::new(sink);
        header.write(&mut writer)?;

        let pixel_width = format.byte_width();
        let row_bytes = width * pixel_width;

        if row_bytes != 0 {
            let mut scanline = Vec::with_capacity(row_bytes);
            let mut packets = Vec::with_capacity(row_bytes + row_bytes / 128 + 1);

            for row in self.data[..expected].chunks_exact(row_bytes) {
                scanline.clear();
                scanline.extend_from_slice(row);

                if format.channels() >= 3 {
                    scanline
                        .chunks_exact_mut(pixel_width)
                        .for_each(|pixel| pixel.swap(0, 2));
                }
                match compression {
                    Compression::None => writer.write_all(&scanline)?,
                    Compression::Rle => {
                        packets.clear();
                        interleaved::encode(&scanline, pixel_width, &mut packets)?;
                        writer.write_all(&packets)?;
                    }
                }
            }
        }
        writer.flush()?;
        Ok(writer.bytes_written())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kino_core::bytestream::ByteCursor;
    use kino_core::info::Compression;
    use kino_core::options::EncoderOptions;
    use kino_core::pixel::PixelFormat;
    use nanorand::{Rng, WyRand};

    use crate::{TargaDecoder, TargaEncodeErrors, TargaEncoder};

    #[test]
    fn round_trip_keeps_geometry_and_pixels() {
        let formats = [
            PixelFormat::L_U8,
            PixelFormat::LA_U8,
            PixelFormat::RGB_U8,
            PixelFormat::RGBA_U8
        ];
        let mut rng = WyRand::new_seed(2);

        for format in formats {
            for compression in [Compression::None, Compression::Rle] {
                let options = EncoderOptions::new(7, 3, format).set_compression(compression);
                let mut pixels = vec![0_u8; options.expected_byte_count()];
                rng.fill(&mut pixels);
                pixels[..format.byte_width() * 3].fill(77);

                let mut sink = Vec::new();
                TargaEncoder::new(&pixels, options).encode(&mut sink).unwrap();

                let mut decoder = TargaDecoder::new(ByteCursor::new(&sink));
                let mut decoded = decoder.decode().unwrap();
                let info = decoder.info().unwrap();

                assert_eq!(info.dimensions(), (7, 3));
                assert_eq!(info.format(), format);
                assert_eq!(info.compression, compression);
                assert!(!info.layout().mirror.y);

                if info.layout().bgr {
                    decoded
                        .chunks_exact_mut(format.byte_width())
                        .for_each(|p| p.swap(0, 2));
                }
                assert_eq!(decoded, pixels);
            }
        }
    }

    #[test]
    fn pixels_are_stored_blue_first() {
        let options = EncoderOptions::new(1, 1, PixelFormat::RGB_U8);
        let mut sink = Vec::new();
        TargaEncoder::new(&[1, 2, 3], options).encode(&mut sink).unwrap();
        assert_eq!(&sink[18..], &[3, 2, 1]);
    }

    #[test]
    fn sixteen_bit_is_rejected() {
        let options = EncoderOptions::new(1, 1, PixelFormat::L_U16);
        let err = TargaEncoder::new(&[0, 0], options).encode(&mut Vec::<u8>::new());
        assert!(matches!(err, Err(TargaEncodeErrors::UnsupportedFormat(_))));
    }
}
