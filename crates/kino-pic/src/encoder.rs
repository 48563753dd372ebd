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
use kino_core::pixel::PixelFormat;

use crate::errors::PicEncodeErrors;
use crate::header::PicHeader;
use crate::mixed;

/// A Softimage PIC encoder
///
/// Takes interleaved RGB or RGBA pixels, bottom row first, and writes
/// them top row first in a single channel packet.
pub struct PicEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions,
    comment: &'a str
}

impl<'a> PicEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PicEncoder<'a> {
        PicEncoder {
            data,
            options,
            comment: ""
        }
    }

    /// Set the header comment, at most 79 bytes are kept
    pub fn set_comment(mut self, comment: &'a str) -> PicEncoder<'a> {
        self.comment = comment;
        self
    }

    pub const fn supports(format: PixelFormat) -> bool {
        matches!(format, PixelFormat::RGB_U8 | PixelFormat::RGBA_U8)
    }

    /// Encode the image into `sink`
    ///
    /// # Returns
    /// - `Ok(usize)`: Number of bytes written
    pub fn encode<T: ByteWriterTrait>(&self, sink: T) -> Result<usize, PicEncodeErrors> {
        let format = self.options.get_format();
        if !Self::supports(format) {
            return Err(PicEncodeErrors::UnsupportedFormat(format));
        }
        let width = self.options.get_width();
        let height = self.options.get_height();

        for dimension in [width, height] {
            if dimension > usize::from(u16::MAX) {
                return Err(PicEncodeErrors::TooLargeDimensions(dimension));
            }
        }
        let expected = self.options.expected_byte_count();
        if self.data.len() < expected {
            return Err(PicEncodeErrors::TooShortInput(expected, self.data.len()));
        }
        let compression = self.options.get_compression();
        let header =
            PicHeader::for_image(width as u16, height as u16, format, compression, self.comment);

        let mut writer = ByteWriter::new(sink);
        header.write(&mut writer)?;

        let channels = format.channels();
        let row_bytes = width * channels;

        if row_bytes != 0 {
            let mut packets = Vec::with_capacity(row_bytes + row_bytes / 64 + 2);

            for row in self.data[..expected].chunks_exact(row_bytes).rev() {
                match compression {
                    Compression::None => writer.write_all(row)?,
                    Compression::Rle => {
                        packets.clear();
                        mixed::encode(row, width, channels, channels, 0, &mut packets);
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

    use crate::{PicDecoder, PicEncodeErrors, PicEncoder};

    #[test]
    fn round_trip_flips_rows() {
        let mut rng = WyRand::new_seed(0x5380);

        for format in [PixelFormat::RGB_U8, PixelFormat::RGBA_U8] {
            for compression in [Compression::None, Compression::Rle] {
                let (width, height) = (9, 4);
                let options = EncoderOptions::new(width, height, format).set_compression(compression);
                let mut pixels = vec![0_u8; options.expected_byte_count()];
                rng.fill(&mut pixels);
                pixels[..format.byte_width() * 5].fill(1);

                let mut sink = Vec::new();
                PicEncoder::new(&pixels, options)
                    .set_comment("softimage")
                    .encode(&mut sink)
                    .unwrap();

                let mut decoder = PicDecoder::new(ByteCursor::new(&sink));
                let decoded = decoder.decode().unwrap();
                let info = decoder.info().unwrap();

                assert_eq!(info.format(), format);
                assert_eq!(info.compression, compression);
                assert_eq!(info.tag("Description"), Some("softimage"));

                let row_bytes = width * format.byte_width();
                let flipped: Vec<u8> = decoded
                    .chunks_exact(row_bytes)
                    .rev()
                    .flatten()
                    .copied()
                    .collect();
                assert_eq!(flipped, pixels);
            }
        }
    }

    #[test]
    fn grey_is_rejected() {
        let options = EncoderOptions::new(1, 1, PixelFormat::L_U8);
        let err = PicEncoder::new(&[0], options).encode(&mut Vec::<u8>::new());
        assert!(matches!(err, Err(PicEncodeErrors::UnsupportedFormat(_))));
    }
}
