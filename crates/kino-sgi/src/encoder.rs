/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::vec;
use alloc::vec::Vec;

use kino_core::bytestream::{ByteEndian, ByteWriter, ByteWriterTrait};
use kino_core::info::Compression;
use kino_core::log::trace;
use kino_core::options::EncoderOptions;
use kino_core::pixel::{PixelFormat, PixelType};
use kino_core::rle::planar;

use crate::constants::SGI_HEADER_SIZE;
use crate::errors::SgiEncodeErrors;
use crate::header::SgiHeader;

/// An SGI encoder
///
/// Input pixels are interleaved, native endian and bottom row first,
/// the order SGI stores rows in, so rows are written without flipping.
pub struct SgiEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions,
    name:    &'a str
}

impl<'a> SgiEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> SgiEncoder<'a> {
        SgiEncoder {
            data,
            options,
            name: ""
        }
    }

    /// Set the text stored in the header's image name field
    pub fn set_name(mut self, name: &'a str) -> SgiEncoder<'a> {
        self.name = name;
        self
    }

    /// Formats the encoder can write
    pub const fn supports(format: PixelFormat) -> bool {
        matches!(format.pixel_type(), PixelType::U8 | PixelType::U16)
    }

    fn header(&self) -> Result<SgiHeader, SgiEncodeErrors> {
        let format = self.options.get_format();
        if !Self::supports(format) {
            return Err(SgiEncodeErrors::UnsupportedFormat(format));
        }
        let width = self.options.get_width();
        let height = self.options.get_height();

        if width == 0 || height == 0 {
            return Err(SgiEncodeErrors::ZeroDimensions(width, height));
        }
        for dimension in [width, height] {
            if dimension > usize::from(u16::MAX) {
                return Err(SgiEncodeErrors::TooLargeDimensions(dimension));
            }
        }
        let expected = self.options.expected_byte_count();
        if self.data.len() < expected {
            return Err(SgiEncodeErrors::TooShortInput(expected, self.data.len()));
        }
        Ok(SgiHeader::for_image(
            width as u16,
            height as u16,
            format,
            self.options.get_compression(),
            self.name
        ))
    }

    /// Split interleaved pixels into planes, keeping native sample order
    fn planes(&self) -> Vec<u8> {
        let format = self.options.get_format();
        let channels = format.channels();
        let sample = format.sample_byte_width();
        let pixels = self.options.get_width() * self.options.get_height();
        let plane_bytes = pixels * sample;

        let mut planes = vec![0; plane_bytes * channels];

        for (i, pixel) in self.data[..pixels * format.byte_width()]
            .chunks_exact(format.byte_width())
            .enumerate()
        {
            for (c, value) in pixel.chunks_exact(sample).enumerate() {
                let at = c * plane_bytes + i * sample;
                planes[at..at + sample].copy_from_slice(value);
            }
        }
        planes
    }

    /// Encode the image into `sink`
    ///
    /// # Returns
    /// - `Ok(usize)`: Number of bytes written
    pub fn encode<T: ByteWriterTrait>(&self, sink: T) -> Result<usize, SgiEncodeErrors> {
        let header = self.header()?;
        let mut writer = ByteWriter::new(sink);

        header.write(&mut writer)?;

        let sample = usize::from(header.bytes_per_channel);
        let mut planes = self.planes();

        match self.options.get_compression() {
            Compression::None => {
                if sample == 2 && ByteEndian::BE.needs_swap() {
                    kino_core::bytestream::swap_samples(&mut planes, 2);
                }
                writer.write_all(&planes)?;
            }
            Compression::Rle => {
                let row_bytes = usize::from(header.width) * sample;
                let scanlines = planes.len() / row_bytes;
                let table_end = SGI_HEADER_SIZE + scanlines * 2 * 4;

                let mut payload = Vec::with_capacity(planes.len());
                let mut starts = Vec::with_capacity(scanlines);
                let mut lengths = Vec::with_capacity(scanlines);

                // planes are channel major, so row `y` of channel `c`
                // lands at table index `y + height * c`
                for row in planes.chunks_exact(row_bytes) {
                    let start = payload.len();
                    let length = planar::encode(row, sample, ByteEndian::BE, &mut payload)?;
                    starts.push((table_end + start) as u32);
                    lengths.push(length as u32);
                }
                trace!("RLE payload: {} bytes in {} scanlines", payload.len(), scanlines);

                for start in starts {
                    writer.write_u32_be_err(start)?;
                }
                for length in lengths {
                    writer.write_u32_be_err(length)?;
                }
                writer.write_all(&payload)?;
            }
        }
        writer.flush()?;
        Ok(writer.bytes_written())
    }
}
