/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;
use alloc::vec::Vec;

use kino_core::bytestream::{ByteEndian, ByteWriter, ByteWriterTrait};
use kino_core::info::Tags;
use kino_core::log::trace;
use kino_core::options::EncoderOptions;
use kino_core::pixel::PixelFormat;

use crate::constants::{
    BIT_DEPTH, CINEON_GENERIC_SIZE, CINEON_HEADER_SIZE, CINEON_INDUSTRY_SIZE, DESCRIPTOR_B_FILM_PRINT,
    DESCRIPTOR_G_FILM_PRINT, DESCRIPTOR_L, DESCRIPTOR_R_FILM_PRINT, FILE_SIZE_OFFSET,
    ORIENT_LEFT_RIGHT_TOP_BOTTOM, PACKING_FILLED_32
};
use crate::errors::CineonEncodeErrors;
use crate::header::CineonHeader;
use crate::options::ColorProfile;
use crate::tags::write_tags;

/// A Cineon encoder
///
/// Takes native endian packed 10 bit RGB words, bottom row first, and
/// writes a big endian file with a top left origin.
pub struct CineonEncoder<'a> {
    data:          &'a [u8],
    options:       EncoderOptions,
    tags:          Option<&'a Tags>,
    file_name:     &'a str,
    color_profile: ColorProfile
}

impl<'a> CineonEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> CineonEncoder<'a> {
        CineonEncoder {
            data,
            options,
            tags: None,
            file_name: "",
            color_profile: ColorProfile::Auto
        }
    }

    /// Tags copied into the source and film blocks
    pub fn set_tags(mut self, tags: &'a Tags) -> CineonEncoder<'a> {
        self.tags = Some(tags);
        self
    }

    /// Name stored in the file block, usually the name of the file written
    pub fn set_file_name(mut self, name: &'a str) -> CineonEncoder<'a> {
        self.file_name = name;
        self
    }

    pub fn set_color_profile(mut self, profile: ColorProfile) -> CineonEncoder<'a> {
        self.color_profile = profile;
        self
    }

    pub const fn supports(format: PixelFormat) -> bool {
        matches!(format, PixelFormat::RGB_U10)
    }

    /// Build the header written for the configured image
    fn header(&self) -> Result<CineonHeader, CineonEncodeErrors> {
        let format = self.options.get_format();
        if !Self::supports(format) {
            return Err(CineonEncodeErrors::UnsupportedFormat(format));
        }
        let width = self.options.get_width();
        let height = self.options.get_height();

        for dimension in [width, height] {
            if u32::try_from(dimension).is_err() {
                return Err(CineonEncodeErrors::TooLargeDimensions(dimension));
            }
        }
        let mut header = CineonHeader::undefined();

        header.file.image_offset = CINEON_HEADER_SIZE as u32;
        header.file.header_size = CINEON_GENERIC_SIZE;
        header.file.industry_header_size = CINEON_INDUSTRY_SIZE;
        header.file.user_header_size = 0;
        header.file.name = String::from(self.file_name);

        header.image.orient = ORIENT_LEFT_RIGHT_TOP_BOTTOM;
        header.image.channels = 3;

        let descriptors = if self.color_profile.is_film_print() {
            [
                DESCRIPTOR_R_FILM_PRINT,
                DESCRIPTOR_G_FILM_PRINT,
                DESCRIPTOR_B_FILM_PRINT
            ]
        } else {
            [DESCRIPTOR_L; 3]
        };
        for (block, descriptor) in header.image.channel.iter_mut().zip(descriptors) {
            block.descriptor = [0, descriptor];
            block.bit_depth = BIT_DEPTH;
            block.size = [width as u32, height as u32];
            block.low_data = 0;
            block.high_data = 1023;
        }
        header.image.interleave = 0;
        header.image.packing = PACKING_FILLED_32;
        header.image.data_sign = 0;
        header.image.data_sense = 0;
        header.image.line_padding = 0;
        header.image.channel_padding = 0;

        if let Some(tags) = self.tags {
            write_tags(tags, &mut header);
        }
        Ok(header)
    }

    /// Total size of a file carrying `pixel_bytes` of image data
    ///
    /// The header stores it in 32 bits, larger files are refused.
    fn file_size(pixel_bytes: usize) -> Result<u32, CineonEncodeErrors> {
        let total = CINEON_HEADER_SIZE
            .checked_add(pixel_bytes)
            .ok_or(CineonEncodeErrors::TooLargeFile(usize::MAX))?;
        u32::try_from(total).map_err(|_| CineonEncodeErrors::TooLargeFile(total))
    }

    /// Patch the total size into a complete file held in memory
    fn finish(file: &mut [u8], size: u32) {
        if let Some(field) = file.get_mut(FILE_SIZE_OFFSET..FILE_SIZE_OFFSET + 4) {
            field.copy_from_slice(&size.to_be_bytes());
        }
    }

    /// Encode the image into `sink`
    ///
    /// # Returns
    /// - `Ok(usize)`: Number of bytes written
    pub fn encode<T: ByteWriterTrait>(&self, sink: T) -> Result<usize, CineonEncodeErrors> {
        let header = self.header()?;

        let expected = self.options.expected_byte_count();
        if self.data.len() < expected {
            return Err(CineonEncodeErrors::TooShortInput(expected, self.data.len()));
        }
        let size = Self::file_size(expected)?;
        let row_bytes = self.options.get_width() * PixelFormat::RGB_U10.byte_width();

        let mut file = Vec::with_capacity(CINEON_HEADER_SIZE + expected);
        let mut writer = ByteWriter::new(&mut file);

        header.write(&mut writer, ByteEndian::BE)?;

        if row_bytes != 0 {
            // the file stores rows top to bottom
            for row in self.data[..expected].chunks_exact(row_bytes).rev() {
                for word in row.chunks_exact(4) {
                    let word = u32::from_ne_bytes([word[0], word[1], word[2], word[3]]);
                    writer.write_u32_be_err(word)?;
                }
            }
        }
        Self::finish(&mut file, size);
        trace!("Cineon file of {} bytes", file.len());

        let mut writer = ByteWriter::new(sink);
        writer.write_all(&file)?;
        writer.flush()?;
        Ok(writer.bytes_written())
    }
}
