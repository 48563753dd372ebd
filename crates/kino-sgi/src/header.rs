/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;

use kino_core::bytestream::{
    fixed_str, ByteEndian, ByteIoError, ByteReader, ByteReaderTrait, ByteWriter, ByteWriterTrait
};
use kino_core::info::{tag_names, Compression, ImageInfo, LayerInfo};
use kino_core::log::{trace, warn};
use kino_core::options::DecoderOptions;
use kino_core::pixel::{Interleave, PixelFormat, PixelKind, PixelLayout};

use crate::constants::{
    COLORMAP_NORMAL, SGI_HEADER_FIELDS, SGI_HEADER_SIZE, SGI_MAGIC, SGI_NAME_LENGTH, STORAGE_RLE,
    STORAGE_VERBATIM
};
use crate::errors::SgiDecodeErrors;

/// The fields of an SGI header
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SgiHeader {
    pub storage:           u8,
    pub bytes_per_channel: u8,
    pub dimension:         u16,
    pub width:             u16,
    pub height:            u16,
    pub channels:          u16,
    pub pixel_min:         u32,
    pub pixel_max:         u32,
    pub name:              String,
    pub colormap:          u32
}

impl SgiHeader {
    /// Build the header written for an image of `format`
    ///
    /// Dimension is 1 for a single grey row, 2 for a grey image and
    /// 3 for anything with more than one channel.
    pub fn for_image(
        width: u16, height: u16, format: PixelFormat, compression: Compression, name: &str
    ) -> SgiHeader {
        let channels = format.channels() as u16;
        let bytes_per_channel = format.sample_byte_width() as u8;

        let dimension = match (channels, height) {
            (1, 1) => 1,
            (1, _) => 2,
            _ => 3
        };
        SgiHeader {
            storage: if compression.is_compressed() {
                STORAGE_RLE
            } else {
                STORAGE_VERBATIM
            },
            bytes_per_channel,
            dimension,
            width,
            height,
            channels,
            pixel_min: 0,
            pixel_max: if bytes_per_channel == 1 { 255 } else { 65535 },
            name: String::from(name),
            colormap: COLORMAP_NORMAL
        }
    }

    /// Read the header and leave the stream at the first byte after it
    pub fn read<T: ByteReaderTrait>(
        stream: &mut ByteReader<T>
    ) -> Result<SgiHeader, SgiDecodeErrors> {
        let magic = stream.get_u16_be_err()?;

        if magic != SGI_MAGIC {
            return Err(SgiDecodeErrors::WrongMagicBytes(magic));
        }
        let storage = stream.get_u8_err()?;
        let bytes_per_channel = stream.get_u8_err()?;
        let dimension = stream.get_u16_be_err()?;
        let width = stream.get_u16_be_err()?;
        let height = stream.get_u16_be_err()?;
        let channels = stream.get_u16_be_err()?;
        let pixel_min = stream.get_u32_be_err()?;
        let pixel_max = stream.get_u32_be_err()?;
        // dummy
        stream.skip(4)?;
        let name = fixed_str(&stream.read_fixed_bytes_or_error::<SGI_NAME_LENGTH>()?);
        let colormap = stream.get_u32_be_err()?;

        stream.set_position(SGI_HEADER_SIZE as u64)?;

        trace!("Storage: {}", storage);
        trace!("Bytes per channel: {}", bytes_per_channel);
        trace!("Dimension: {}", dimension);
        trace!("Width: {}", width);
        trace!("Height: {}", height);
        trace!("Channels: {}", channels);
        trace!("Pixel range: {}..{}", pixel_min, pixel_max);
        trace!("Colormap: {}", colormap);

        Ok(SgiHeader {
            storage,
            bytes_per_channel,
            dimension,
            width,
            height,
            channels,
            pixel_min,
            pixel_max,
            name,
            colormap
        })
    }

    /// Write the header padded to 512 bytes
    pub fn write<T: ByteWriterTrait>(&self, writer: &mut ByteWriter<T>) -> Result<(), ByteIoError> {
        writer.write_u16_be_err(SGI_MAGIC)?;
        writer.write_u8_err(self.storage)?;
        writer.write_u8_err(self.bytes_per_channel)?;
        writer.write_u16_be_err(self.dimension)?;
        writer.write_u16_be_err(self.width)?;
        writer.write_u16_be_err(self.height)?;
        writer.write_u16_be_err(self.channels)?;
        writer.write_u32_be_err(self.pixel_min)?;
        writer.write_u32_be_err(self.pixel_max)?;
        writer.write_zeros(4)?;
        writer.write_fixed_str::<SGI_NAME_LENGTH>(&self.name)?;
        writer.write_u32_be_err(self.colormap)?;
        writer.write_zeros(SGI_HEADER_SIZE - SGI_HEADER_FIELDS)
    }

    /// Channel count, grey images may leave the field at zero
    pub fn channel_count(&self) -> usize {
        if self.channels == 0 && self.dimension < 3 {
            1
        } else {
            usize::from(self.channels)
        }
    }

    pub fn compression(&self) -> Compression {
        if self.storage == STORAGE_RLE {
            Compression::Rle
        } else {
            Compression::None
        }
    }

    /// Validate the header and describe the image it announces
    pub fn to_info(&self, options: &DecoderOptions) -> Result<ImageInfo, SgiDecodeErrors> {
        if self.storage > STORAGE_RLE {
            return Err(SgiDecodeErrors::UnsupportedStorage(self.storage));
        }
        let width = usize::from(self.width);
        let height = usize::from(self.height);

        if width > options.get_max_width() {
            return Err(SgiDecodeErrors::TooLargeDimensions(
                "width",
                options.get_max_width(),
                width
            ));
        }
        if height > options.get_max_height() {
            return Err(SgiDecodeErrors::TooLargeDimensions(
                "height",
                options.get_max_height(),
                height
            ));
        }
        let channels = self.channel_count();
        let format = PixelFormat::from_channels_and_depth(
            channels,
            self.bytes_per_channel.saturating_mul(8),
            PixelKind::Integer
        )
        .filter(|format| format.sample_byte_width() <= 2)
        .ok_or(SgiDecodeErrors::UnsupportedFormat(
            channels,
            self.bytes_per_channel
        ))?;

        let expected_max = if self.bytes_per_channel == 1 { 255 } else { 65535 };
        if self.pixel_max != expected_max {
            if options.get_strict_mode() {
                return Err(SgiDecodeErrors::GenericStatic(
                    "Maximum pixel value does not match bytes per channel"
                ));
            }
            warn!(
                "SGI pixel max {} does not match {} bytes per channel, ignoring",
                self.pixel_max, self.bytes_per_channel
            );
        }
        let layout = PixelLayout {
            endian: ByteEndian::BE,
            interleave: Interleave::Planar,
            ..Default::default()
        };
        let mut info = ImageInfo::from_layer(LayerInfo {
            layout,
            ..LayerInfo::new(width, height, format)
        });
        info.compression = self.compression();

        if !self.name.is_empty() {
            info.set_tag(tag_names::DESCRIPTION, self.name.as_str());
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kino_core::bytestream::{ByteCursor, ByteReader, ByteWriter};
    use kino_core::info::Compression;
    use kino_core::options::DecoderOptions;
    use kino_core::pixel::PixelFormat;

    use crate::header::SgiHeader;

    #[test]
    fn dimension_follows_channels_and_height() {
        let row = SgiHeader::for_image(8, 1, PixelFormat::L_U8, Compression::None, "");
        let grey = SgiHeader::for_image(8, 8, PixelFormat::L_U16, Compression::None, "");
        let rgb = SgiHeader::for_image(8, 1, PixelFormat::RGB_U8, Compression::Rle, "");

        assert_eq!(row.dimension, 1);
        assert_eq!(grey.dimension, 2);
        assert_eq!(grey.pixel_max, 65535);
        assert_eq!(rgb.dimension, 3);
        assert_eq!(rgb.storage, 1);
    }

    #[test]
    fn header_is_always_512_bytes() {
        let header = SgiHeader::for_image(3, 2, PixelFormat::RGBA_U8, Compression::None, "name");
        let mut sink = Vec::new();
        let mut writer = ByteWriter::new(&mut sink);
        header.write(&mut writer).unwrap();
        assert_eq!(writer.bytes_written(), 512);

        let mut reader = ByteReader::new(ByteCursor::new(&sink));
        let read = SgiHeader::read(&mut reader).unwrap();
        assert_eq!(read, header);
        assert_eq!(reader.position().unwrap(), 512);
    }

    #[test]
    fn sixteen_bit_samples_are_big_endian_planes() {
        let header = SgiHeader::for_image(3, 2, PixelFormat::LA_U16, Compression::None, "");
        let info = header.to_info(&DecoderOptions::default()).unwrap();
        let layout = info.layout();

        assert_eq!(info.format(), PixelFormat::LA_U16);
        assert_eq!(layout.endian, kino_core::bytestream::ByteEndian::BE);
        assert_eq!(layout.interleave, kino_core::pixel::Interleave::Planar);
        assert!(!layout.mirror.y);
    }
}
