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
use kino_core::pixel::{Mirror, PixelFormat, PixelLayout};

use crate::constants::{
    DESCRIPTOR_ALPHA_MASK, DESCRIPTOR_MIRROR_X, DESCRIPTOR_MIRROR_Y, TYPE_GREY, TYPE_RLE_OFFSET,
    TYPE_TRUE_COLOR
};
use crate::errors::TargaDecodeErrors;

/// The fields of a Targa header plus the optional id text
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TargaHeader {
    pub cmap_type:  u8,
    pub image_type: u8,
    pub cmap_start: u16,
    pub cmap_size:  u16,
    pub cmap_bits:  u8,
    pub x:          u16,
    pub y:          u16,
    pub width:      u16,
    pub height:     u16,
    pub pixel_bits: u8,
    pub descriptor: u8,
    /// Contents of the id block, at most 255 bytes
    pub id:         String
}

impl TargaHeader {
    /// Build the header written for an image of `format`
    ///
    /// Rows are written bottom first, so the origin bits stay clear.
    pub fn for_image(
        width: u16, height: u16, format: PixelFormat, compression: Compression, id: &str
    ) -> TargaHeader {
        let channels = format.channels() as u8;
        let mut image_type = if channels < 3 {
            TYPE_GREY
        } else {
            TYPE_TRUE_COLOR
        };
        if compression.is_compressed() {
            image_type += TYPE_RLE_OFFSET;
        }
        let alpha_bits = if format.has_alpha() { 8 } else { 0 };

        // the id length is a single byte
        let mut id_len = id.len().min(255);
        while !id.is_char_boundary(id_len) {
            id_len -= 1;
        }
        TargaHeader {
            image_type,
            width,
            height,
            pixel_bits: channels * 8,
            descriptor: alpha_bits & DESCRIPTOR_ALPHA_MASK,
            id: String::from(&id[..id_len]),
            ..Default::default()
        }
    }

    pub fn read<T: ByteReaderTrait>(
        stream: &mut ByteReader<T>
    ) -> Result<TargaHeader, TargaDecodeErrors> {
        let id_size = stream.get_u8_err()?;
        let cmap_type = stream.get_u8_err()?;
        let image_type = stream.get_u8_err()?;
        let cmap_start = stream.get_u16_le_err()?;
        let cmap_size = stream.get_u16_le_err()?;
        let cmap_bits = stream.get_u8_err()?;
        let x = stream.get_u16_le_err()?;
        let y = stream.get_u16_le_err()?;
        let width = stream.get_u16_le_err()?;
        let height = stream.get_u16_le_err()?;
        let pixel_bits = stream.get_u8_err()?;
        let descriptor = stream.get_u8_err()?;

        let mut id = [0_u8; 255];
        let id = &mut id[..usize::from(id_size)];
        stream.read_exact_bytes(id)?;

        trace!("Id size: {}", id_size);
        trace!("Colour map type: {}", cmap_type);
        trace!("Image type: {}", image_type);
        trace!("Colour map: {} entries from {}, {} bits", cmap_size, cmap_start, cmap_bits);
        trace!("Origin: {},{}", x, y);
        trace!("Width: {}", width);
        trace!("Height: {}", height);
        trace!("Pixel bits: {}", pixel_bits);
        trace!("Descriptor: {:#04x}", descriptor);

        Ok(TargaHeader {
            cmap_type,
            image_type,
            cmap_start,
            cmap_size,
            cmap_bits,
            x,
            y,
            width,
            height,
            pixel_bits,
            descriptor,
            id: fixed_str(id)
        })
    }

    pub fn write<T: ByteWriterTrait>(&self, writer: &mut ByteWriter<T>) -> Result<(), ByteIoError> {
        writer.write_u8_err(self.id.len() as u8)?;
        writer.write_u8_err(self.cmap_type)?;
        writer.write_u8_err(self.image_type)?;
        writer.write_u16_le_err(self.cmap_start)?;
        writer.write_u16_le_err(self.cmap_size)?;
        writer.write_u8_err(self.cmap_bits)?;
        writer.write_u16_le_err(self.x)?;
        writer.write_u16_le_err(self.y)?;
        writer.write_u16_le_err(self.width)?;
        writer.write_u16_le_err(self.height)?;
        writer.write_u8_err(self.pixel_bits)?;
        writer.write_u8_err(self.descriptor)?;
        writer.write_all(self.id.as_bytes())
    }

    pub const fn alpha_bits(&self) -> u8 {
        self.descriptor & DESCRIPTOR_ALPHA_MASK
    }

    pub const fn mirror(&self) -> Mirror {
        Mirror {
            x: self.descriptor & DESCRIPTOR_MIRROR_X != 0,
            y: self.descriptor & DESCRIPTOR_MIRROR_Y != 0
        }
    }

    pub const fn compression(&self) -> Compression {
        if self.image_type > TYPE_RLE_OFFSET {
            Compression::Rle
        } else {
            Compression::None
        }
    }

    /// Validate the header and describe the image it announces
    pub fn to_info(&self, options: &DecoderOptions) -> Result<ImageInfo, TargaDecodeErrors> {
        let alpha_bits = self.alpha_bits();

        if !matches!(alpha_bits, 0 | 8) {
            return Err(TargaDecodeErrors::UnsupportedAlphaBits(alpha_bits));
        }
        let (format, bgr) = match (self.image_type, self.pixel_bits) {
            (2 | 10, 24) => (PixelFormat::RGB_U8, true),
            (2 | 10, 32) => (PixelFormat::RGBA_U8, true),
            (3 | 11, 8) => (PixelFormat::L_U8, false),
            (3 | 11, 16) => (PixelFormat::LA_U8, false),
            (2 | 3 | 10 | 11, bits) => {
                return Err(TargaDecodeErrors::UnsupportedPixelBits(self.image_type, bits))
            }
            (0 | 1 | 9, _) => return Err(TargaDecodeErrors::UnsupportedImageType(self.image_type)),
            (kind, _) => return Err(TargaDecodeErrors::UnknownImageType(kind))
        };
        let bits = u32::from(self.pixel_bits) + u32::from(alpha_bits);

        if bits < format.channels() as u32 * 8 || bits % 8 != 0 {
            return Err(TargaDecodeErrors::InvalidBitCount(bits));
        }
        if self.cmap_type != 0 {
            if options.get_strict_mode() {
                return Err(TargaDecodeErrors::GenericStatic(
                    "Colour map present in a true colour or grey image"
                ));
            }
            warn!("Ignoring colour map of type {} in a non mapped image", self.cmap_type);
        }
        let width = usize::from(self.width);
        let height = usize::from(self.height);

        if width > options.get_max_width() {
            return Err(TargaDecodeErrors::TooLargeDimensions(
                "width",
                options.get_max_width(),
                width
            ));
        }
        if height > options.get_max_height() {
            return Err(TargaDecodeErrors::TooLargeDimensions(
                "height",
                options.get_max_height(),
                height
            ));
        }
        let layout = PixelLayout {
            endian: ByteEndian::LE,
            bgr,
            mirror: self.mirror(),
            ..Default::default()
        };
        let mut info = ImageInfo::from_layer(LayerInfo {
            layout,
            ..LayerInfo::new(width, height, format)
        });
        info.compression = self.compression();

        if !self.id.is_empty() {
            info.set_tag(tag_names::DESCRIPTION, self.id.as_str());
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use kino_core::info::Compression;
    use kino_core::options::DecoderOptions;
    use kino_core::pixel::PixelFormat;

    use crate::header::TargaHeader;
    use crate::TargaDecodeErrors;

    fn header(image_type: u8, pixel_bits: u8, descriptor: u8) -> TargaHeader {
        TargaHeader {
            image_type,
            width: 4,
            height: 2,
            pixel_bits,
            descriptor,
            ..Default::default()
        }
    }

    #[test]
    fn alpha_and_top_origin_descriptor() {
        let info = header(2, 32, 0x28)
            .to_info(&DecoderOptions::default())
            .unwrap();
        let layout = info.layout();

        assert_eq!(info.format(), PixelFormat::RGBA_U8);
        assert!(layout.bgr);
        assert!(layout.mirror.y);
        assert!(!layout.mirror.x);
        assert_eq!(info.compression, Compression::None);
    }

    #[test]
    fn grey_rle() {
        let info = header(11, 16, 0x18)
            .to_info(&DecoderOptions::default())
            .unwrap();
        assert_eq!(info.format(), PixelFormat::LA_U8);
        assert!(!info.layout().bgr);
        assert!(info.layout().mirror.x);
        assert_eq!(info.compression, Compression::Rle);
    }

    #[test]
    fn illegal_alpha_bits() {
        let err = header(2, 32, 0x04).to_info(&DecoderOptions::default());
        assert!(matches!(err, Err(TargaDecodeErrors::UnsupportedAlphaBits(4))));
    }

    #[test]
    fn unsupported_types_and_depths() {
        let options = DecoderOptions::default();
        assert!(matches!(
            header(2, 16, 0).to_info(&options),
            Err(TargaDecodeErrors::UnsupportedPixelBits(2, 16))
        ));
        assert!(matches!(
            header(1, 8, 0).to_info(&options),
            Err(TargaDecodeErrors::UnsupportedImageType(1))
        ));
        assert!(matches!(
            header(42, 8, 0).to_info(&options),
            Err(TargaDecodeErrors::UnknownImageType(42))
        ));
    }

    #[test]
    fn alpha_bits_on_grey_must_stay_byte_aligned() {
        // 8 pixel bits plus 8 alpha bits on a grey image still fits
        assert!(header(3, 8, 0x08).to_info(&DecoderOptions::default()).is_ok());
    }

    #[test]
    fn writer_header_uses_bottom_left_origin() {
        let header = TargaHeader::for_image(3, 3, PixelFormat::RGBA_U8, Compression::Rle, "id");
        assert_eq!(header.image_type, 10);
        assert_eq!(header.pixel_bits, 32);
        assert_eq!(header.descriptor, 8);
        assert_eq!(header.id, "id");
    }
}
