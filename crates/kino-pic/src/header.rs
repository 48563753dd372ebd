/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;
use alloc::vec::Vec;

use kino_core::bytestream::{
    fixed_str, ByteIoError, ByteReader, ByteReaderTrait, ByteWriter, ByteWriterTrait
};
use kino_core::info::{tag_names, Compression, ImageInfo, LayerInfo};
use kino_core::log::trace;
use kino_core::options::DecoderOptions;
use kino_core::pixel::{Mirror, PixelFormat, PixelLayout};

use crate::constants::{
    CHANNEL_A, CHANNEL_RGB, PACKET_BITS, PACKET_MIXED_RLE, PACKET_RAW, PIC_COMMENT_LENGTH,
    PIC_FULL_FRAME, PIC_ID, PIC_MAGIC, PIC_VERSION
};
use crate::errors::PicDecodeErrors;

/// One entry of the channel packet chain following the header
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ChannelPacket {
    /// Non zero when another packet follows
    pub chained:  u8,
    /// Bits per channel
    pub size:     u8,
    /// [`PACKET_RAW`] or [`PACKET_MIXED_RLE`]
    pub encoding: u8,
    /// Channels the packet carries, `R 0x80`, `G 0x40`, `B 0x20`, `A 0x10`
    pub channels: u8
}

impl ChannelPacket {
    fn read<T: ByteReaderTrait>(stream: &mut ByteReader<T>) -> Result<ChannelPacket, ByteIoError> {
        Ok(ChannelPacket {
            chained:  stream.get_u8_err()?,
            size:     stream.get_u8_err()?,
            encoding: stream.get_u8_err()?,
            channels: stream.get_u8_err()?
        })
    }

    fn write<T: ByteWriterTrait>(&self, writer: &mut ByteWriter<T>) -> Result<(), ByteIoError> {
        writer.write_const_bytes(&[self.chained, self.size, self.encoding, self.channels])
    }

    /// Number of channels set in the mask
    pub const fn channel_count(&self) -> usize {
        (self.channels & (CHANNEL_RGB | CHANNEL_A)).count_ones() as usize
    }

    pub const fn compression(&self) -> Compression {
        if self.encoding == PACKET_MIXED_RLE {
            Compression::Rle
        } else {
            Compression::None
        }
    }

    const fn is(&self, mask: u8, chained: bool) -> bool {
        self.channels & (CHANNEL_RGB | CHANNEL_A) == mask
            && self.size == PACKET_BITS
            && (self.chained != 0) == chained
    }
}

/// The 104 byte big endian PIC header and its channel packets
#[derive(Clone, Debug, PartialEq)]
pub struct PicHeader {
    pub version: f32,
    pub comment: String,
    pub width:   u16,
    pub height:  u16,
    pub ratio:   f32,
    pub fields:  u16,
    /// One packet, or colour followed by alpha
    pub packets: Vec<ChannelPacket>
}

impl Default for PicHeader {
    fn default() -> Self {
        PicHeader {
            version: PIC_VERSION,
            comment: String::new(),
            width:   0,
            height:  0,
            ratio:   1.0,
            fields:  PIC_FULL_FRAME,
            packets: Vec::new()
        }
    }
}

impl PicHeader {
    /// Build the header written for an image of `format`
    pub fn for_image(
        width: u16, height: u16, format: PixelFormat, compression: Compression, comment: &str
    ) -> PicHeader {
        let channels = if format.has_alpha() {
            CHANNEL_RGB | CHANNEL_A
        } else {
            CHANNEL_RGB
        };
        let encoding = if compression.is_compressed() {
            PACKET_MIXED_RLE
        } else {
            PACKET_RAW
        };
        let mut end = comment.len().min(PIC_COMMENT_LENGTH - 1);
        while !comment.is_char_boundary(end) {
            end -= 1;
        }
        PicHeader {
            comment: String::from(&comment[..end]),
            width,
            height,
            ratio: if height == 0 {
                1.0
            } else {
                f32::from(width) / f32::from(height)
            },
            packets: alloc::vec![ChannelPacket {
                chained: 0,
                size: PACKET_BITS,
                encoding,
                channels
            }],
            ..Default::default()
        }
    }

    pub fn read<T: ByteReaderTrait>(
        stream: &mut ByteReader<T>
    ) -> Result<PicHeader, PicDecodeErrors> {
        let magic = stream.get_u32_be_err()?;
        if magic != PIC_MAGIC {
            return Err(PicDecodeErrors::WrongMagicBytes(magic));
        }
        let version = stream.get_f32_be_err()?;
        let comment = stream.read_fixed_bytes_or_error::<PIC_COMMENT_LENGTH>()?;
        let id = stream.read_fixed_bytes_or_error::<4>()?;

        if id != PIC_ID {
            return Err(PicDecodeErrors::WrongId(id));
        }
        let width = stream.get_u16_be_err()?;
        let height = stream.get_u16_be_err()?;
        let ratio = stream.get_f32_be_err()?;
        let fields = stream.get_u16_be_err()?;
        stream.skip(2)?;

        trace!("Version: {}", version);
        trace!("Width: {}", width);
        trace!("Height: {}", height);
        trace!("Ratio: {}", ratio);
        trace!("Fields: {}", fields);

        let mut packets = Vec::with_capacity(2);
        loop {
            let packet = ChannelPacket::read(stream)?;
            trace!("Channel packet: {:?}", packet);
            packets.push(packet);

            // colour plus alpha is the longest chain understood
            if packet.chained == 0 || packets.len() == 2 {
                break;
            }
        }
        Ok(PicHeader {
            version,
            comment: fixed_str(&comment),
            width,
            height,
            ratio,
            fields,
            packets
        })
    }

    pub fn write<T: ByteWriterTrait>(&self, writer: &mut ByteWriter<T>) -> Result<(), ByteIoError> {
        writer.write_u32_be_err(PIC_MAGIC)?;
        writer.write_f32_be_err(self.version)?;
        writer.write_fixed_str::<PIC_COMMENT_LENGTH>(&self.comment)?;
        writer.write_const_bytes(&PIC_ID)?;
        writer.write_u16_be_err(self.width)?;
        writer.write_u16_be_err(self.height)?;
        writer.write_f32_be_err(self.ratio)?;
        writer.write_u16_be_err(self.fields)?;
        writer.write_zeros(2)?;

        for packet in &self.packets {
            packet.write(writer)?;
        }
        Ok(())
    }

    /// Pixel format of the packet chain
    ///
    /// RGB, RGBA, or RGB chained to a separate alpha packet.
    pub fn format(&self) -> Result<PixelFormat, PicDecodeErrors> {
        let first = self.packets.first().copied().unwrap_or_default();

        let format = match self.packets.as_slice() {
            [packet] if packet.is(CHANNEL_RGB | CHANNEL_A, false) => PixelFormat::RGBA_U8,
            [packet] if packet.is(CHANNEL_RGB, false) => PixelFormat::RGB_U8,
            [colour, alpha] if colour.is(CHANNEL_RGB, true) && alpha.is(CHANNEL_A, false) => {
                PixelFormat::RGBA_U8
            }
            _ => return Err(PicDecodeErrors::UnsupportedChannels(first.channels, first.size))
        };
        for packet in &self.packets {
            if !matches!(packet.encoding, PACKET_RAW | PACKET_MIXED_RLE) {
                return Err(PicDecodeErrors::UnsupportedEncoding(packet.encoding));
            }
        }
        Ok(format)
    }

    /// Validate the header and describe the image it announces
    pub fn to_info(&self, options: &DecoderOptions) -> Result<ImageInfo, PicDecodeErrors> {
        let format = self.format()?;
        let width = usize::from(self.width);
        let height = usize::from(self.height);

        if width > options.get_max_width() {
            return Err(PicDecodeErrors::TooLargeDimensions(
                "width",
                options.get_max_width(),
                width
            ));
        }
        if height > options.get_max_height() {
            return Err(PicDecodeErrors::TooLargeDimensions(
                "height",
                options.get_max_height(),
                height
            ));
        }
        // rows are stored top to bottom
        let layout = PixelLayout {
            mirror: Mirror { x: false, y: true },
            ..Default::default()
        };
        let mut info = ImageInfo::from_layer(LayerInfo {
            layout,
            ..LayerInfo::new(width, height, format)
        });
        if self.packets.iter().any(|p| p.compression().is_compressed()) {
            info.compression = Compression::Rle;
        }
        if !self.comment.is_empty() {
            info.set_tag(tag_names::DESCRIPTION, self.comment.as_str());
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kino_core::bytestream::{ByteCursor, ByteReader, ByteWriter};
    use kino_core::info::Compression;
    use kino_core::options::DecoderOptions;
    use kino_core::pixel::PixelFormat;

    use crate::constants::{CHANNEL_A, CHANNEL_RGB, PACKET_RAW, PIC_HEADER_SIZE};
    use crate::header::{ChannelPacket, PicHeader};
    use crate::PicDecodeErrors;

    fn bytes(header: &PicHeader) -> Vec<u8> {
        let mut sink = Vec::new();
        header.write(&mut ByteWriter::new(&mut sink)).unwrap();
        sink
    }

    #[test]
    fn header_is_104_bytes_before_packets() {
        let header = PicHeader::for_image(4, 2, PixelFormat::RGB_U8, Compression::None, "");
        let data = bytes(&header);
        assert_eq!(data.len(), PIC_HEADER_SIZE + 4);
        assert_eq!(&data[..4], &[0x53, 0x80, 0xf6, 0x34]);
        assert_eq!(&data[88..92], b"PICT");
    }

    #[test]
    fn chained_alpha_is_rgba() {
        let mut header = PicHeader::for_image(2, 2, PixelFormat::RGB_U8, Compression::Rle, "hi");
        header.packets[0].chained = 1;
        header.packets.push(ChannelPacket {
            chained:  0,
            size:     8,
            encoding: PACKET_RAW,
            channels: CHANNEL_A
        });
        let data = bytes(&header);
        let read = PicHeader::read(&mut ByteReader::new(ByteCursor::new(&data))).unwrap();
        assert_eq!(read, header);

        let info = read.to_info(&DecoderOptions::default()).unwrap();
        assert_eq!(info.format(), PixelFormat::RGBA_U8);
        assert_eq!(info.compression, Compression::Rle);
        assert!(info.layout().mirror.y);
        assert_eq!(info.tag("Description"), Some("hi"));
    }

    #[test]
    fn unsupported_packets() {
        let mut header = PicHeader::for_image(1, 1, PixelFormat::RGB_U8, Compression::None, "");
        header.packets[0].channels = CHANNEL_A;
        assert!(matches!(
            header.format(),
            Err(PicDecodeErrors::UnsupportedChannels(CHANNEL_A, 8))
        ));

        let mut header = PicHeader::for_image(1, 1, PixelFormat::RGB_U8, Compression::None, "");
        header.packets[0].encoding = 1;
        assert!(matches!(header.format(), Err(PicDecodeErrors::UnsupportedEncoding(1))));

        let mut header = PicHeader::for_image(1, 1, PixelFormat::RGB_U8, Compression::None, "");
        header.packets[0].channels = CHANNEL_RGB;
        header.packets[0].size = 16;
        assert!(header.format().is_err());
    }

    #[test]
    fn wrong_magic_and_id() {
        let mut data = bytes(&PicHeader::for_image(1, 1, PixelFormat::RGB_U8, Compression::None, ""));
        data[88] = b'X';
        let err = PicHeader::read(&mut ByteReader::new(ByteCursor::new(&data)));
        assert!(matches!(err, Err(PicDecodeErrors::WrongId(_))));

        let err = PicHeader::read(&mut ByteReader::new(ByteCursor::new(vec![0; 110])));
        assert!(matches!(err, Err(PicDecodeErrors::WrongMagicBytes(0))));
    }
}
