/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The four blocks of a Cineon header
//!
//! ```text
//! block   offset  size
//! file         0   192  magic, offsets, sizes, version, name, time
//! image      192   488  orientation, 8 channel descriptors, chromaticity, label
//! format     680    32  interleave, packing, sign, sense, paddings
//! source     712   312  offsets, source file, time, input device, pitch, gamma
//! film      1024  1024  keycode, format, frame, frame rate, frame id, slate
//! ```
//!
//! Fields a writer did not fill are `0xff` bytes, `i32::MIN` for signed
//! integers and positive infinity for floats.
use alloc::string::String;

use kino_core::bytestream::{
    fixed_str, ByteEndian, ByteIoError, ByteReader, ByteReaderTrait, ByteWriter, ByteWriterTrait
};
use kino_core::info::{ImageInfo, LayerInfo};
use kino_core::log::{trace, warn};
use kino_core::options::DecoderOptions;
use kino_core::pixel::{Mirror, PixelFormat, PixelLayout};

use crate::constants::{
    BIT_DEPTH, CINEON_HEADER_SIZE, CINEON_MAGIC, CINEON_MAGIC_SWAPPED, DATA_FORMAT_BLOCK,
    DESCRIPTOR_R_FILM_PRINT, FIELD_LIMIT, FILM_BLOCK, IMAGE_BLOCK, MAX_CHANNELS,
    ORIENT_LEFT_RIGHT_BOTTOM_TOP, ORIENT_LEFT_RIGHT_TOP_BOTTOM,
    ORIENT_RIGHT_LEFT_BOTTOM_TOP, ORIENT_RIGHT_LEFT_TOP_BOTTOM,
    PACKING_FILLED_32, SOURCE_BLOCK, UNDEFINED_F32_BITS, UNDEFINED_I32, UNDEFINED_U32,
    UNDEFINED_U8
};
use crate::errors::CineonDecodeErrors;
use crate::options::ColorProfile;
use crate::tags::read_tags;

#[derive(Clone, Debug, PartialEq)]
pub struct FileBlock {
    pub image_offset:         u32,
    pub header_size:          u32,
    pub industry_header_size: u32,
    pub user_header_size:     u32,
    /// Total file size in bytes
    pub size:                 u32,
    pub version:              String,
    pub name:                 String,
    pub time:                 String
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChannelBlock {
    pub descriptor:    [u8; 2],
    pub bit_depth:     u8,
    pub size:          [u32; 2],
    pub low_data:      i32,
    pub low_quantity:  f32,
    pub high_data:     i32,
    pub high_quantity: f32
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    pub orient:          u8,
    pub channels:        u8,
    pub channel:         [ChannelBlock; MAX_CHANNELS],
    pub white:           [f32; 2],
    pub red:             [f32; 2],
    pub green:           [f32; 2],
    pub blue:            [f32; 2],
    pub label:           String,
    pub interleave:      u8,
    pub packing:         u8,
    pub data_sign:       u8,
    pub data_sense:      u8,
    pub line_padding:    u32,
    pub channel_padding: u32
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourceBlock {
    pub offset:       [i32; 2],
    pub file:         String,
    pub time:         String,
    pub input_device: String,
    pub input_model:  String,
    pub input_serial: String,
    pub input_pitch:  [f32; 2],
    pub gamma:        f32
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilmBlock {
    pub id:         u8,
    pub kind:       u8,
    pub offset:     u8,
    pub prefix:     u32,
    pub count:      u32,
    pub format:     String,
    pub frame:      u32,
    pub frame_rate: f32,
    pub frame_id:   String,
    pub slate:      String
}

/// A complete Cineon header
#[derive(Clone, Debug, PartialEq)]
pub struct CineonHeader {
    pub file:   FileBlock,
    pub image:  ImageBlock,
    pub source: SourceBlock,
    pub film:   FilmBlock,
    /// Byte order of every field and of the pixel words
    pub endian: ByteEndian
}

pub(crate) fn undefined_f32() -> f32 {
    f32::from_bits(UNDEFINED_F32_BITS)
}

pub(crate) const fn is_valid_u8(value: u8) -> bool {
    value != UNDEFINED_U8
}

pub(crate) fn is_valid_u32(value: u32) -> bool {
    value != UNDEFINED_U32 && f64::from(value) < FIELD_LIMIT
}

pub(crate) fn is_valid_i32(value: i32) -> bool {
    value != UNDEFINED_I32 && f64::from(value) > -FIELD_LIMIT && f64::from(value) < FIELD_LIMIT
}

pub(crate) fn is_valid_f32(value: f32) -> bool {
    // NaN fails both comparisons
    value.to_bits() != UNDEFINED_F32_BITS
        && f64::from(value) > -FIELD_LIMIT
        && f64::from(value) < FIELD_LIMIT
}

/// A text field is usable when it is not empty and printable up to its end
fn is_valid_text(field: &[u8]) -> bool {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    end > 0 && field[..end].iter().all(|b| (32..=126).contains(b))
}

impl ChannelBlock {
    fn undefined() -> ChannelBlock {
        ChannelBlock {
            descriptor:    [UNDEFINED_U8; 2],
            bit_depth:     UNDEFINED_U8,
            size:          [UNDEFINED_U32; 2],
            low_data:      UNDEFINED_I32,
            low_quantity:  undefined_f32(),
            high_data:     UNDEFINED_I32,
            high_quantity: undefined_f32()
        }
    }
}

impl CineonHeader {
    /// A header with every field undefined and every text field empty,
    /// the starting point of a writer
    pub fn undefined() -> CineonHeader {
        CineonHeader {
            file:   FileBlock {
                image_offset:         UNDEFINED_U32,
                header_size:          UNDEFINED_U32,
                industry_header_size: UNDEFINED_U32,
                user_header_size:     UNDEFINED_U32,
                size:                 UNDEFINED_U32,
                version:              String::new(),
                name:                 String::new(),
                time:                 String::new()
            },
            image:  ImageBlock {
                orient:          UNDEFINED_U8,
                channels:        UNDEFINED_U8,
                channel:         [ChannelBlock::undefined(); MAX_CHANNELS],
                white:           [f32::from_bits(UNDEFINED_U32); 2],
                red:             [f32::from_bits(UNDEFINED_U32); 2],
                green:           [f32::from_bits(UNDEFINED_U32); 2],
                blue:            [f32::from_bits(UNDEFINED_U32); 2],
                label:           String::new(),
                interleave:      UNDEFINED_U8,
                packing:         UNDEFINED_U8,
                data_sign:       UNDEFINED_U8,
                data_sense:      UNDEFINED_U8,
                line_padding:    UNDEFINED_U32,
                channel_padding: UNDEFINED_U32
            },
            source: SourceBlock {
                offset:       [UNDEFINED_I32; 2],
                file:         String::new(),
                time:         String::new(),
                input_device: String::new(),
                input_model:  String::new(),
                input_serial: String::new(),
                input_pitch:  [undefined_f32(); 2],
                gamma:        undefined_f32()
            },
            film:   FilmBlock {
                id:         UNDEFINED_U8,
                kind:       UNDEFINED_U8,
                offset:     UNDEFINED_U8,
                prefix:     UNDEFINED_U32,
                count:      UNDEFINED_U32,
                format:     String::new(),
                frame:      UNDEFINED_U32,
                frame_rate: undefined_f32(),
                frame_id:   String::new(),
                slate:      String::new()
            },
            endian: ByteEndian::BE
        }
    }

    /// Read all four blocks, leaving the stream at the end of the header
    ///
    /// The magic decides the byte order of every following field.
    pub fn read<T: ByteReaderTrait>(
        stream: &mut ByteReader<T>
    ) -> Result<CineonHeader, CineonDecodeErrors> {
        let magic = stream.get_u32_be_err()?;

        let endian = match magic {
            CINEON_MAGIC => ByteEndian::BE,
            CINEON_MAGIC_SWAPPED => ByteEndian::LE,
            _ => return Err(CineonDecodeErrors::WrongMagicBytes(magic))
        };
        trace!("Cineon fields are {:?}", endian);

        let mut fields = FieldReader { stream, endian };

        let file = FileBlock {
            image_offset:         fields.u32()?,
            header_size:          fields.u32()?,
            industry_header_size: fields.u32()?,
            user_header_size:     fields.u32()?,
            size:                 fields.u32()?,
            version:              fields.text::<8>()?,
            name:                 fields.text::<100>()?,
            time:                 fields.text::<24>()?
        };
        fields.skip_to(IMAGE_BLOCK)?;

        let orient = fields.u8()?;
        let channels = fields.u8()?;
        fields.skip(2)?;

        let mut channel = [ChannelBlock::undefined(); MAX_CHANNELS];
        for block in channel.iter_mut() {
            block.descriptor = [fields.u8()?, fields.u8()?];
            block.bit_depth = fields.u8()?;
            fields.skip(1)?;
            block.size = [fields.u32()?, fields.u32()?];
            block.low_data = fields.i32()?;
            block.low_quantity = fields.f32()?;
            block.high_data = fields.i32()?;
            block.high_quantity = fields.f32()?;
        }
        let white = [fields.f32()?, fields.f32()?];
        let red = [fields.f32()?, fields.f32()?];
        let green = [fields.f32()?, fields.f32()?];
        let blue = [fields.f32()?, fields.f32()?];
        let label = fields.text::<200>()?;
        fields.skip_to(DATA_FORMAT_BLOCK)?;

        let image = ImageBlock {
            orient,
            channels,
            channel,
            white,
            red,
            green,
            blue,
            label,
            interleave: fields.u8()?,
            packing: fields.u8()?,
            data_sign: fields.u8()?,
            data_sense: fields.u8()?,
            line_padding: fields.u32()?,
            channel_padding: fields.u32()?
        };
        fields.skip_to(SOURCE_BLOCK)?;

        let source = SourceBlock {
            offset:       [fields.i32()?, fields.i32()?],
            file:         fields.text::<100>()?,
            time:         fields.text::<24>()?,
            input_device: fields.text::<64>()?,
            input_model:  fields.text::<32>()?,
            input_serial: fields.text::<32>()?,
            input_pitch:  [fields.f32()?, fields.f32()?],
            gamma:        fields.f32()?
        };
        fields.skip_to(FILM_BLOCK)?;

        let id = fields.u8()?;
        let kind = fields.u8()?;
        let offset = fields.u8()?;
        fields.skip(1)?;

        let film = FilmBlock {
            id,
            kind,
            offset,
            prefix: fields.u32()?,
            count: fields.u32()?,
            format: fields.text::<32>()?,
            frame: fields.u32()?,
            frame_rate: fields.f32()?,
            frame_id: fields.text::<32>()?,
            slate: fields.text::<200>()?
        };
        fields.skip_to(CINEON_HEADER_SIZE)?;

        let header = CineonHeader {
            file,
            image,
            source,
            film,
            endian
        };
        header.trace();
        Ok(header)
    }

    /// Write all four blocks in `endian` order, padding with `0xff`
    pub fn write<T: ByteWriterTrait>(
        &self, writer: &mut ByteWriter<T>, endian: ByteEndian
    ) -> Result<(), ByteIoError> {
        let start = writer.bytes_written();
        let pad_to = |writer: &mut ByteWriter<T>, offset: usize| {
            let at = writer.bytes_written() - start;
            writer.write_repeated(UNDEFINED_U8, offset.saturating_sub(at))
        };

        let file = &self.file;
        writer.write_u32(CINEON_MAGIC, endian)?;
        writer.write_u32(file.image_offset, endian)?;
        writer.write_u32(file.header_size, endian)?;
        writer.write_u32(file.industry_header_size, endian)?;
        writer.write_u32(file.user_header_size, endian)?;
        writer.write_u32(file.size, endian)?;
        writer.write_fixed_str::<8>(&file.version)?;
        writer.write_fixed_str::<100>(&file.name)?;
        writer.write_fixed_str::<24>(&file.time)?;
        pad_to(writer, IMAGE_BLOCK)?;

        let image = &self.image;
        writer.write_u8_err(image.orient)?;
        writer.write_u8_err(image.channels)?;
        writer.write_repeated(UNDEFINED_U8, 2)?;

        for block in &image.channel {
            writer.write_u8_err(block.descriptor[0])?;
            writer.write_u8_err(block.descriptor[1])?;
            writer.write_u8_err(block.bit_depth)?;
            writer.write_u8_err(UNDEFINED_U8)?;
            writer.write_u32(block.size[0], endian)?;
            writer.write_u32(block.size[1], endian)?;
            writer.write_i32(block.low_data, endian)?;
            writer.write_f32(block.low_quantity, endian)?;
            writer.write_i32(block.high_data, endian)?;
            writer.write_f32(block.high_quantity, endian)?;
        }
        for value in [image.white, image.red, image.green, image.blue]
            .iter()
            .flatten()
        {
            writer.write_f32(*value, endian)?;
        }
        writer.write_fixed_str::<200>(&image.label)?;
        pad_to(writer, DATA_FORMAT_BLOCK)?;

        writer.write_u8_err(image.interleave)?;
        writer.write_u8_err(image.packing)?;
        writer.write_u8_err(image.data_sign)?;
        writer.write_u8_err(image.data_sense)?;
        writer.write_u32(image.line_padding, endian)?;
        writer.write_u32(image.channel_padding, endian)?;
        pad_to(writer, SOURCE_BLOCK)?;

        let source = &self.source;
        writer.write_i32(source.offset[0], endian)?;
        writer.write_i32(source.offset[1], endian)?;
        writer.write_fixed_str::<100>(&source.file)?;
        writer.write_fixed_str::<24>(&source.time)?;
        writer.write_fixed_str::<64>(&source.input_device)?;
        writer.write_fixed_str::<32>(&source.input_model)?;
        writer.write_fixed_str::<32>(&source.input_serial)?;
        writer.write_f32(source.input_pitch[0], endian)?;
        writer.write_f32(source.input_pitch[1], endian)?;
        writer.write_f32(source.gamma, endian)?;
        pad_to(writer, FILM_BLOCK)?;

        let film = &self.film;
        writer.write_u8_err(film.id)?;
        writer.write_u8_err(film.kind)?;
        writer.write_u8_err(film.offset)?;
        writer.write_u8_err(UNDEFINED_U8)?;
        writer.write_u32(film.prefix, endian)?;
        writer.write_u32(film.count, endian)?;
        writer.write_fixed_str::<32>(&film.format)?;
        writer.write_u32(film.frame, endian)?;
        writer.write_f32(film.frame_rate, endian)?;
        writer.write_fixed_str::<32>(&film.frame_id)?;
        writer.write_fixed_str::<200>(&film.slate)?;
        pad_to(writer, CINEON_HEADER_SIZE)
    }

    /// Film print when the first channel says so, raw code values otherwise
    pub const fn color_profile(&self) -> ColorProfile {
        if self.image.channel[0].descriptor[1] == DESCRIPTOR_R_FILM_PRINT {
            ColorProfile::FilmPrint
        } else {
            ColorProfile::Raw
        }
    }

    /// Row and column order announced by the orientation field
    pub const fn mirror(&self) -> Mirror {
        match self.image.orient {
            ORIENT_LEFT_RIGHT_TOP_BOTTOM => Mirror { x: false, y: true },
            ORIENT_RIGHT_LEFT_TOP_BOTTOM => Mirror { x: true, y: false },
            ORIENT_RIGHT_LEFT_BOTTOM_TOP => Mirror { x: true, y: true },
            ORIENT_LEFT_RIGHT_BOTTOM_TOP => Mirror { x: false, y: false },
            // rotated orientations 4 to 7 are read as stored
            _ => Mirror { x: false, y: false }
        }
    }

    /// Validate the header and describe the image it announces
    ///
    /// Only three channels of 10 bits packed into 32 bit words can be read.
    pub fn to_info(&self, options: &DecoderOptions) -> Result<ImageInfo, CineonDecodeErrors> {
        let channels = self.image.channels;

        if channels == 0 || usize::from(channels) > MAX_CHANNELS {
            return Err(CineonDecodeErrors::UnsupportedChannels(channels));
        }
        let first = &self.image.channel[0];

        for (i, block) in self.image.channel[..usize::from(channels)]
            .iter()
            .enumerate()
            .skip(1)
        {
            if block.size != first.size || block.bit_depth != first.bit_depth {
                return Err(CineonDecodeErrors::MismatchedChannel(i));
            }
        }
        if channels != 3 || first.bit_depth != BIT_DEPTH {
            return Err(CineonDecodeErrors::UnsupportedLayout(channels, first.bit_depth));
        }
        let line_padding = self.image.line_padding;
        let channel_padding = self.image.channel_padding;

        if (is_valid_u32(line_padding) && line_padding != 0)
            || (is_valid_u32(channel_padding) && channel_padding != 0)
        {
            return Err(CineonDecodeErrors::UnsupportedPadding(
                line_padding,
                channel_padding
            ));
        }
        if self.image.packing != PACKING_FILLED_32 {
            warn!("Unexpected packing {}, reading as filled 32 bit words", self.image.packing);
        }
        let width = first.size[0] as usize;
        let height = first.size[1] as usize;

        if width > options.get_max_width() {
            return Err(CineonDecodeErrors::TooLargeDimensions(
                "width",
                options.get_max_width(),
                width
            ));
        }
        if height > options.get_max_height() {
            return Err(CineonDecodeErrors::TooLargeDimensions(
                "height",
                options.get_max_height(),
                height
            ));
        }
        let layout = PixelLayout {
            endian: self.endian,
            mirror: self.mirror(),
            ..Default::default()
        };
        let mut info = ImageInfo::from_layer(LayerInfo {
            layout,
            ..LayerInfo::new(width, height, PixelFormat::RGB_U10)
        });
        read_tags(self, &mut info);

        Ok(info)
    }

    fn trace(&self) {
        trace!("Image offset: {}", self.file.image_offset);
        trace!(
            "Header sizes: generic {} industry {} user {}",
            self.file.header_size,
            self.file.industry_header_size,
            self.file.user_header_size
        );
        trace!("File size: {}", self.file.size);
        trace!("Version: {}", self.file.version);
        trace!("Orient: {}", self.image.orient);
        trace!("Channels: {}", self.image.channels);
        for (i, block) in self
            .image
            .channel
            .iter()
            .take(usize::from(self.image.channels).min(MAX_CHANNELS))
            .enumerate()
        {
            trace!(
                "Channel {}: descriptor {:?}, {} bits, {}x{}",
                i,
                block.descriptor,
                block.bit_depth,
                block.size[0],
                block.size[1]
            );
        }
        trace!(
            "Interleave {} packing {} sign {} sense {}",
            self.image.interleave,
            self.image.packing,
            self.image.data_sign,
            self.image.data_sense
        );
        trace!(
            "Line padding {} channel padding {}",
            self.image.line_padding,
            self.image.channel_padding
        );
    }
}

/// Reads header fields in the byte order announced by the magic
struct FieldReader<'a, T: ByteReaderTrait> {
    stream: &'a mut ByteReader<T>,
    endian: ByteEndian
}

impl<T: ByteReaderTrait> FieldReader<'_, T> {
    fn u8(&mut self) -> Result<u8, ByteIoError> {
        self.stream.get_u8_err()
    }
    fn u32(&mut self) -> Result<u32, ByteIoError> {
        self.stream.get_u32(self.endian)
    }
    fn i32(&mut self) -> Result<i32, ByteIoError> {
        self.stream.get_i32(self.endian)
    }
    fn f32(&mut self) -> Result<f32, ByteIoError> {
        self.stream.get_f32(self.endian)
    }
    /// A text field, empty unless it holds printable characters
    fn text<const N: usize>(&mut self) -> Result<String, ByteIoError> {
        let field = self.stream.read_fixed_bytes_or_error::<N>()?;
        if is_valid_text(&field) {
            Ok(fixed_str(&field))
        } else {
            Ok(String::new())
        }
    }
    fn skip(&mut self, count: usize) -> Result<(), ByteIoError> {
        self.stream.skip(count)?;
        Ok(())
    }
    /// Skip padding up to the start of the next block
    fn skip_to(&mut self, offset: usize) -> Result<(), ByteIoError> {
        // the whole header must be present, a seek alone would not notice
        let position = self.stream.position()? as usize;
        let mut padding = [0_u8; 128];
        let mut left = offset.saturating_sub(position);
        while left > 0 {
            let size = left.min(padding.len());
            self.stream.read_exact_bytes(&mut padding[..size])?;
            left -= size;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kino_core::bytestream::{ByteCursor, ByteEndian, ByteReader, ByteWriter};

    use crate::constants::CINEON_HEADER_SIZE;
    use crate::header::{is_valid_f32, is_valid_i32, is_valid_text, is_valid_u32, CineonHeader};
    use crate::CineonDecodeErrors;

    #[test]
    fn validity_rules() {
        assert!(!is_valid_u32(0xffff_ffff));
        assert!(!is_valid_u32(1_000_000));
        assert!(is_valid_u32(999_999));
        assert!(!is_valid_i32(i32::MIN));
        assert!(!is_valid_i32(-1_000_000));
        assert!(is_valid_i32(-5));
        assert!(!is_valid_f32(f32::INFINITY));
        assert!(!is_valid_f32(f32::NAN));
        assert!(is_valid_f32(24.0));
        assert!(!is_valid_text(b"\0abc"));
        assert!(!is_valid_text(b"ab\x07\0"));
        assert!(is_valid_text(b"abc\0\xff\xff"));
    }

    #[test]
    fn undefined_header_is_2048_bytes_of_sentinels() {
        let header = CineonHeader::undefined();
        let mut sink = Vec::new();
        let mut writer = ByteWriter::new(&mut sink);
        header.write(&mut writer, ByteEndian::BE).unwrap();

        assert_eq!(sink.len(), CINEON_HEADER_SIZE);
        // magic, then undefined image offset
        assert_eq!(&sink[0..8], &[0x80, 0x2a, 0x5f, 0xd7, 0xff, 0xff, 0xff, 0xff]);
        // version text is zeroed
        assert_eq!(&sink[24..32], &[0; 8]);
        // orient, channels
        assert_eq!(&sink[192..194], &[0xff, 0xff]);
        // low data of channel 0 is i32::MIN
        assert_eq!(&sink[208..212], &[0x80, 0, 0, 0]);
        // film frame rate is +inf
        assert_eq!(&sink[1072..1076], &[0x7f, 0x80, 0, 0]);
    }

    #[test]
    fn both_byte_orders_read_back() {
        let mut header = CineonHeader::undefined();
        header.file.image_offset = 2048;
        header.image.channels = 3;
        header.image.channel[1].size = [640, 480];
        header.source.gamma = 1.7;
        header.film.slate = "slate".into();

        for endian in [ByteEndian::BE, ByteEndian::LE] {
            let mut sink = Vec::new();
            header.write(&mut ByteWriter::new(&mut sink), endian).unwrap();

            let mut reader = ByteReader::new(ByteCursor::new(&sink));
            let read = CineonHeader::read(&mut reader).unwrap();

            assert_eq!(read.endian, endian);
            assert_eq!(read.file.image_offset, 2048);
            assert_eq!(read.image.channel[1].size, [640, 480]);
            assert_eq!(read.source.gamma, 1.7);
            assert_eq!(read.film.slate, "slate");
            assert_eq!(reader.position().unwrap(), 2048);
        }
    }

    #[test]
    fn wrong_magic_and_truncation() {
        let mut reader = ByteReader::new(ByteCursor::new([0_u8; 2048]));
        assert!(matches!(
            CineonHeader::read(&mut reader),
            Err(CineonDecodeErrors::WrongMagicBytes(0))
        ));

        let mut sink = Vec::new();
        CineonHeader::undefined()
            .write(&mut ByteWriter::new(&mut sink), ByteEndian::BE)
            .unwrap();
        sink.truncate(1500);
        let mut reader = ByteReader::new(ByteCursor::new(&sink));
        assert!(matches!(
            CineonHeader::read(&mut reader),
            Err(CineonDecodeErrors::IoErrors(_))
        ));
    }
}
