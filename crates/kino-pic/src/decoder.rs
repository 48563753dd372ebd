/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::vec;
use alloc::vec::Vec;

use kino_core::bytestream::{ByteIoError, ByteReader, ByteReaderTrait};
use kino_core::info::ImageInfo;
use kino_core::options::DecoderOptions;

use crate::constants::PACKET_MIXED_RLE;
use crate::errors::PicDecodeErrors;
use crate::header::PicHeader;
use crate::mixed;

/// A Softimage PIC decoder
///
/// Pixels come out interleaved, top row first, with a chained alpha
/// packet merged into the fourth channel.
pub struct PicDecoder<T: ByteReaderTrait> {
    stream:          ByteReader<T>,
    options:         DecoderOptions,
    header:          PicHeader,
    info:            ImageInfo,
    decoded_headers: bool
}

impl<T: ByteReaderTrait> PicDecoder<T> {
    pub fn new(data: T) -> PicDecoder<T> {
        PicDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: T, options: DecoderOptions) -> PicDecoder<T> {
        PicDecoder {
            stream: ByteReader::new(data),
            options,
            header: PicHeader::default(),
            info: ImageInfo::default(),
            decoded_headers: false
        }
    }

    pub fn decode_headers(&mut self) -> Result<(), PicDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        self.header = PicHeader::read(&mut self.stream)?;
        self.info = self.header.to_info(&self.options)?;
        self.decoded_headers = true;
        Ok(())
    }

    pub fn info(&self) -> Option<&ImageInfo> {
        self.decoded_headers.then_some(&self.info)
    }

    pub fn header(&self) -> Option<&PicHeader> {
        self.decoded_headers.then_some(&self.header)
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.info().map(ImageInfo::dimensions)
    }

    pub fn output_buffer_size(&self) -> Option<usize> {
        self.info().map(ImageInfo::data_byte_count)
    }

    pub fn decode(&mut self) -> Result<Vec<u8>, PicDecodeErrors> {
        self.decode_headers()?;
        let mut out = vec![0; self.info.data_byte_count()];
        self.decode_into(&mut out)?;
        Ok(out)
    }

    pub fn decode_into(&mut self, sink: &mut [u8]) -> Result<(), PicDecodeErrors> {
        self.decode_headers()?;

        let size = self.info.data_byte_count();
        if sink.len() < size {
            return Err(PicDecodeErrors::TooSmallOutput(size, sink.len()));
        }
        let width = self.info.width();
        let stride = self.info.format().byte_width();
        let row_bytes = width * stride;

        if row_bytes == 0 {
            return Ok(());
        }
        // each packet fills its channels starting where the previous stopped
        let mut groups = Vec::with_capacity(self.header.packets.len());
        let mut offset = 0;
        for packet in &self.header.packets {
            let channels = packet.channel_count();
            groups.push((packet.encoding, channels, offset));
            offset += channels;
        }
        let data = self.stream.remaining_bytes()?;
        let mut position = 0;

        for row in sink[..size].chunks_exact_mut(row_bytes) {
            for &(encoding, channels, offset) in &groups {
                let input = &data[position..];

                if encoding == PACKET_MIXED_RLE {
                    position += mixed::decode(input, row, width, channels, stride, offset)?;
                } else {
                    let needed = width * channels;
                    let pixels = input
                        .get(..needed)
                        .ok_or(ByteIoError::NotEnoughBytes(needed, input.len()))?;

                    for (x, pixel) in pixels.chunks_exact(channels).enumerate() {
                        let at = x * stride + offset;
                        row[at..at + channels].copy_from_slice(pixel);
                    }
                    position += needed;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kino_core::bytestream::{ByteCursor, ByteWriter};
    use kino_core::info::Compression;
    use kino_core::pixel::PixelFormat;

    use crate::constants::{CHANNEL_A, PACKET_MIXED_RLE, PACKET_RAW};
    use crate::header::{ChannelPacket, PicHeader};
    use crate::{PicDecodeErrors, PicDecoder};

    fn file(header: &PicHeader, body: &[u8]) -> Vec<u8> {
        let mut sink = Vec::new();
        header.write(&mut ByteWriter::new(&mut sink)).unwrap();
        sink.extend_from_slice(body);
        sink
    }

    #[test]
    fn raw_colour_with_rle_alpha() {
        let mut header = PicHeader::for_image(2, 1, PixelFormat::RGB_U8, Compression::None, "");
        header.packets[0].chained = 1;
        header.packets.push(ChannelPacket {
            chained:  0,
            size:     8,
            encoding: PACKET_MIXED_RLE,
            channels: CHANNEL_A
        });
        // two raw RGB pixels, then one repeat packet of alpha
        let data = file(&header, &[1, 2, 3, 4, 5, 6, 129, 99]);

        let mut decoder = PicDecoder::new(ByteCursor::new(data));
        let pixels = decoder.decode().unwrap();

        assert_eq!(decoder.info().unwrap().format(), PixelFormat::RGBA_U8);
        assert_eq!(pixels, [1, 2, 3, 99, 4, 5, 6, 99]);
    }

    #[test]
    fn raw_alpha_after_rle_colour() {
        let mut header = PicHeader::for_image(2, 1, PixelFormat::RGB_U8, Compression::Rle, "");
        header.packets[0].chained = 1;
        header.packets.push(ChannelPacket {
            chained:  0,
            size:     8,
            encoding: PACKET_RAW,
            channels: CHANNEL_A
        });
        let data = file(&header, &[129, 7, 8, 9, 10, 20]);
        let pixels = PicDecoder::new(ByteCursor::new(data)).decode().unwrap();
        assert_eq!(pixels, [7, 8, 9, 10, 7, 8, 9, 20]);
    }

    #[test]
    fn truncated_raw_rows() {
        let header = PicHeader::for_image(2, 2, PixelFormat::RGB_U8, Compression::None, "");
        let data = file(&header, &[0; 9]);
        let err = PicDecoder::new(ByteCursor::new(data)).decode();
        assert!(matches!(err, Err(PicDecodeErrors::IoErrors(_))));
    }
}
