/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;

use kino_core::info::ImageInfo;
use kino_core::log::trace;
use kino_core::options::DecoderOptions;
use kino_core::pixel::{PixelFormat, PixelKind};

use crate::constants::INFERNO_MAGIC;
use crate::errors::LutDecodeErrors;
use crate::options::{LutDialect, LutType};
use crate::table::{bit_depth_for, line_words, max_value, parse_number, Words};

/// What the start of a table announces
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LutHeader {
    pub dialect:    LutDialect,
    pub channels:   usize,
    /// Number of entries
    pub size:       usize,
    pub bit_depth:  u8,
    /// Byte offset of the first value
    pub data_start: usize
}

impl LutHeader {
    /// Parse the header of `text`
    ///
    /// With [`LutType::Auto`] every value is scanned for the largest one
    /// to pick the bit depth.
    pub fn read(text: &[u8], dialect: LutDialect, kind: LutType) -> Result<LutHeader, LutDecodeErrors> {
        let (channels, size, data_start) = match dialect {
            LutDialect::Inferno => Self::read_inferno(text)?,
            LutDialect::Kodak => Self::read_kodak(text)?
        };
        if size == 0 {
            return Err(LutDecodeErrors::NoEntries);
        }
        let bit_depth = match kind.bit_depth() {
            Some(depth) => depth,
            None => bit_depth_for(max_value(Words::new(text, data_start)))
        };
        trace!("Dialect: {:?}", dialect);
        trace!("Channels: {}", channels);
        trace!("Size: {}", size);
        trace!("Bit depth: {}", bit_depth);

        Ok(LutHeader {
            dialect,
            channels,
            size,
            bit_depth,
            data_start
        })
    }

    /// `LUT: <channels> <size>`
    fn read_inferno(text: &[u8]) -> Result<(usize, usize, usize), LutDecodeErrors> {
        let mut words = Words::new(text, 0);

        let magic = words.next().unwrap_or_default();
        if magic != INFERNO_MAGIC.as_bytes() {
            return Err(LutDecodeErrors::WrongMagic(
                String::from_utf8_lossy(magic).into_owned()
            ));
        }
        let mut number = || {
            let word = words.next().ok_or(LutDecodeErrors::MissingValues(2, 0))?;
            Ok::<_, LutDecodeErrors>(parse_number(word)?.max(0) as usize)
        };
        let channels = number()?;
        let size = number()?;

        Ok((channels, size, words.position()))
    }

    /// The first line with values decides the channel count,
    /// every further line with values adds an entry
    fn read_kodak(text: &[u8]) -> Result<(usize, usize, usize), LutDecodeErrors> {
        let mut lines = text.split(|b| *b == b'\n').map(line_words);

        let channels = lines
            .by_ref()
            .find(|words| *words > 0)
            .ok_or(LutDecodeErrors::NoEntries)?;
        let size = 1 + lines.filter(|words| *words > 0).count();

        Ok((channels, size, 0))
    }

    pub fn format(&self) -> Result<PixelFormat, LutDecodeErrors> {
        PixelFormat::from_channels_and_depth(self.channels, self.bit_depth, PixelKind::Integer)
            .ok_or(LutDecodeErrors::UnsupportedFormat(self.channels, self.bit_depth))
    }

    /// Describe the table as a `size x 1` image
    pub fn to_info(&self, options: &DecoderOptions) -> Result<ImageInfo, LutDecodeErrors> {
        let format = self.format()?;

        if self.size > options.get_max_width() {
            return Err(LutDecodeErrors::TooLargeDimensions(
                options.get_max_width(),
                self.size
            ));
        }
        Ok(ImageInfo::new(self.size, 1, format))
    }
}

#[cfg(test)]
mod tests {
    use kino_core::options::DecoderOptions;
    use kino_core::pixel::PixelFormat;

    use crate::header::LutHeader;
    use crate::{LutDecodeErrors, LutDialect, LutType};

    #[test]
    fn inferno_header_and_auto_depth() {
        let text = b"LUT: 3 2\n\n0\n1023\n0\n512\n0\n4\n";
        let header = LutHeader::read(text, LutDialect::Inferno, LutType::Auto).unwrap();

        assert_eq!(header.channels, 3);
        assert_eq!(header.size, 2);
        assert_eq!(header.bit_depth, 10);
        assert_eq!(&text[header.data_start..header.data_start + 1], b"\n");

        let info = header.to_info(&DecoderOptions::default()).unwrap();
        assert_eq!(info.dimensions(), (2, 1));
        assert_eq!(info.format(), PixelFormat::RGB_U10);
    }

    #[test]
    fn forced_type_overrides_scan() {
        let text = b"LUT: 1 2 0 2000";
        let header = LutHeader::read(text, LutDialect::Inferno, LutType::U8).unwrap();
        assert_eq!(header.bit_depth, 8);
    }

    #[test]
    fn ten_bit_needs_three_channels() {
        let text = b"LUT: 1 1 1000";
        let header = LutHeader::read(text, LutDialect::Inferno, LutType::Auto).unwrap();
        assert!(matches!(
            header.to_info(&DecoderOptions::default()),
            Err(LutDecodeErrors::UnsupportedFormat(1, 10))
        ));
    }

    #[test]
    fn wrong_magic() {
        let err = LutHeader::read(b"    12 12", LutDialect::Inferno, LutType::Auto);
        assert!(matches!(err, Err(LutDecodeErrors::WrongMagic(word)) if word == "12"));
    }

    #[test]
    fn kodak_counts_lines_with_values() {
        let text = b"# a kodak table\n# two columns\n   0   10\n 100  110 # note\n\n 200  210\n";
        let header = LutHeader::read(text, LutDialect::Kodak, LutType::Auto).unwrap();
        assert_eq!(header.channels, 2);
        assert_eq!(header.size, 3);
        assert_eq!(header.bit_depth, 8);
        assert_eq!(header.data_start, 0);

        let err = LutHeader::read(b"# nothing\n", LutDialect::Kodak, LutType::Auto);
        assert!(matches!(err, Err(LutDecodeErrors::NoEntries)));
    }
}
