/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use alloc::string::String;
use core::fmt::Write;

use kino_core::bytestream::{ByteWriter, ByteWriterTrait};
use kino_core::options::EncoderOptions;
use kino_core::pixel::{PixelFormat, PixelType};

use crate::constants::{INFERNO_MAGIC, INFERNO_VALUE_WIDTH, KODAK_VALUE_WIDTH};
use crate::errors::LutEncodeErrors;
use crate::options::LutDialect;
use crate::table::load_sample;

/// A LUT text table encoder
///
/// Each pixel of a single row image becomes one table entry.
pub struct LutEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions,
    dialect: LutDialect
}

impl<'a> LutEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions, dialect: LutDialect) -> LutEncoder<'a> {
        LutEncoder {
            data,
            options,
            dialect
        }
    }

    pub const fn supports(format: PixelFormat) -> bool {
        matches!(
            format.pixel_type(),
            PixelType::U8 | PixelType::U10 | PixelType::U16
        )
    }

    /// Render the table as text
    fn render(&self) -> String {
        let format = self.options.get_format();
        let channels = format.channels();
        let entries = self.options.get_width();
        let mut text = String::with_capacity(entries * channels * (INFERNO_VALUE_WIDTH + 1) + 16);

        // writing into a String cannot fail
        match self.dialect {
            LutDialect::Inferno => {
                let _ = write!(text, "{INFERNO_MAGIC} {channels} {entries}\n\n");
                for channel in 0..channels {
                    for x in 0..entries {
                        let value = load_sample(self.data, format, x, channel);
                        let _ = writeln!(text, "{value:>INFERNO_VALUE_WIDTH$}");
                    }
                }
            }
            LutDialect::Kodak => {
                for x in 0..entries {
                    for channel in 0..channels {
                        let value = load_sample(self.data, format, x, channel);
                        let _ = write!(text, "{value:>KODAK_VALUE_WIDTH$}");
                    }
                    text.push('\n');
                }
            }
        }
        text
    }

    /// Encode the table into `sink`
    ///
    /// # Returns
    /// - `Ok(usize)`: Number of bytes written
    pub fn encode<T: ByteWriterTrait>(&self, sink: T) -> Result<usize, LutEncodeErrors> {
        let format = self.options.get_format();
        if !Self::supports(format) {
            return Err(LutEncodeErrors::UnsupportedFormat(format));
        }
        let height = self.options.get_height();
        if height != 1 {
            return Err(LutEncodeErrors::NotOneRow(height));
        }
        let expected = self.options.expected_byte_count();
        if self.data.len() < expected {
            return Err(LutEncodeErrors::TooShortInput(expected, self.data.len()));
        }
        let text = self.render();

        let mut writer = ByteWriter::new(sink);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(writer.bytes_written())
    }
}
