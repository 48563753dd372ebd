/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Word scanning and sample access shared by the decoder and encoder
use alloc::string::String;

use kino_core::pixel::{PixelFormat, PixelType};

use crate::constants::COMMENT;
use crate::errors::LutDecodeErrors;

/// Whitespace separated words of a table, skipping `#` comments
pub(crate) struct Words<'a> {
    text:     &'a [u8],
    position: usize
}

impl<'a> Words<'a> {
    pub fn new(text: &'a [u8], position: usize) -> Words<'a> {
        Words { text, position }
    }
    /// Offset of the byte after the last word returned
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        loop {
            let byte = *text.get(self.position)?;

            if byte == COMMENT {
                match text[self.position..].iter().position(|b| *b == b'\n') {
                    Some(end) => self.position += end,
                    None => self.position = text.len()
                }
            } else if byte.is_ascii_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
        let start = self.position;
        let end = text[start..]
            .iter()
            .position(|b| b.is_ascii_whitespace() || *b == COMMENT)
            .map_or(text.len(), |len| start + len);

        self.position = end;
        Some(&text[start..end])
    }
}

/// Count the words of one line, ignoring anything after a comment
pub(crate) fn line_words(line: &[u8]) -> usize {
    let end = line.iter().position(|b| *b == COMMENT).unwrap_or(line.len());
    Words::new(&line[..end], 0).count()
}

pub(crate) fn parse_number(word: &[u8]) -> Result<i64, LutDecodeErrors> {
    core::str::from_utf8(word)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| LutDecodeErrors::InvalidNumber(String::from_utf8_lossy(word).into_owned()))
}

/// Largest integer among `words`, words that are not numbers count as zero
pub(crate) fn max_value(words: Words<'_>) -> i64 {
    words
        .map(|word| parse_number(word).unwrap_or(0))
        .fold(0, i64::max)
}

/// Smallest of 8, 10 and 16 bits holding `value`
pub(crate) const fn bit_depth_for(value: i64) -> u8 {
    if value <= 255 {
        8
    } else if value <= 1023 {
        10
    } else {
        16
    }
}

/// Shift of channel `channel` inside a packed 10 bit word
const fn u10_shift(channel: usize) -> usize {
    22 - 10 * channel
}

/// Store `value`, clamped to the format's range, as channel `channel` of pixel `x`
///
/// 10 bit channels are or-ed into their word, the output must start zeroed.
pub(crate) fn store_sample(out: &mut [u8], format: PixelFormat, x: usize, channel: usize, value: i64) {
    let max = format.max_value() as i64;
    let value = value.clamp(0, max) as u32;
    let channels = format.channels();

    match format.pixel_type() {
        PixelType::U8 => out[x * channels + channel] = value as u8,
        PixelType::U10 => {
            let at = x * 4;
            let mut word = [0; 4];
            word.copy_from_slice(&out[at..at + 4]);
            let packed = u32::from_ne_bytes(word) | (value << u10_shift(channel));
            out[at..at + 4].copy_from_slice(&packed.to_ne_bytes());
        }
        _ => {
            let at = (x * channels + channel) * 2;
            out[at..at + 2].copy_from_slice(&(value as u16).to_ne_bytes());
        }
    }
}

/// Read channel `channel` of pixel `x`
pub(crate) fn load_sample(data: &[u8], format: PixelFormat, x: usize, channel: usize) -> u32 {
    let channels = format.channels();

    match format.pixel_type() {
        PixelType::U8 => u32::from(data[x * channels + channel]),
        PixelType::U10 => {
            let at = x * 4;
            let word = u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
            (word >> u10_shift(channel)) & 0x3ff
        }
        _ => {
            let at = (x * channels + channel) * 2;
            u32::from(u16::from_ne_bytes([data[at], data[at + 1]]))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kino_core::pixel::PixelFormat;

    use crate::table::{bit_depth_for, line_words, load_sample, max_value, store_sample, Words};

    #[test]
    fn words_skip_comments() {
        let text = b"# header\n 1  2#tail\n\t3\n#4\n";
        let words: Vec<&[u8]> = Words::new(text, 0).collect();
        assert_eq!(words, [&b"1"[..], b"2", b"3"]);
        assert_eq!(line_words(b"10 20 30 # 40"), 3);
    }

    #[test]
    fn auto_depth_picks_smallest_covering_depth() {
        assert_eq!(bit_depth_for(max_value(Words::new(b"0 255 x", 0))), 8);
        assert_eq!(bit_depth_for(max_value(Words::new(b"256 1023", 0))), 10);
        assert_eq!(bit_depth_for(max_value(Words::new(b"1024", 0))), 16);
    }

    #[test]
    fn samples_are_clamped_and_packed() {
        let mut out = vec![0; 4];
        store_sample(&mut out, PixelFormat::RGB_U10, 0, 0, 1023);
        store_sample(&mut out, PixelFormat::RGB_U10, 0, 2, 5000);
        assert_eq!(load_sample(&out, PixelFormat::RGB_U10, 0, 0), 1023);
        assert_eq!(load_sample(&out, PixelFormat::RGB_U10, 0, 1), 0);
        assert_eq!(load_sample(&out, PixelFormat::RGB_U10, 0, 2), 1023);

        let mut out = vec![0; 4];
        store_sample(&mut out, PixelFormat::LA_U16, 0, 1, -7);
        store_sample(&mut out, PixelFormat::LA_U16, 0, 0, 70000);
        assert_eq!(load_sample(&out, PixelFormat::LA_U16, 0, 0), 65535);
        assert_eq!(load_sample(&out, PixelFormat::LA_U16, 0, 1), 0);
    }
}
