/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Mixed run length packets of PIC scanlines
//!
//! One packet channel group of one scanline at a time, each pixel being
//! `channels` bytes taken from or stored into a wider output pixel.
//!
//! ```text
//! count < 128    count + 1 literal pixels follow
//! count == 128   a big endian u16 repeat count, then one pixel
//! count > 128    one pixel repeated count - 127 times
//! ```
use alloc::vec::Vec;

use kino_core::rle::RleError;

const MAX_LITERAL: usize = 128;
const MAX_SHORT_RUN: usize = 128;

fn take(input: &[u8], position: usize, len: usize) -> Result<&[u8], RleError> {
    position
        .checked_add(len)
        .and_then(|end| input.get(position..end))
        .ok_or(RleError::Truncated(position, len))
}

/// Decode `width` pixels of `channels` bytes into `row`, every `stride`
/// bytes starting at `offset`
///
/// # Returns
/// - `Ok(usize)`: Bytes of `input` consumed
pub fn decode(
    input: &[u8], row: &mut [u8], width: usize, channels: usize, stride: usize, offset: usize
) -> Result<usize, RleError> {
    if channels == 0 || offset + channels > stride {
        return Err(RleError::UnsupportedWidth(channels));
    }
    if row.len() < width * stride {
        return Err(RleError::BadLength(row.len(), stride));
    }
    let mut position = 0;
    let mut x = 0;

    let mut store = |x: usize, pixel: &[u8]| {
        let at = x * stride + offset;
        row[at..at + channels].copy_from_slice(pixel);
    };

    while x < width {
        let count = take(input, position, 1)?[0];
        position += 1;

        if count < 128 {
            let run = usize::from(count) + 1;
            if run > width - x {
                return Err(RleError::Overrun(run, width - x));
            }
            let pixels = take(input, position, run * channels)?;
            for pixel in pixels.chunks_exact(channels) {
                store(x, pixel);
                x += 1;
            }
            position += run * channels;
        } else {
            let run = if count == 128 {
                let bytes = take(input, position, 2)?;
                position += 2;
                usize::from(u16::from_be_bytes([bytes[0], bytes[1]]))
            } else {
                usize::from(count) - 127
            };
            if run > width - x {
                return Err(RleError::Overrun(run, width - x));
            }
            let pixel = take(input, position, channels)?;
            for _ in 0..run {
                store(x, pixel);
                x += 1;
            }
            position += channels;
        }
    }
    Ok(position)
}

/// Encode `width` pixels of `channels` bytes read from `row` every
/// `stride` bytes starting at `offset`, appending packets to `sink`
pub fn encode(
    row: &[u8], width: usize, channels: usize, stride: usize, offset: usize, sink: &mut Vec<u8>
) {
    let pixel = |x: usize| &row[x * stride + offset..x * stride + offset + channels];
    let mut x = 0;

    while x < width {
        let mut run = 1;
        while x + run < width && run < usize::from(u16::MAX) && pixel(x + run) == pixel(x) {
            run += 1;
        }
        if run >= 2 {
            if run <= MAX_SHORT_RUN {
                sink.push((run + 127) as u8);
            } else {
                sink.push(128);
                sink.extend_from_slice(&(run as u16).to_be_bytes());
            }
            sink.extend_from_slice(pixel(x));
            x += run;
            continue;
        }
        // gather literals up to the next pair of equal pixels
        let start = x;
        x += 1;
        while x < width && x - start < MAX_LITERAL && !(x + 1 < width && pixel(x) == pixel(x + 1)) {
            x += 1;
        }
        sink.push((x - start - 1) as u8);
        for i in start..x {
            sink.extend_from_slice(pixel(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kino_core::rle::RleError;
    use nanorand::{Rng, WyRand};

    use crate::mixed::{decode, encode};

    #[test]
    fn all_three_packet_kinds() {
        // 2 literals, a short run of 3, a long run of 300
        let mut input = vec![1, 10, 11, 130, 12, 128];
        input.extend_from_slice(&300_u16.to_be_bytes());
        input.push(13);

        let mut row = vec![0; 305];
        let used = decode(&input, &mut row, 305, 1, 1, 0).unwrap();

        assert_eq!(used, input.len());
        assert_eq!(&row[..5], &[10, 11, 12, 12, 12]);
        assert!(row[5..].iter().all(|v| *v == 13));
    }

    #[test]
    fn strided_alpha_lands_in_its_channel() {
        let mut row = vec![0; 8];
        decode(&[129, 200], &mut row, 2, 1, 4, 3).unwrap();
        assert_eq!(row, [0, 0, 0, 200, 0, 0, 0, 200]);
    }

    #[test]
    fn round_trip_runs_and_noise() {
        let mut rng = WyRand::new_seed(7);
        let width = 400;
        let mut row = vec![0_u8; width * 4];
        rng.fill(&mut row[..600]);
        row[600..1400].fill(3);

        for (channels, offset) in [(3, 0), (4, 0), (1, 3)] {
            let mut packets = Vec::new();
            encode(&row, width, channels, 4, offset, &mut packets);

            let mut out = vec![0; width * 4];
            let used = decode(&packets, &mut out, width, channels, 4, offset).unwrap();
            assert_eq!(used, packets.len());

            for x in 0..width {
                let at = x * 4 + offset;
                assert_eq!(out[at..at + channels], row[at..at + channels]);
            }
        }
    }

    #[test]
    fn truncation_and_overrun() {
        let mut row = vec![0; 4];
        assert!(matches!(
            decode(&[3, 1, 2], &mut row, 4, 1, 1, 0),
            Err(RleError::Truncated(..))
        ));
        assert!(matches!(
            decode(&[140, 1], &mut row, 4, 1, 1, 0),
            Err(RleError::Overrun(13, 4))
        ));
    }
}
