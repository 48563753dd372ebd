/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Interleaved run length codec
//!
//! Packets cover whole pixels of one to four bytes. The control byte
//! holds `count - 1` in its low seven bits, bit 7 set marks a repeat
//! packet followed by one pixel, bit 7 clear a literal packet followed
//! by `count` pixels.
use alloc::vec::Vec;

use crate::rle::{take, RleError};

/// Most pixels a single packet can describe
const MAX_PACKET: usize = 128;

/// Decode interleaved run length encoded pixels until `output` is full
///
/// Packets may cross scanline boundaries, so whole images can be
/// decoded in one call.
///
/// # Returns
/// - `Ok(usize)`: Bytes of `input` consumed
/// - `Err`: The stream is truncated or a packet overruns `output`
pub fn decode(input: &[u8], output: &mut [u8], pixel_width: usize) -> Result<usize, RleError> {
    if !(1..=4).contains(&pixel_width) {
        return Err(RleError::UnsupportedWidth(pixel_width));
    }
    if output.len() % pixel_width != 0 {
        return Err(RleError::BadLength(output.len(), pixel_width));
    }
    let total = output.len() / pixel_width;
    let mut position = 0;
    let mut written = 0;

    while written < total {
        let control = take(input, position, 1)?[0];
        position += 1;

        let count = usize::from(control & 0x7f) + 1;
        let repeat = control & 0x80 != 0;

        if count > total - written {
            return Err(RleError::Overrun(count, total - written));
        }
        let out = &mut output[written * pixel_width..(written + count) * pixel_width];

        if repeat {
            let pixel = take(input, position, pixel_width)?;
            for chunk in out.chunks_exact_mut(pixel_width) {
                chunk.copy_from_slice(pixel);
            }
            position += pixel_width;
        } else {
            out.copy_from_slice(take(input, position, count * pixel_width)?);
            position += count * pixel_width;
        }
        written += count;
    }
    Ok(position)
}

/// Encode a run of pixels, usually one scanline, appending to `sink`
///
/// Two or more equal pixels become a repeat packet, anything else is
/// gathered into literal packets of up to 128 pixels.
///
/// # Returns
/// Number of bytes appended
pub fn encode(input: &[u8], pixel_width: usize, sink: &mut Vec<u8>) -> Result<usize, RleError> {
    if !(1..=4).contains(&pixel_width) {
        return Err(RleError::UnsupportedWidth(pixel_width));
    }
    if input.len() % pixel_width != 0 {
        return Err(RleError::BadLength(input.len(), pixel_width));
    }
    let start_len = sink.len();
    let total = input.len() / pixel_width;
    let pixel = |i: usize| &input[i * pixel_width..(i + 1) * pixel_width];

    let mut i = 0;
    while i < total {
        let mut run = 1;
        while i + run < total && run < MAX_PACKET && pixel(i + run) == pixel(i) {
            run += 1;
        }
        if run > 1 {
            sink.push(0x80 | (run - 1) as u8);
            sink.extend_from_slice(pixel(i));
            i += run;
            continue;
        }
        // literal, stop in front of the next pair of equal pixels
        let literal_start = i;
        i += 1;
        while i < total && i - literal_start < MAX_PACKET {
            if i + 1 < total && pixel(i) == pixel(i + 1) {
                break;
            }
            i += 1;
        }
        sink.push((i - literal_start - 1) as u8);
        sink.extend_from_slice(&input[literal_start * pixel_width..i * pixel_width]);
    }
    Ok(sink.len() - start_len)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use nanorand::{Rng, WyRand};

    use crate::rle::interleaved::{decode, encode};

    fn round_trip(pixels: &[u8], width: usize) {
        let mut encoded = Vec::new();
        encode(pixels, width, &mut encoded).unwrap();

        let mut decoded = vec![0; pixels.len()];
        let consumed = decode(&encoded, &mut decoded, width).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn round_trip_one_to_four_channels() {
        let mut rng = WyRand::new_seed(0x28);

        for width in 1..=4 {
            let identical = vec![200_u8; 333 * width];
            let alternating: Vec<u8> = (0..257 * width)
                .map(|i| ((i / width) % 2) as u8 * 255)
                .collect();
            let mut random = vec![0_u8; 400 * width];
            rng.fill(&mut random);
            let mut mixed = random.clone();
            mixed[10 * width..150 * width].fill(17);

            for line in [identical, alternating, random, mixed] {
                round_trip(&line, width);
            }
        }
    }

    #[test]
    fn repeat_bit_is_set_for_runs() {
        let mut encoded = Vec::new();
        encode(&[1, 2, 3, 1, 2, 3, 1, 2, 3], 3, &mut encoded).unwrap();
        assert_eq!(encoded, [0x82, 1, 2, 3]);

        encoded.clear();
        encode(&[1, 2, 3], 1, &mut encoded).unwrap();
        assert_eq!(encoded, [0x02, 1, 2, 3]);
    }

    #[test]
    fn packets_may_span_rows() {
        // one packet of 4 pixels decoded into a 2x2 image
        let mut out = [0_u8; 8];
        decode(&[0x83, 9, 8], &mut out, 2).unwrap();
        assert_eq!(out, [9, 8, 9, 8, 9, 8, 9, 8]);
    }

    #[test]
    fn truncation_never_reads_past_end() {
        let mut line = vec![0_u8; 120 * 4];
        WyRand::new_seed(3).fill(&mut line);
        line[80..200].fill(0);

        let mut encoded = Vec::new();
        encode(&line, 4, &mut encoded).unwrap();

        let mut out = vec![0; line.len()];
        for cut in 0..encoded.len() {
            assert!(decode(&encoded[..cut], &mut out, 4).is_err(), "cut at {cut}");
        }
        assert!(decode(&encoded, &mut out, 4).is_ok());
    }
}
