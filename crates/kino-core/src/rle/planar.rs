/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Planar run length codec
//!
//! Works on a single channel of a single scanline. Control items are one
//! sample wide (one or two bytes), so two byte streams store the control
//! as a word in the stream's byte order.
//!
//! | control          | meaning                                     |
//! |------------------|---------------------------------------------|
//! | bit 7 clear      | repeat the next sample `control & 0x7f` times |
//! | bit 7 set        | copy the next `control & 0x7f` samples        |
use alloc::vec::Vec;

use crate::bytestream::ByteEndian;
use crate::rle::{take, RleError};

/// Longest packet a control item can describe
const MAX_PACKET: usize = 0x7f;
/// Shortest run the encoder emits as a repeat packet
const MIN_RUN: usize = 3;

#[inline]
fn read_control(bytes: &[u8], endian: ByteEndian) -> u16 {
    match bytes {
        [byte] => u16::from(*byte),
        [a, b] => match endian {
            ByteEndian::BE => u16::from_be_bytes([*a, *b]),
            ByteEndian::LE => u16::from_le_bytes([*a, *b])
        },
        _ => 0
    }
}

fn push_control(sink: &mut Vec<u8>, value: u16, sample_width: usize, endian: ByteEndian) {
    if sample_width == 1 {
        sink.push(value as u8);
    } else {
        let bytes = match endian {
            ByteEndian::BE => value.to_be_bytes(),
            ByteEndian::LE => value.to_le_bytes()
        };
        sink.extend_from_slice(&bytes);
    }
}

fn push_sample(sink: &mut Vec<u8>, sample: &[u8], swap: bool) {
    if swap {
        sink.extend(sample.iter().rev());
    } else {
        sink.extend_from_slice(sample);
    }
}

/// Decode one planar run length encoded channel of a scanline
///
/// `output` is filled completely with native endian samples, its length
/// decides how many samples are read. Samples are `sample_width` bytes,
/// either one or two, stored in `endian` order in the stream.
///
/// # Returns
/// - `Ok(usize)`: Number of bytes of `input` consumed
/// - `Err`: The stream is truncated or a packet does not fit the output
pub fn decode(
    input: &[u8], output: &mut [u8], sample_width: usize, endian: ByteEndian
) -> Result<usize, RleError> {
    if !matches!(sample_width, 1 | 2) {
        return Err(RleError::UnsupportedWidth(sample_width));
    }
    if output.len() % sample_width != 0 {
        return Err(RleError::BadLength(output.len(), sample_width));
    }
    let swap = sample_width > 1 && endian.needs_swap();
    let total = output.len() / sample_width;

    let mut position = 0;
    let mut written = 0;

    while written < total {
        let control = read_control(take(input, position, sample_width)?, endian);
        position += sample_width;

        let count = usize::from(control & 0x7f);
        let repeat = control & 0x80 == 0;

        if count > total - written {
            return Err(RleError::Overrun(count, total - written));
        }
        let out_start = written * sample_width;
        let out_end = out_start + count * sample_width;

        if repeat {
            let sample = take(input, position, sample_width)?;
            let mut native = [0_u8; 2];
            native[..sample_width].copy_from_slice(sample);
            if swap {
                native.swap(0, 1);
            }
            for out in output[out_start..out_end].chunks_exact_mut(sample_width) {
                out.copy_from_slice(&native[..sample_width]);
            }
            position += sample_width;
        } else {
            let literal = take(input, position, count * sample_width)?;
            let out = &mut output[out_start..out_end];
            out.copy_from_slice(literal);
            if swap {
                crate::bytestream::swap_samples(out, sample_width);
            }
            position += count * sample_width;
        }
        written += count;
    }
    Ok(position)
}

/// Encode one channel of a scanline, appending the packets to `sink`
///
/// `input` holds native endian samples of `sample_width` bytes, they are
/// written in `endian` order. Runs of three or more equal samples become
/// repeat packets, everything else is gathered into literal packets of
/// at most 127 samples. A zero control item terminates the stream.
///
/// # Returns
/// Number of bytes appended to `sink`
pub fn encode(
    input: &[u8], sample_width: usize, endian: ByteEndian, sink: &mut Vec<u8>
) -> Result<usize, RleError> {
    if !matches!(sample_width, 1 | 2) {
        return Err(RleError::UnsupportedWidth(sample_width));
    }
    if input.len() % sample_width != 0 {
        return Err(RleError::BadLength(input.len(), sample_width));
    }
    let swap = sample_width > 1 && endian.needs_swap();
    let start_len = sink.len();
    let total = input.len() / sample_width;
    let sample = |i: usize| &input[i * sample_width..(i + 1) * sample_width];

    let run_length = |i: usize| {
        let mut run = 1;
        while i + run < total && run < MAX_PACKET && sample(i + run) == sample(i) {
            run += 1;
        }
        run
    };

    let mut i = 0;
    while i < total {
        let run = run_length(i);

        if run >= MIN_RUN {
            push_control(sink, run as u16, sample_width, endian);
            push_sample(sink, sample(i), swap);
            i += run;
            continue;
        }
        let literal_start = i;

        while i < total && i - literal_start < MAX_PACKET {
            if i != literal_start && run_length(i) >= MIN_RUN {
                break;
            }
            i += 1;
        }
        push_control(
            sink,
            ((i - literal_start) as u16) | 0x80,
            sample_width,
            endian
        );
        for j in literal_start..i {
            push_sample(sink, sample(j), swap);
        }
    }
    push_control(sink, 0, sample_width, endian);

    Ok(sink.len() - start_len)
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use nanorand::{Rng, WyRand};

    use crate::bytestream::ByteEndian;
    use crate::rle::planar::{decode, encode};

    fn round_trip(samples: &[u8], width: usize, endian: ByteEndian) {
        let mut encoded = Vec::new();
        encode(samples, width, endian, &mut encoded).unwrap();

        let mut decoded = vec![0; samples.len()];
        let consumed = decode(&encoded, &mut decoded, width, endian).unwrap();
        assert_eq!(decoded, samples);
        // trailing end marker is never read
        assert_eq!(consumed + width, encoded.len());
    }

    fn scanlines(width: usize) -> Vec<Vec<u8>> {
        let mut rng = WyRand::new_seed(474);

        let identical = vec![7_u8; 300 * width];
        let alternating = (0..301 * width)
            .map(|i| if (i / width) % 2 == 0 { 0xAB } else { 0x01 })
            .collect();
        let mut random = vec![0_u8; 517 * width];
        rng.fill(&mut random);
        // random with short runs mixed in
        let runs = (0..400 * width)
            .map(|i| ((i / width) / (1 + (i / width) % 5)) as u8)
            .collect();
        vec![identical, alternating, random, runs, vec![], vec![9; width]]
    }

    #[test]
    fn round_trip_all_widths_and_orders() {
        for width in [1, 2] {
            for endian in [ByteEndian::BE, ByteEndian::LE] {
                for line in scanlines(width) {
                    round_trip(&line, width, endian);
                }
            }
        }
    }

    #[test]
    fn repeat_and_literal_polarity() {
        // repeat 3x 0x1234 then a literal of two samples, big endian words
        let stream = [0x00, 0x03, 0x12, 0x34, 0x00, 0x82, 0x00, 0x01, 0x00, 0x02];
        let mut out = vec![0_u8; 10];
        let consumed = decode(&stream, &mut out, 2, ByteEndian::BE).unwrap();
        assert_eq!(consumed, stream.len());

        let values: Vec<u16> = out
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(values, [0x1234, 0x1234, 0x1234, 1, 2]);
    }

    #[test]
    fn identical_line_uses_repeat_packets() {
        let mut encoded = Vec::new();
        encode(&[5; 127], 1, ByteEndian::BE, &mut encoded).unwrap();
        assert_eq!(encoded, [127, 5, 0]);
    }

    #[test]
    fn truncation_never_reads_past_end() {
        for width in [1, 2] {
            let mut line = vec![0_u8; 200 * width];
            WyRand::new_seed(1).fill(&mut line);
            line[40..80].fill(3);

            let mut encoded = Vec::new();
            encode(&line, width, ByteEndian::BE, &mut encoded).unwrap();
            let needed = encoded.len() - width;

            let mut out = vec![0; line.len()];
            for cut in 0..needed {
                assert!(
                    decode(&encoded[..cut], &mut out, width, ByteEndian::BE).is_err(),
                    "cut at {cut}"
                );
            }
            assert!(decode(&encoded[..needed], &mut out, width, ByteEndian::BE).is_ok());
        }
    }

    #[test]
    fn oversized_packet_is_rejected() {
        let mut out = [0_u8; 4];
        assert!(decode(&[10, 1], &mut out, 1, ByteEndian::BE).is_err());
        assert!(decode(&[1, 1], &mut out, 3, ByteEndian::BE).is_err());
    }
}
