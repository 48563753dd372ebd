/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
#![allow(unused_imports)]

use std::path::{Path, PathBuf};

use kino_core::pixel::PixelFormat;
use kino_image::Image;
use nanorand::{Rng, WyRand};
use serde::Deserialize;
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_128;

mod roundtrip;
mod truncated;

/// One row of a JSON case table
#[derive(Clone, Deserialize, Debug)]
pub struct TestEntry {
    pub name:      String,
    /// Extension of the file written, picks the codec
    pub extension: String,
    pub format:    PixelFormat,
    pub width:     usize,
    pub height:    usize,
    /// Codec settings used for writing and reading back
    pub options:   Option<Value>,
    /// Format the file is expected to decode to, the source format when absent
    pub stored:    Option<PixelFormat>,
    pub comment:   Option<String>
}

pub fn case_table(name: &str) -> Vec<TestEntry> {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(name);
    let json_file = std::fs::read(file).unwrap();

    serde_json::from_slice(&json_file).unwrap()
}

/// Directory for files written by a test, emptied first
pub fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A noisy image in `format`, seeded by the image size
///
/// Samples are drawn at 16 bits and converted, so every format gets
/// values it can represent, e.g unit range floats and clean 10 bit words.
pub fn sample_image(width: usize, height: usize, format: PixelFormat) -> Image {
    let mut rand = WyRand::new_seed((width * 31 + height) as u64);
    let samples = width * height * format.channels();

    let mut pixels = vec![0_u8; samples * 2];
    for chunk in pixels.chunks_exact_mut(2) {
        let value: u16 = rand.generate();
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
    let wide = PixelFormat::from_parts(format.channels(), kino_core::pixel::PixelType::U16)
        .unwrap_or(PixelFormat::RGBA_U16);

    Image::from_pixels(width, height, wide, pixels)
        .unwrap()
        .convert(format)
}

fn hash(contents: &[u8]) -> u128 {
    xxh3_128(contents)
}
