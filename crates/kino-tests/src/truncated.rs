/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use kino_core::options::DecoderOptions;
use kino_image::{CodecRegistry, ImageErrors};

use crate::{case_table, sample_image, TestEntry};

/// Cutting a valid file anywhere must never panic
#[test]
fn test_truncated_files() {
    let paths: Vec<TestEntry> = case_table("roundtrip.json");

    for path in &paths {
        let mut registry = CodecRegistry::default();
        if let Some(options) = &path.options {
            registry.set_options(&path.extension, options.clone()).unwrap();
        }
        let source = sample_image(path.width, path.height, path.format);
        let file_name = format!("{}.{}", path.name, path.extension);
        let data = registry.encode(&path.extension, &source, &file_name).unwrap();
        let codec = registry.for_extension(&path.extension).unwrap();

        // header fields, then every few bytes of payload
        let step = (data.len() / 64).max(1);
        for end in (0..data.len().min(64)).chain((64..data.len()).step_by(step)) {
            match codec.read(&data[..end], DecoderOptions::default()) {
                Err(
                    ImageErrors::ReadError(_)
                    | ImageErrors::UnrecognizedFormat(_)
                    | ImageErrors::UnsupportedFormat(_)
                ) => {}
                // trailing end markers and text table entries may be cut
                // without losing pixels, the buffer still has to be whole
                Ok(image) => assert_eq!(
                    image.pixels().len(),
                    image.info().data_byte_count(),
                    "{} cut at {}",
                    path.name,
                    end
                ),
                Err(err) => panic!("{} cut at {}: {:?}", path.name, end, err)
            }
        }
    }
}
