/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use kino_core::options::DecoderOptions;
use kino_image::{CodecRegistry, FrameSelector};

use crate::{case_table, hash, sample_image, scratch_path, TestEntry};

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_roundtrip() {
    let paths: Vec<TestEntry> = case_table("roundtrip.json");
    let dir = scratch_path("kino-tests-roundtrip");

    let mut error = false;
    let mut files = Vec::new();

    for path in &paths {
        let mut registry = CodecRegistry::default();
        if let Some(options) = &path.options {
            registry.set_options(&path.extension, options.clone()).unwrap();
        }
        let file_name = dir.join(format!("{}.{}", path.name, path.extension));
        let source = sample_image(path.width, path.height, path.format);

        registry.write(&file_name, &source).unwrap();

        let stored = path.stored.unwrap_or(path.format);
        let expected_hash = hash(source.convert(stored).pixels());

        let image = registry
            .read_image(&file_name, FrameSelector::First, DecoderOptions::default())
            .unwrap();
        let hash = hash(image.pixels());

        if hash != expected_hash || image.format() != stored || image.dimensions() != source.dimensions() {
            error = true;
            files.push(path.to_owned());
            // report error
            let err = format!(
                "Hash mismatch for file {:?}\nExpected {} but found {}\nDecoded as {:?} {:?}\nConfig:{:#?}",
                file_name,
                expected_hash,
                hash,
                image.format(),
                image.dimensions(),
                path
            );
            eprintln!("{}\n", err)
        }
    }
    let _ = std::fs::remove_dir_all(&dir);

    if error {
        panic!("Errors found during round trips\n {:#?}", files);
    }
}
