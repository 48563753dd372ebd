/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Listing the images of a directory
//!
//! Numbered files sharing a name collapse into one entry named by
//! their frame range.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kino_core::info::ImageInfo;
use kino_core::log::{trace, warn};

use crate::codecs::CodecRegistry;
use crate::errors::ImageErrors;
use crate::sequence::{padding_of, split_name, FileSequence};

/// A single image or a sequence found in a directory
#[derive(Clone, Debug)]
pub struct DirectoryEntry {
    /// The file, or `name.first-last.ext` for a sequence
    pub path:     PathBuf,
    pub sequence: Option<FileSequence>,
    /// Information of the file, or of the first frame of a sequence
    pub info:     ImageInfo
}

impl CodecRegistry {
    /// List every file of `dir` a registered codec handles
    ///
    /// Entries that fail to open are logged and skipped. Entries are
    /// sorted by path.
    pub fn scan_directory(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, ImageErrors> {
        let mut singles = Vec::new();
        let mut groups: BTreeMap<(String, String, usize), Vec<i64>> = BTreeMap::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type()?.is_file() || !self.is_supported(&path) {
                continue;
            }
            let name = entry.file_name();
            let numbered = name.to_str().and_then(split_name).and_then(|(prefix, digits, suffix)| {
                let number = digits.parse::<i64>().ok()?;
                Some(((prefix.to_string(), suffix.to_string(), padding_of(digits)), number))
            });
            match numbered {
                Some((key, number)) => groups.entry(key).or_default().push(number),
                None => singles.push(path)
            }
        }

        let mut entries = Vec::new();

        for path in singles {
            self.push_entry(&mut entries, path, None);
        }
        for ((prefix, suffix, padding), frames) in groups {
            let sequence = FileSequence::new(dir, &prefix, &suffix, padding, frames);

            if sequence.len() > 1 {
                self.push_entry(&mut entries, sequence.range_name(), Some(sequence));
            } else if let Some(file) = sequence.first_file() {
                self.push_entry(&mut entries, file, None);
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        trace!("{} holds {} entries", dir.display(), entries.len());
        Ok(entries)
    }

    fn push_entry(
        &self, entries: &mut Vec<DirectoryEntry>, path: PathBuf, sequence: Option<FileSequence>
    ) {
        let result = match &sequence {
            Some(sequence) => sequence
                .first_file()
                .ok_or_else(|| ImageErrors::ReadError("empty sequence".to_string()))
                .and_then(|first| self.read_info(&first, Default::default()))
                .map(|mut info| {
                    info.sequence.frames = sequence.frames().to_vec();
                    info
                }),
            None => self.read_info(&path, Default::default())
        };
        match result {
            Ok(info) => entries.push(DirectoryEntry {
                path,
                sequence,
                info
            }),
            Err(err) => warn!("Skipping {}: {:?}", path.display(), err)
        }
    }
}

#[cfg(test)]
mod tests {
    use kino_core::pixel::PixelFormat;

    use crate::codecs::CodecRegistry;
    use crate::image::Image;

    #[test]
    fn numbered_files_collapse_into_sequences() {
        let dir = std::env::temp_dir().join("kino-directory-scan");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let registry = CodecRegistry::default();
        let image = Image::from_pixels(3, 2, PixelFormat::RGB_U8, vec![7; 18]).unwrap();

        for name in ["walk.001.tga", "walk.002.tga", "walk.003.tga", "still.tga", "lone.5.tga"] {
            registry.write(&dir.join(name), &image).unwrap();
        }
        std::fs::write(dir.join("broken.tga"), b"not a targa").unwrap();
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let entries = registry.scan_directory(&dir).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|entry| entry.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["lone.5.tga", "still.tga", "walk.001-003.tga"]);

        let walk = &entries[2];
        assert_eq!(walk.info.sequence.frames, [1, 2, 3]);
        assert_eq!(walk.info.dimensions(), (3, 2));
        assert_eq!(walk.sequence.as_ref().map(|s| s.len()), Some(3));
        assert!(entries[1].sequence.is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
