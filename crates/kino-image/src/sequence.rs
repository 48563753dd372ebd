/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Numbered file sequences
//!
//! A sequence is a set of files sharing a name except for a frame
//! number just before the extension, e.g `shot.0001.cin`,
//! `shot.0002.cin`. A sequence can also be named by its frame range,
//! `shot.1-100.cin`.
use std::path::{Path, PathBuf};

use kino_core::log::trace;

use crate::errors::ImageErrors;

/// The frames of a numbered file sequence and how their names are built
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct FileSequence {
    directory: PathBuf,
    prefix:    String,
    suffix:    String,
    /// Zero padded width of the frame number, 0 when not padded
    padding:   usize,
    /// Sorted frame numbers
    frames:    Vec<i64>
}

/// Split a file name into the part before the frame number, the
/// frame number or range, and the part after it
pub(crate) fn split_name(name: &str) -> Option<(&str, &str, &str)> {
    let stem_end = name.rfind('.').unwrap_or(name.len());
    let bytes = name.as_bytes();

    let digits = |mut start: usize| {
        while start > 0 && bytes[start - 1].is_ascii_digit() {
            start -= 1;
        }
        start
    };
    let mut start = digits(stem_end);
    if start == stem_end {
        return None;
    }
    // `first-last`
    if start > 1 && bytes[start - 1] == b'-' && bytes[start - 2].is_ascii_digit() {
        start = digits(start - 1);
    }
    Some((&name[..start], &name[start..stem_end], &name[stem_end..]))
}

/// Width of a zero padded frame number, 0 when not padded
pub(crate) fn padding_of(digits: &str) -> usize {
    if digits.len() > 1 && digits.starts_with('0') {
        digits.len()
    } else {
        0
    }
}

impl FileSequence {
    pub fn new(
        directory: impl Into<PathBuf>, prefix: &str, suffix: &str, padding: usize,
        mut frames: Vec<i64>
    ) -> FileSequence {
        frames.sort_unstable();
        frames.dedup();

        FileSequence {
            directory: directory.into(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            padding,
            frames
        }
    }

    /// Read the frames named by `path` alone, without looking at the disk
    ///
    /// A range name gives every frame of the range, a numbered name
    /// gives its own frame. Returns `None` when the name carries no number.
    pub fn from_pattern(path: &Path) -> Option<FileSequence> {
        let name = path.file_name()?.to_str()?;
        let (prefix, number, suffix) = split_name(name)?;
        let directory = path.parent().unwrap_or(Path::new(""));

        let (padding, frames) = match number.split_once('-') {
            Some((first, last)) => {
                let start = first.parse::<i64>().ok()?;
                let end = last.parse::<i64>().ok()?;
                (padding_of(first), (start.min(end)..=start.max(end)).collect())
            }
            None => (padding_of(number), vec![number.parse::<i64>().ok()?])
        };
        Some(FileSequence::new(directory, prefix, suffix, padding, frames))
    }

    /// Work out the sequence `path` belongs to
    ///
    /// A range name lists its frames directly. A numbered file name is
    /// completed with every sibling in its directory sharing the name
    /// and padding. Returns `None` when the name carries no number.
    pub fn from_path(path: &Path) -> Result<Option<FileSequence>, ImageErrors> {
        let Some(mut sequence) = FileSequence::from_pattern(path) else {
            return Ok(None);
        };
        let is_range = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(split_name)
            .is_some_and(|(_, number, _)| number.contains('-'));
        if is_range {
            return Ok(Some(sequence));
        }
        let listing = if sequence.directory.as_os_str().is_empty() {
            std::fs::read_dir(".")
        } else {
            std::fs::read_dir(&sequence.directory)
        };
        // a missing directory leaves a sequence of one frame
        if let Ok(entries) = listing {
            for entry in entries {
                let entry = entry?;
                let sibling = entry.file_name();
                let Some((prefix, digits, suffix)) = sibling.to_str().and_then(split_name) else {
                    continue;
                };
                if prefix == sequence.prefix
                    && suffix == sequence.suffix
                    && padding_of(digits) == sequence.padding
                {
                    if let Ok(number) = digits.parse::<i64>() {
                        sequence.frames.push(number);
                    }
                }
            }
        }
        sequence.frames.sort_unstable();
        sequence.frames.dedup();

        trace!("{} resolves to {} frames", path.display(), sequence.len());
        Ok(Some(sequence))
    }

    pub fn frames(&self) -> &[i64] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub const fn padding(&self) -> usize {
        self.padding
    }

    /// Path of the file holding `frame`
    pub fn file_name(&self, frame: i64) -> PathBuf {
        let name = format!(
            "{}{:0width$}{}",
            self.prefix,
            frame,
            self.suffix,
            width = self.padding
        );
        self.directory.join(name)
    }

    /// Path of the first frame's file
    pub fn first_file(&self) -> Option<PathBuf> {
        self.frames.first().map(|&frame| self.file_name(frame))
    }

    /// Path naming the whole sequence, `name.first-last.ext`
    pub fn range_name(&self) -> PathBuf {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return self.directory.join(format!("{}{}", self.prefix, self.suffix));
        };
        let name = format!(
            "{}{:0width$}-{:0width$}{}",
            self.prefix,
            first,
            last,
            self.suffix,
            width = self.padding
        );
        self.directory.join(name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::sequence::{padding_of, split_name, FileSequence};

    #[test]
    fn names_split_around_the_number() {
        assert_eq!(split_name("shot.0012.cin"), Some(("shot.", "0012", ".cin")));
        assert_eq!(split_name("shot.1-100.cin"), Some(("shot.", "1-100", ".cin")));
        assert_eq!(split_name("take-12.tga"), Some(("take-", "12", ".tga")));
        assert_eq!(split_name("plate.sgi"), None);
        assert_eq!(split_name("frame7"), Some(("frame", "7", "")));

        assert_eq!(padding_of("0012"), 4);
        assert_eq!(padding_of("12"), 0);
        assert_eq!(padding_of("0"), 0);
    }

    #[test]
    fn ranges_list_their_frames() {
        let path = Path::new("/no/such/dir/shot.0001-0003.cin");
        let sequence = FileSequence::from_path(path).unwrap().unwrap();

        assert_eq!(sequence.frames(), &[1, 2, 3]);
        assert_eq!(sequence.padding(), 4);
        assert_eq!(sequence.file_name(2), PathBuf::from("/no/such/dir/shot.0002.cin"));
        assert_eq!(sequence.range_name(), PathBuf::from("/no/such/dir/shot.0001-0003.cin"));
    }

    #[test]
    fn siblings_join_the_sequence() {
        let dir = std::env::temp_dir().join("kino-sequence-siblings");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["a.008.tga", "a.009.tga", "a.010.tga", "a.10.tga", "b.009.tga"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        let sequence = FileSequence::from_path(&dir.join("a.009.tga")).unwrap().unwrap();
        assert_eq!(sequence.frames(), &[8, 9, 10]);
        assert_eq!(sequence.first_file(), Some(dir.join("a.008.tga")));

        assert_eq!(FileSequence::from_path(&dir.join("plain.tga")).unwrap(), None);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
