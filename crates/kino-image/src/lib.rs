/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Reading and writing images of film and visual effects formats
//!
//! This crate ties the codec crates together behind a registry keyed by
//! file extension, and adds file sequences and background sequence
//! reading and writing on top.
//!
//! | Format        | Extensions              | Pixel formats                  |
//! |---------------|-------------------------|--------------------------------|
//! | Cineon        | `cin`                   | `RGB_U10`                      |
//! | SGI           | `sgi`, `rgb`, `rgba`, `bw` | L, LA, RGB, RGBA at 8/16 bit |
//! | Targa         | `tga`                   | L, LA, RGB, RGBA at 8 bit      |
//! | LUT           | `lut`, `1dl`            | L, RGB at 8/10/16 bit          |
//! | Softimage PIC | `pic`                   | RGB, RGBA at 8 bit             |
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//! use kino_image::{read_image, write, FrameSelector};
//!
//! let image = read_image(Path::new("plate.0001.cin"), FrameSelector::First).unwrap();
//! write(Path::new("plate.0001.tga"), &image, None).unwrap();
//! ```
use std::path::Path;

pub use kino_core;
pub use kino_core::info::ImageInfo;
pub use kino_core::options::DecoderOptions;
pub use kino_core::pixel::PixelFormat;
use serde_json::Value;

pub use crate::codecs::{Codec, CodecRegistry, FrameSelector};
pub use crate::directory::DirectoryEntry;
pub use crate::errors::ImageErrors;
pub use crate::image::Image;
pub use crate::sequence::FileSequence;
pub use crate::stream::{SequenceFrame, SequenceOptions, SequenceReader, SequenceWriter};

pub mod codecs;
pub mod directory;
pub mod errors;
pub mod image;
pub mod sequence;
pub mod stream;

/// Describe the file or sequence at `path` without decoding pixels
pub fn open(path: &Path) -> Result<ImageInfo, ImageErrors> {
    CodecRegistry::default().open(path)
}

/// Decode a frame of the file or sequence at `path` into canonical layout
pub fn read_image(path: &Path, frame: FrameSelector) -> Result<Image, ImageErrors> {
    CodecRegistry::default().read_image(path, frame, DecoderOptions::default())
}

/// Write `image` to `path`, the extension picks the codec
///
/// `options` are codec settings as JSON, e.g `{"compression": "Rle"}`,
/// `None` uses the codec defaults.
pub fn write(path: &Path, image: &Image, options: Option<Value>) -> Result<(), ImageErrors> {
    let mut registry = CodecRegistry::default();

    if let Some(options) = options {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        registry.set_options(&extension, options)?;
    }
    registry.write(path, image)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use crate::{open, read_image, write, FrameSelector, Image, ImageErrors, PixelFormat};

    #[test]
    fn write_and_read_back_with_options() {
        let dir = std::env::temp_dir().join("kino-image-free-functions");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("plate.sgi");

        let pixels: Vec<u8> = (0..24).collect();
        let image = Image::from_pixels(4, 2, PixelFormat::RGB_U8, pixels).unwrap();
        write(&path, &image, Some(json!({"compression": "Rle"}))).unwrap();

        let info = open(&path).unwrap();
        assert_eq!(info.dimensions(), (4, 2));
        assert!(info.compression.is_compressed());

        let back = read_image(&path, FrameSelector::First).unwrap();
        assert_eq!(back.pixels(), image.pixels());

        let err = write(&path, &image, Some(json!({"level": 9})));
        assert!(matches!(err, Err(ImageErrors::OptionError(_))));
        assert!(matches!(
            read_image(Path::new("plate.exr"), FrameSelector::First),
            Err(ImageErrors::NoCodecForExtension(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
