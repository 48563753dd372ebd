/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point for all supported codecs the library understands
//!
//! Codecs are picked by file extension from a [`CodecRegistry`].
//!
//! # Note on compatibility with images
//!
//! - Writing converts the image into the closest format the codec can
//!   store, e.g a `F32` image written to Targa is stored as 8 bit, and
//!   an RGB image written to Cineon becomes 10 bit. The image passed in
//!   is left as is, the conversion happens on a copy.
//!
//! - Reading normalizes pixels into canonical layout (native endian,
//!   interleaved, RGB order, bottom row first) unless the decoder
//!   options turn normalization off.
use std::path::{Path, PathBuf};

use kino_core::info::ImageInfo;
use kino_core::log::trace;
use kino_core::options::{DecoderOptions, EncoderOptions};
use kino_core::pixel::PixelFormat;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ImageErrors;
use crate::image::Image;
use crate::sequence::FileSequence;

pub mod cineon;
pub mod lut;
pub mod pic;
pub mod sgi;
pub mod targa;

/// A format the library reads and writes
///
/// Implementations hold their own user settings, exposed as JSON
/// through [`options`](Codec::options) and [`set_options`](Codec::set_options).
pub trait Codec: Send + Sync {
    /// Human readable name of the format
    fn name(&self) -> &'static str;

    /// File extensions, lower case and without the dot
    fn extensions(&self) -> &'static [&'static str];

    /// Decode only the headers of `data`
    fn read_info(&self, data: &[u8], options: DecoderOptions) -> Result<ImageInfo, ImageErrors>;

    /// Decode `data`, pixels are laid out as the returned information says
    fn read(&self, data: &[u8], options: DecoderOptions) -> Result<Image, ImageErrors>;

    /// Whether pixels in `format` can be written as they are
    fn supports(&self, format: PixelFormat) -> bool;

    /// The format an image in `format` is converted to before writing
    ///
    /// Returns `format` itself when it is supported.
    fn preferred_format(&self, format: PixelFormat) -> PixelFormat;

    /// Encode a canonical image in a supported format
    ///
    /// `file_name` is the name of the file being written, for formats
    /// recording it in their header.
    fn write(&self, image: &Image, file_name: &str) -> Result<Vec<u8>, ImageErrors>;

    /// The current settings
    fn options(&self) -> Value;

    /// Replace the settings, missing keys take their default value
    ///
    /// # Errors
    /// [`ImageErrors::OptionError`] on unknown keys or invalid values,
    /// the previous settings are kept.
    fn set_options(&mut self, options: Value) -> Result<(), ImageErrors>;
}

/// Create encoder options describing `image`
pub(crate) fn create_options_for_encoder(image: &Image) -> EncoderOptions {
    let (width, height) = image.dimensions();
    EncoderOptions::new(width, height, image.format())
}

pub(crate) fn options_to_json<T: Serialize>(options: &T) -> Value {
    serde_json::to_value(options).unwrap_or_default()
}

pub(crate) fn options_from_json<T: DeserializeOwned>(options: Value) -> Result<T, ImageErrors> {
    Ok(serde_json::from_value(options)?)
}

/// Which frame of a file or sequence to read
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FrameSelector {
    /// The file itself, or the first frame of a sequence
    #[default]
    First,
    /// A frame number of a sequence
    Frame(i64)
}

/// Codecs known to the library, looked up by file extension
pub struct CodecRegistry {
    codecs: Vec<Box<dyn Codec>>
}

impl Default for CodecRegistry {
    /// A registry holding every codec of the library
    fn default() -> Self {
        let mut registry = CodecRegistry::new();
        registry.register(Box::new(cineon::CineonCodec::default()));
        registry.register(Box::new(sgi::SgiCodec::default()));
        registry.register(Box::new(targa::TargaCodec::default()));
        registry.register(Box::new(lut::LutCodec::inferno()));
        registry.register(Box::new(lut::LutCodec::kodak()));
        registry.register(Box::new(pic::PicCodec::default()));
        registry
    }
}

impl CodecRegistry {
    /// A registry without codecs
    pub fn new() -> CodecRegistry {
        CodecRegistry { codecs: Vec::new() }
    }

    /// Add a codec, it takes over extensions already registered
    pub fn register(&mut self, codec: Box<dyn Codec>) {
        trace!("Registering codec {}", codec.name());
        self.codecs.push(codec);
    }

    pub fn codecs(&self) -> impl Iterator<Item = &dyn Codec> {
        self.codecs.iter().map(|codec| &**codec)
    }

    /// Every registered extension
    pub fn extensions(&self) -> Vec<&'static str> {
        self.codecs().flat_map(|codec| codec.extensions().iter().copied()).collect()
    }

    fn position(&self, extension: &str) -> Option<usize> {
        self.codecs.iter().rposition(|codec| {
            codec
                .extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
    }

    /// The codec handling `extension`, ignoring case
    pub fn for_extension(&self, extension: &str) -> Option<&dyn Codec> {
        self.position(extension).map(|i| &*self.codecs[i])
    }

    /// The codec handling the extension of `path`
    pub fn for_path(&self, path: &Path) -> Result<&dyn Codec, ImageErrors> {
        let extension = extension_of(path);
        self.for_extension(&extension)
            .ok_or(ImageErrors::NoCodecForExtension(extension))
    }

    /// Whether a codec handles the extension of `path`
    pub fn is_supported(&self, path: &Path) -> bool {
        self.position(&extension_of(path)).is_some()
    }

    /// Settings of the codec handling `extension`
    pub fn get_options(&self, extension: &str) -> Result<Value, ImageErrors> {
        self.for_extension(extension)
            .map(|codec| codec.options())
            .ok_or_else(|| ImageErrors::NoCodecForExtension(extension.to_string()))
    }

    /// Change the settings of the codec handling `extension`
    pub fn set_options(&mut self, extension: &str, options: Value) -> Result<(), ImageErrors> {
        let index = self
            .position(extension)
            .ok_or_else(|| ImageErrors::NoCodecForExtension(extension.to_string()))?;
        self.codecs[index].set_options(options)
    }

    /// Decode the headers of a single file
    pub fn read_info(&self, path: &Path, options: DecoderOptions) -> Result<ImageInfo, ImageErrors> {
        let codec = self.for_path(path)?;
        let data = std::fs::read(path)?;
        codec.read_info(&data, options)
    }

    /// Decode a single file, normalizing it when the options ask to
    pub fn read_file(&self, path: &Path, options: DecoderOptions) -> Result<Image, ImageErrors> {
        let codec = self.for_path(path)?;
        let data = std::fs::read(path)?;
        let image = codec.read(&data, options)?;

        if options.get_normalize() {
            Ok(image.normalize(options.get_proxy()))
        } else {
            Ok(image)
        }
    }

    /// Describe a file or sequence
    ///
    /// For a numbered file name, or a `name.1-100.ext` range, the
    /// information comes from the first frame and lists every frame
    /// of the sequence.
    pub fn open(&self, path: &Path) -> Result<ImageInfo, ImageErrors> {
        match FileSequence::from_path(path)? {
            Some(sequence) if sequence.len() > 1 || !path.exists() => {
                let first = sequence.first_file().unwrap_or_else(|| path.to_path_buf());
                let mut info = self.read_info(&first, DecoderOptions::default())?;
                info.sequence.frames = sequence.frames().to_vec();
                Ok(info)
            }
            _ => self.read_info(path, DecoderOptions::default())
        }
    }

    /// Decode one frame of a file or sequence
    pub fn read_image(
        &self, path: &Path, frame: FrameSelector, options: DecoderOptions
    ) -> Result<Image, ImageErrors> {
        let file = self.frame_file(path, frame)?;
        self.read_file(&file, options)
    }

    fn frame_file(&self, path: &Path, frame: FrameSelector) -> Result<PathBuf, ImageErrors> {
        let sequence = FileSequence::from_path(path)?;

        match (frame, sequence) {
            (FrameSelector::First, Some(sequence)) if !path.exists() => {
                Ok(sequence.first_file().unwrap_or_else(|| path.to_path_buf()))
            }
            (FrameSelector::First, _) => Ok(path.to_path_buf()),
            (FrameSelector::Frame(number), Some(sequence)) => Ok(sequence.file_name(number)),
            (FrameSelector::Frame(number), None) => Err(ImageErrors::ReadError(format!(
                "{} has no frame numbers, cannot read frame {number}",
                path.display()
            )))
        }
    }

    /// Encode `image` for the codec handling `extension`
    ///
    /// The image is converted first if the codec cannot store its format.
    pub fn encode(
        &self, extension: &str, image: &Image, file_name: &str
    ) -> Result<Vec<u8>, ImageErrors> {
        let codec = self
            .for_extension(extension)
            .ok_or_else(|| ImageErrors::NoCodecForExtension(extension.to_string()))?;
        let format = codec.preferred_format(image.format());

        if format != image.format() {
            trace!("Converting {} to {} for {}", image.format(), format, codec.name());
        }
        codec.write(&image.convert(format), file_name)
    }

    /// Write `image` to `path`, the extension picks the codec
    pub fn write(&self, path: &Path, image: &Image) -> Result<(), ImageErrors> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let data = self.encode(&extension_of(path), image, &file_name)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use kino_core::pixel::PixelFormat;
    use serde_json::json;

    use crate::codecs::CodecRegistry;
    use crate::errors::ImageErrors;
    use crate::image::Image;

    #[test]
    fn extensions_ignore_case() {
        let registry = CodecRegistry::default();

        for (path, name) in [
            ("a.CIN", "Cineon"),
            ("a.rgba", "SGI"),
            ("a.Tga", "Targa"),
            ("a.lut", "Inferno LUT"),
            ("a.1DL", "Kodak LUT"),
            ("a.pic", "Softimage PIC")
        ] {
            assert_eq!(registry.for_path(Path::new(path)).unwrap().name(), name);
        }
        assert!(matches!(
            registry.for_path(Path::new("a.png")),
            Err(ImageErrors::NoCodecForExtension(ext)) if ext == "png"
        ));
        assert!(!registry.is_supported(Path::new("no_extension")));
    }

    #[test]
    fn options_round_trip_as_json() {
        let mut registry = CodecRegistry::default();

        assert_eq!(registry.get_options("sgi").unwrap(), json!({"compression": "None"}));
        registry.set_options("SGI", json!({"compression": "Rle"})).unwrap();
        assert_eq!(registry.get_options("rgb").unwrap(), json!({"compression": "Rle"}));

        let err = registry.set_options("sgi", json!({"compression": "Zip"}));
        assert!(matches!(err, Err(ImageErrors::OptionError(_))));
        let err = registry.set_options("cin", json!({"gamma": 1.7}));
        assert!(matches!(err, Err(ImageErrors::OptionError(_))));
        // rejected values leave the settings alone
        assert_eq!(registry.get_options("sgi").unwrap(), json!({"compression": "Rle"}));
    }

    #[test]
    fn encode_converts_to_a_stored_format() {
        let registry = CodecRegistry::default();
        let image = Image::from_pixels(2, 1, PixelFormat::L_F32, vec![0; 8]).unwrap();

        let data = registry.encode("tga", &image, "grey.tga").unwrap();
        // 18 byte header, two 8 bit samples
        assert_eq!(data.len(), 20);
        assert_eq!(data[2], 3);
    }
}
