/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Image information shared by every decoder
//!
//! An [`ImageInfo`] is what `open` hands back: one or more layers,
//! string tags read from the header and the timing of the sequence
//! the image belongs to.
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::pixel::{PixelFormat, PixelLayout};

/// Ordered string key value metadata
pub type Tags = BTreeMap<String, String>;

/// Well known tag names
pub mod tag_names {
    pub const DESCRIPTION: &str = "Description";
    pub const TIME: &str = "Time";
    pub const SOURCE_OFFSET: &str = "Source Offset";
    pub const SOURCE_FILE: &str = "Source File";
    pub const SOURCE_TIME: &str = "Source Time";
    pub const SOURCE_INPUT_DEVICE: &str = "Source Input Device";
    pub const SOURCE_INPUT_MODEL: &str = "Source Input Model";
    pub const SOURCE_INPUT_SERIAL: &str = "Source Input Serial";
    pub const SOURCE_INPUT_PITCH: &str = "Source Input Pitch";
    pub const SOURCE_GAMMA: &str = "Source Gamma";
    pub const KEYCODE: &str = "Keycode";
    pub const FILM_FORMAT: &str = "Film Format";
    pub const FILM_FRAME: &str = "Film Frame";
    pub const FILM_FRAME_RATE: &str = "Film Frame Rate";
    pub const FILM_FRAME_ID: &str = "Film Frame ID";
    pub const FILM_SLATE: &str = "Film Slate";
}

/// Whether pixel data is stored raw or run length encoded
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compression {
    #[default]
    None,
    Rle
}

impl Compression {
    pub const fn is_compressed(self) -> bool {
        matches!(self, Compression::Rle)
    }
}

/// Playback speed as a rational, `scale / duration` frames per second
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speed {
    pub scale:    u32,
    pub duration: u32
}

impl Default for Speed {
    fn default() -> Self {
        Speed {
            scale:    24,
            duration: 1
        }
    }
}

/// How far `fps * 1.001` may be from a whole rate to count as NTSC,
/// covers rates stored with three decimals or as `f32`
const NTSC_TOLERANCE: f64 = 0.005;

impl Speed {
    pub const fn new(scale: u32, duration: u32) -> Speed {
        Speed { scale, duration }
    }
    /// Build a speed from a frame rate
    ///
    /// Integer rates map to `rate / 1`. NTSC rates such as 23.976,
    /// 29.97 and 59.94 map to `rate * 1000 / 1001`, other fractional
    /// rates are kept to a thousandth.
    pub fn from_fps(fps: f64) -> Speed {
        if fps <= 0.0 || !fps.is_finite() {
            return Speed::default();
        }
        let rounded = (fps + 0.5) as u32;
        if ((rounded as f64) - fps).abs() < 1e-6 {
            return Speed::new(rounded.max(1), 1);
        }
        let ntsc = fps * 1.001;
        let whole = (ntsc + 0.5) as u32;
        if whole > 0 && ((whole as f64) - ntsc).abs() < NTSC_TOLERANCE {
            return Speed::new(whole * 1000, 1001);
        }
        Speed::new((fps * 1000.0 + 0.5) as u32, 1000)
    }
    pub fn to_fps(self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        f64::from(self.scale) / f64::from(self.duration)
    }
}

/// The frames of a sequence and their playback speed
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    /// Frame numbers, in playback order, empty for a single image
    pub frames: Vec<i64>,
    pub speed:  Speed
}

/// Geometry and sample layout of one image layer
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerInfo {
    pub name:   String,
    pub width:  usize,
    pub height: usize,
    pub format: PixelFormat,
    pub layout: PixelLayout
}

impl Default for LayerInfo {
    fn default() -> Self {
        LayerInfo {
            name:   String::new(),
            width:  0,
            height: 0,
            format: PixelFormat::RGBA_U8,
            layout: PixelLayout::default()
        }
    }
}

impl LayerInfo {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> LayerInfo {
        LayerInfo {
            width,
            height,
            format,
            ..Default::default()
        }
    }
    /// Number of bytes in one row of this layer
    pub const fn scanline_byte_count(&self) -> usize {
        self.width * self.format.byte_width()
    }
    /// Number of bytes needed to hold the whole layer
    pub const fn data_byte_count(&self) -> usize {
        self.scanline_byte_count() * self.height
    }
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Everything a decoder knows about an image before decoding pixels
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageInfo {
    /// Never empty, layer 0 is the default layer
    layers:          Vec<LayerInfo>,
    pub tags:        Tags,
    pub sequence:    Sequence,
    pub compression: Compression
}

impl Default for ImageInfo {
    fn default() -> Self {
        ImageInfo {
            layers:      vec![LayerInfo::default()],
            tags:        Tags::new(),
            sequence:    Sequence::default(),
            compression: Compression::None
        }
    }
}

impl ImageInfo {
    /// Create information for a single layer image
    pub fn new(width: usize, height: usize, format: PixelFormat) -> ImageInfo {
        ImageInfo::from_layer(LayerInfo::new(width, height, format))
    }
    pub fn from_layer(layer: LayerInfo) -> ImageInfo {
        ImageInfo {
            layers: vec![layer],
            ..Default::default()
        }
    }
    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }
    /// Append a further layer after the default one
    pub fn push_layer(&mut self, layer: LayerInfo) {
        self.layers.push(layer);
    }
    /// Return layer `index`, or `None` if the image does not have it
    pub fn layer(&self, index: usize) -> Option<&LayerInfo> {
        self.layers.get(index)
    }
    /// The default layer
    pub fn default_layer(&self) -> &LayerInfo {
        // layers is never empty, every constructor inserts one
        &self.layers[0]
    }
    pub fn default_layer_mut(&mut self) -> &mut LayerInfo {
        &mut self.layers[0]
    }
    pub fn width(&self) -> usize {
        self.default_layer().width
    }
    pub fn height(&self) -> usize {
        self.default_layer().height
    }
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
    pub fn format(&self) -> PixelFormat {
        self.default_layer().format
    }
    pub fn layout(&self) -> PixelLayout {
        self.default_layer().layout
    }
    pub fn is_valid(&self) -> bool {
        self.default_layer().is_valid()
    }
    /// Bytes needed to hold the default layer
    pub fn data_byte_count(&self) -> usize {
        self.default_layer().data_byte_count()
    }
    pub fn set_tag(&mut self, key: &str, value: impl Into<String>) {
        self.tags.insert(String::from(key), value.into());
    }
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layer_always_exists() {
        let info = ImageInfo::default();
        assert_eq!(info.layers().len(), 1);
        assert!(!info.is_valid());

        let mut info = ImageInfo::new(4, 2, PixelFormat::RGB_U10);
        info.push_layer(LayerInfo::new(2, 2, PixelFormat::L_U8));
        assert_eq!(info.dimensions(), (4, 2));
        assert_eq!(info.data_byte_count(), 32);
        assert_eq!(info.layer(1).map(|l| l.data_byte_count()), Some(4));
        assert!(info.layer(2).is_none());
    }

    #[test]
    fn speed_from_fps() {
        assert_eq!(Speed::from_fps(24.0), Speed::new(24, 1));
        assert_eq!(Speed::from_fps(29.97), Speed::new(30000, 1001));
        assert_eq!(Speed::from_fps(23.976), Speed::new(24000, 1001));
        assert_eq!(Speed::from_fps(59.94), Speed::new(60000, 1001));
        // film headers store the rate as f32
        assert_eq!(Speed::from_fps(f64::from(23.976_f32)), Speed::new(24000, 1001));
        assert_eq!(Speed::from_fps(12.5), Speed::new(12500, 1000));
        assert_eq!(Speed::from_fps(-1.0), Speed::default());
        assert!((Speed::new(30000, 1001).to_fps() - 29.97).abs() < 0.001);
    }
}
