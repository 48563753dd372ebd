/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! An image, its information and its pixels
//!
//! Pixels are reference counted and never mutated once an [`Image`]
//! is built, so a decoded image can be handed between threads and
//! shared by several consumers without copying.
use std::sync::Arc;

use kino_convert::convert_image;
use kino_core::info::{ImageInfo, LayerInfo};
use kino_core::pixel::{PixelFormat, PixelLayout, Proxy};

use crate::errors::ImageErrors;

/// Image information and the pixels of its default layer
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    info:   ImageInfo,
    pixels: Arc<[u8]>
}

impl Image {
    /// Create an image from information and pixels laid out as the
    /// default layer describes
    ///
    /// # Errors
    /// If `pixels` is shorter than the layer needs. Extra trailing
    /// bytes are dropped.
    pub fn new(info: ImageInfo, mut pixels: Vec<u8>) -> Result<Image, ImageErrors> {
        let expected = info.default_layer().data_byte_count();
        if pixels.len() < expected {
            return Err(ImageErrors::DimensionsMisMatch(expected, pixels.len()));
        }
        pixels.truncate(expected);
        Ok(Image {
            info,
            pixels: Arc::from(pixels)
        })
    }

    /// Create a canonical image filled with `pixels`
    ///
    /// Rows go bottom to top, samples are native endian and interleaved.
    pub fn from_pixels(
        width: usize, height: usize, format: PixelFormat, pixels: Vec<u8>
    ) -> Result<Image, ImageErrors> {
        Image::new(ImageInfo::new(width, height, format), pixels)
    }

    pub const fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut ImageInfo {
        &mut self.info
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.info.dimensions()
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format()
    }

    pub fn layout(&self) -> PixelLayout {
        self.info.layout()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Another handle to the pixel storage
    pub fn shared_pixels(&self) -> Arc<[u8]> {
        Arc::clone(&self.pixels)
    }

    /// View the pixels as samples of type `T`
    ///
    /// Returns `None` when the buffer is not aligned or sized for `T`,
    /// e.g asking for `u16` samples of an 8 bit image.
    pub fn samples<T: bytemuck::Pod>(&self) -> Option<&[T]> {
        bytemuck::try_cast_slice(&self.pixels).ok()
    }

    /// Whether pixels are already native endian, interleaved, RGB
    /// ordered and bottom row first
    pub fn is_canonical(&self) -> bool {
        self.info.layout().is_canonical()
    }

    /// Bring pixels into canonical layout, subsampled by `proxy`
    ///
    /// Returns a clone sharing the same pixels if nothing needs to change.
    pub fn normalize(&self, proxy: Proxy) -> Image {
        self.convert_with_proxy(self.format(), proxy)
    }

    /// Convert the image into `format`, normalizing the layout on the way
    pub fn convert(&self, format: PixelFormat) -> Image {
        self.convert_with_proxy(format, Proxy::None)
    }

    fn convert_with_proxy(&self, format: PixelFormat, proxy: Proxy) -> Image {
        if format == self.format() && proxy == Proxy::None && self.is_canonical() {
            return self.clone();
        }
        let source = self.info.default_layer();
        let pixels = convert_image(source, &self.pixels, format, proxy);
        let (width, height) = kino_convert::proxy_size(source.width, source.height, proxy);

        let layer = LayerInfo {
            name: source.name.clone(),
            width,
            height,
            format,
            layout: PixelLayout::default()
        };
        let mut info = ImageInfo::from_layer(layer);
        info.tags = self.info.tags.clone();
        info.sequence = self.info.sequence.clone();
        info.compression = self.info.compression;

        Image {
            info,
            pixels: Arc::from(pixels)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kino_core::info::ImageInfo;
    use kino_core::pixel::{Mirror, PixelFormat, Proxy};

    use crate::errors::ImageErrors;
    use crate::image::Image;

    #[test]
    fn short_buffers_are_rejected() {
        let err = Image::from_pixels(2, 2, PixelFormat::RGB_U8, vec![0; 11]);
        assert!(matches!(err, Err(ImageErrors::DimensionsMisMatch(12, 11))));
    }

    #[test]
    fn canonical_normalize_shares_pixels() {
        let image = Image::from_pixels(2, 1, PixelFormat::L_U8, vec![1, 2]).unwrap();
        let same = image.normalize(Proxy::None);
        assert!(Arc::ptr_eq(&image.shared_pixels(), &same.shared_pixels()));
    }

    #[test]
    fn normalize_flips_top_down_rows() {
        let mut info = ImageInfo::new(1, 2, PixelFormat::L_U8);
        info.default_layer_mut().layout.mirror = Mirror { x: false, y: true };
        info.set_tag("Description", "kept");

        let image = Image::new(info, vec![10, 20]).unwrap();
        let normal = image.normalize(Proxy::None);

        assert_eq!(normal.pixels(), &[20, 10]);
        assert!(normal.is_canonical());
        assert_eq!(normal.info().tag("Description"), Some("kept"));
    }

    #[test]
    fn typed_views() {
        let pixels: Vec<u8> = [1_u16, 2, 3].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let image = Image::from_pixels(1, 1, PixelFormat::RGB_U16, pixels).unwrap();
        let wide = image.convert(PixelFormat::RGBA_U16);

        assert_eq!(wide.samples::<u16>().map(<[u16]>::len), Some(4));
        assert_eq!(image.convert(PixelFormat::RGB_U8).format(), PixelFormat::RGB_U8);
    }
}
