/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoder and encoder options
//!
//! Both option structs are consumed by value in setters so
//! they can be chained
//!
//! ```
//! use kino_core::options::DecoderOptions;
//! use kino_core::pixel::Proxy;
//! let options = DecoderOptions::default()
//!     .set_max_width(4096)
//!     .set_proxy(Proxy::Half);
//! assert_eq!(options.get_max_width(), 4096);
//! ```
use crate::info::Compression;
use crate::pixel::{PixelFormat, Proxy};

/// Options shared by all decoders
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    max_width:  usize,
    max_height: usize,
    strict:     bool,
    proxy:      Proxy,
    layer:      usize,
    normalize:  bool
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width:  1 << 16,
            max_height: 1 << 16,
            strict:     false,
            proxy:      Proxy::None,
            layer:      0,
            normalize:  true
        }
    }
}

impl DecoderOptions {
    /// Options that treat every tolerated oddity as an error
    pub fn new_strict() -> DecoderOptions {
        DecoderOptions::default().set_strict_mode(true)
    }
    /// Maximum width a decoder accepts before refusing the image
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }
    /// Whether header inconsistencies like a wrong `pixmax`
    /// are errors instead of warnings
    pub const fn get_strict_mode(&self) -> bool {
        self.strict
    }
    pub const fn get_proxy(&self) -> Proxy {
        self.proxy
    }
    /// Which layer to decode, 0 is the default layer
    pub const fn get_layer(&self) -> usize {
        self.layer
    }
    /// Whether decoded pixels are brought into canonical layout
    pub const fn get_normalize(&self) -> bool {
        self.normalize
    }
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }
    pub fn set_proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = proxy;
        self
    }
    pub fn set_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }
    pub fn set_normalize(mut self, yes: bool) -> Self {
        self.normalize = yes;
        self
    }
}

/// Options every encoder needs to lay out an image
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    width:       usize,
    height:      usize,
    format:      PixelFormat,
    compression: Compression
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            width:       0,
            height:      0,
            format:      PixelFormat::RGB_U8,
            compression: Compression::None
        }
    }
}

impl EncoderOptions {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            format,
            ..Default::default()
        }
    }
    pub const fn get_width(&self) -> usize {
        self.width
    }
    pub const fn get_height(&self) -> usize {
        self.height
    }
    pub const fn get_format(&self) -> PixelFormat {
        self.format
    }
    pub const fn get_compression(&self) -> Compression {
        self.compression
    }
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    pub fn set_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }
    pub fn set_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
    /// Bytes the encoder expects in the pixel buffer
    pub const fn expected_byte_count(&self) -> usize {
        self.width * self.height * self.format.byte_width()
    }
}
