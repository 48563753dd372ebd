/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use kino_core::bytestream::ByteCursor;
use kino_core::info::{tag_names, ImageInfo};
use kino_core::options::DecoderOptions;
use kino_core::pixel::{PixelFormat, PixelType};
use kino_targa::{TargaDecoder, TargaEncoder, TargaOptions, TARGA_EXTENSIONS};
use serde_json::Value;

use crate::codecs::{create_options_for_encoder, options_from_json, options_to_json, Codec};
use crate::errors::ImageErrors;
use crate::image::Image;

/// Truevision Targa images
#[derive(Copy, Clone, Debug, Default)]
pub struct TargaCodec {
    options: TargaOptions
}

impl Codec for TargaCodec {
    fn name(&self) -> &'static str {
        "Targa"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &TARGA_EXTENSIONS
    }

    fn read_info(&self, data: &[u8], options: DecoderOptions) -> Result<ImageInfo, ImageErrors> {
        let mut decoder = TargaDecoder::new_with_options(ByteCursor::new(data), options);
        decoder.decode_headers()?;
        Ok(decoder.info().cloned().unwrap_or_default())
    }

    fn read(&self, data: &[u8], options: DecoderOptions) -> Result<Image, ImageErrors> {
        let mut decoder = TargaDecoder::new_with_options(ByteCursor::new(data), options);
        let pixels = decoder.decode()?;
        Image::new(decoder.info().cloned().unwrap_or_default(), pixels)
    }

    fn supports(&self, format: PixelFormat) -> bool {
        TargaEncoder::supports(format)
    }

    fn preferred_format(&self, format: PixelFormat) -> PixelFormat {
        PixelFormat::from_parts(format.channels(), PixelType::U8).unwrap_or(PixelFormat::RGBA_U8)
    }

    fn write(&self, image: &Image, _: &str) -> Result<Vec<u8>, ImageErrors> {
        let options = self.options.apply(create_options_for_encoder(image));
        let id = image.info().tag(tag_names::DESCRIPTION).unwrap_or_default();

        let mut sink = Vec::new();
        TargaEncoder::new(image.pixels(), options)
            .set_id(id)
            .encode(&mut sink)?;
        Ok(sink)
    }

    fn options(&self) -> Value {
        options_to_json(&self.options)
    }

    fn set_options(&mut self, options: Value) -> Result<(), ImageErrors> {
        self.options = options_from_json(options)?;
        Ok(())
    }
}
