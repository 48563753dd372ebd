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
use kino_core::pixel::PixelFormat;
use kino_pic::{PicDecoder, PicEncoder, PicOptions, PIC_EXTENSIONS};
use serde_json::Value;

use crate::codecs::{create_options_for_encoder, options_from_json, options_to_json, Codec};
use crate::errors::ImageErrors;
use crate::image::Image;

/// Softimage PIC images
#[derive(Copy, Clone, Debug, Default)]
pub struct PicCodec {
    options: PicOptions
}

impl Codec for PicCodec {
    fn name(&self) -> &'static str {
        "Softimage PIC"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &PIC_EXTENSIONS
    }

    fn read_info(&self, data: &[u8], options: DecoderOptions) -> Result<ImageInfo, ImageErrors> {
        let mut decoder = PicDecoder::new_with_options(ByteCursor::new(data), options);
        decoder.decode_headers()?;
        Ok(decoder.info().cloned().unwrap_or_default())
    }

    fn read(&self, data: &[u8], options: DecoderOptions) -> Result<Image, ImageErrors> {
        let mut decoder = PicDecoder::new_with_options(ByteCursor::new(data), options);
        let pixels = decoder.decode()?;
        Image::new(decoder.info().cloned().unwrap_or_default(), pixels)
    }

    fn supports(&self, format: PixelFormat) -> bool {
        PicEncoder::supports(format)
    }

    fn preferred_format(&self, format: PixelFormat) -> PixelFormat {
        if format.has_alpha() {
            PixelFormat::RGBA_U8
        } else {
            PixelFormat::RGB_U8
        }
    }

    fn write(&self, image: &Image, _: &str) -> Result<Vec<u8>, ImageErrors> {
        let options = self.options.apply(create_options_for_encoder(image));
        let comment = image.info().tag(tag_names::DESCRIPTION).unwrap_or_default();

        let mut sink = Vec::new();
        PicEncoder::new(image.pixels(), options)
            .set_comment(comment)
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
