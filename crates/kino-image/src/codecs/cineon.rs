/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use kino_cineon::{CineonDecoder, CineonEncoder, CineonOptions, CINEON_EXTENSIONS};
use kino_core::bytestream::ByteCursor;
use kino_core::info::ImageInfo;
use kino_core::options::DecoderOptions;
use kino_core::pixel::PixelFormat;
use serde_json::Value;

use crate::codecs::{create_options_for_encoder, options_from_json, options_to_json, Codec};
use crate::errors::ImageErrors;
use crate::image::Image;

/// Kodak Cineon film scans
///
/// Pixels are always 10 bit RGB, the colour profile option only picks
/// the channel descriptors written.
#[derive(Copy, Clone, Debug, Default)]
pub struct CineonCodec {
    options: CineonOptions
}

impl Codec for CineonCodec {
    fn name(&self) -> &'static str {
        "Cineon"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &CINEON_EXTENSIONS
    }

    fn read_info(&self, data: &[u8], options: DecoderOptions) -> Result<ImageInfo, ImageErrors> {
        let mut decoder = CineonDecoder::new_with_options(ByteCursor::new(data), options);
        decoder.decode_headers()?;
        Ok(decoder.info().cloned().unwrap_or_default())
    }

    fn read(&self, data: &[u8], options: DecoderOptions) -> Result<Image, ImageErrors> {
        let mut decoder = CineonDecoder::new_with_options(ByteCursor::new(data), options);
        let pixels = decoder.decode()?;
        Image::new(decoder.info().cloned().unwrap_or_default(), pixels)
    }

    fn supports(&self, format: PixelFormat) -> bool {
        CineonEncoder::supports(format)
    }

    fn preferred_format(&self, _: PixelFormat) -> PixelFormat {
        PixelFormat::RGB_U10
    }

    fn write(&self, image: &Image, file_name: &str) -> Result<Vec<u8>, ImageErrors> {
        let options = create_options_for_encoder(image);

        let mut sink = Vec::new();
        CineonEncoder::new(image.pixels(), options)
            .set_tags(&image.info().tags)
            .set_file_name(file_name)
            .set_color_profile(self.options.color_profile)
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
