/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use kino_core::bytestream::ByteCursor;
use kino_core::info::ImageInfo;
use kino_core::options::DecoderOptions;
use kino_core::pixel::{PixelFormat, PixelType};
use kino_lut::{LutDecoder, LutDialect, LutEncoder, LutOptions};
use serde_json::Value;

use crate::codecs::{create_options_for_encoder, options_from_json, options_to_json, Codec};
use crate::errors::ImageErrors;
use crate::image::Image;

/// One dimensional lookup tables stored as text
///
/// Each dialect is registered on its own since the extension decides
/// how the text is laid out.
#[derive(Copy, Clone, Debug, Default)]
pub struct LutCodec {
    dialect: LutDialect,
    options: LutOptions
}

impl LutCodec {
    /// `LUT: <channels> <size>` tables, `.lut`
    pub fn inferno() -> LutCodec {
        LutCodec {
            dialect: LutDialect::Inferno,
            options: LutOptions::default()
        }
    }

    /// Column per channel tables, `.1dl`
    pub fn kodak() -> LutCodec {
        LutCodec {
            dialect: LutDialect::Kodak,
            options: LutOptions::default()
        }
    }

    fn decoder<'a>(
        &self, data: &'a [u8], options: DecoderOptions
    ) -> LutDecoder<ByteCursor<&'a [u8]>> {
        LutDecoder::new_with_options(ByteCursor::new(data), self.dialect, options, self.options)
    }
}

impl Codec for LutCodec {
    fn name(&self) -> &'static str {
        match self.dialect {
            LutDialect::Inferno => "Inferno LUT",
            LutDialect::Kodak => "Kodak LUT"
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.dialect {
            LutDialect::Inferno => &["lut"],
            LutDialect::Kodak => &["1dl"]
        }
    }

    fn read_info(&self, data: &[u8], options: DecoderOptions) -> Result<ImageInfo, ImageErrors> {
        let mut decoder = self.decoder(data, options);
        decoder.decode_headers()?;
        Ok(decoder.info().cloned().unwrap_or_default())
    }

    fn read(&self, data: &[u8], options: DecoderOptions) -> Result<Image, ImageErrors> {
        let mut decoder = self.decoder(data, options);
        let pixels = decoder.decode()?;
        Image::new(decoder.info().cloned().unwrap_or_default(), pixels)
    }

    fn supports(&self, format: PixelFormat) -> bool {
        LutEncoder::supports(format)
    }

    fn preferred_format(&self, format: PixelFormat) -> PixelFormat {
        if self.supports(format) {
            return format;
        }
        PixelFormat::from_parts(format.channels(), PixelType::U16).unwrap_or(PixelFormat::RGBA_U16)
    }

    fn write(&self, image: &Image, _: &str) -> Result<Vec<u8>, ImageErrors> {
        let options = create_options_for_encoder(image);

        let mut sink = Vec::new();
        LutEncoder::new(image.pixels(), options, self.dialect).encode(&mut sink)?;
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

#[cfg(test)]
mod tests {
    use kino_core::options::DecoderOptions;
    use kino_core::pixel::PixelFormat;
    use serde_json::json;

    use crate::codecs::lut::LutCodec;
    use crate::codecs::Codec;

    #[test]
    fn forced_type_changes_the_format() {
        let table = b"LUT: 1 3\n\n0\n100\n200\n";
        let mut codec = LutCodec::inferno();

        let info = codec.read_info(table, DecoderOptions::default()).unwrap();
        assert_eq!(info.format(), PixelFormat::L_U8);

        codec.set_options(json!({"type": "U16"})).unwrap();
        let image = codec.read(table, DecoderOptions::default()).unwrap();
        assert_eq!(image.format(), PixelFormat::L_U16);
        assert_eq!(image.dimensions(), (3, 1));
        assert_eq!(image.samples::<u16>(), Some(&[0_u16, 100, 200][..]));
    }
}
