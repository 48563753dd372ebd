/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Errors possible when reading and writing images
//!
//! Every codec error is folded into one of a few kinds so callers can
//! tell a file that belongs to another format from a file this library
//! understands but cannot handle, or from a damaged one.
use std::fmt::{Debug, Display, Formatter};

use kino_cineon::{CineonDecodeErrors, CineonEncodeErrors};
use kino_lut::{LutDecodeErrors, LutEncodeErrors};
use kino_pic::{PicDecodeErrors, PicEncodeErrors};
use kino_sgi::{SgiDecodeErrors, SgiEncodeErrors};
use kino_targa::{TargaDecodeErrors, TargaEncodeErrors};

/// All errors possible during image reading and writing
pub enum ImageErrors {
    /// The data is definitely not in the format of the codec asked to read it
    UnrecognizedFormat(String),
    /// The codec recognized the file but cannot handle the
    /// combination of fields it carries
    UnsupportedFormat(String),
    /// Pixel data could not be read, e.g a truncated or corrupt stream
    ReadError(String),
    /// An image could not be encoded
    WriteError(String),
    /// A codec rejected the options it was given
    OptionError(String),
    /// No registered codec handles the extension
    NoCodecForExtension(String),
    /// A pixel buffer does not hold the bytes its information describes
    ///
    /// # Arguments
    /// - expected
    /// - found
    DimensionsMisMatch(usize, usize),
    IoError(std::io::Error)
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageErrors::UnrecognizedFormat(msg) => {
                writeln!(f, "Unrecognized format: {msg}")
            }
            ImageErrors::UnsupportedFormat(msg) => {
                writeln!(f, "Unsupported format: {msg}")
            }
            ImageErrors::ReadError(msg) => {
                writeln!(f, "Read error: {msg}")
            }
            ImageErrors::WriteError(msg) => {
                writeln!(f, "Write error: {msg}")
            }
            ImageErrors::OptionError(msg) => {
                writeln!(f, "Invalid option: {msg}")
            }
            ImageErrors::NoCodecForExtension(ext) => {
                writeln!(f, "No codec registered for extension {ext:?}")
            }
            ImageErrors::DimensionsMisMatch(expected, found) => {
                writeln!(
                    f,
                    "Pixel buffer holds {found} bytes but the image needs {expected}"
                )
            }
            ImageErrors::IoError(err) => {
                writeln!(f, "I/O error: {err}")
            }
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for ImageErrors {}

impl From<std::io::Error> for ImageErrors {
    fn from(value: std::io::Error) -> Self {
        ImageErrors::IoError(value)
    }
}

impl From<serde_json::Error> for ImageErrors {
    fn from(value: serde_json::Error) -> Self {
        ImageErrors::OptionError(value.to_string())
    }
}

/// Codec errors end with a newline, keep the message on one line
fn message(err: impl Debug) -> String {
    let msg = format!("{err:?}");
    msg.trim_end().to_string()
}

impl From<SgiDecodeErrors> for ImageErrors {
    fn from(value: SgiDecodeErrors) -> Self {
        match value {
            SgiDecodeErrors::WrongMagicBytes(_) => ImageErrors::UnrecognizedFormat(message(value)),
            SgiDecodeErrors::UnsupportedStorage(_)
            | SgiDecodeErrors::UnsupportedFormat(_, _)
            | SgiDecodeErrors::TooLargeDimensions(_, _, _) => {
                ImageErrors::UnsupportedFormat(message(value))
            }
            _ => ImageErrors::ReadError(message(value))
        }
    }
}

impl From<TargaDecodeErrors> for ImageErrors {
    fn from(value: TargaDecodeErrors) -> Self {
        match value {
            TargaDecodeErrors::UnknownImageType(_) => {
                ImageErrors::UnrecognizedFormat(message(value))
            }
            TargaDecodeErrors::UnsupportedImageType(_)
            | TargaDecodeErrors::UnsupportedPixelBits(_, _)
            | TargaDecodeErrors::UnsupportedAlphaBits(_)
            | TargaDecodeErrors::InvalidBitCount(_)
            | TargaDecodeErrors::TooLargeDimensions(_, _, _) => {
                ImageErrors::UnsupportedFormat(message(value))
            }
            _ => ImageErrors::ReadError(message(value))
        }
    }
}

impl From<CineonDecodeErrors> for ImageErrors {
    fn from(value: CineonDecodeErrors) -> Self {
        match value {
            CineonDecodeErrors::WrongMagicBytes(_) => {
                ImageErrors::UnrecognizedFormat(message(value))
            }
            CineonDecodeErrors::UnsupportedChannels(_)
            | CineonDecodeErrors::MismatchedChannel(_)
            | CineonDecodeErrors::UnsupportedLayout(_, _)
            | CineonDecodeErrors::UnsupportedPadding(_, _)
            | CineonDecodeErrors::TooLargeDimensions(_, _, _) => {
                ImageErrors::UnsupportedFormat(message(value))
            }
            _ => ImageErrors::ReadError(message(value))
        }
    }
}

impl From<LutDecodeErrors> for ImageErrors {
    fn from(value: LutDecodeErrors) -> Self {
        match value {
            LutDecodeErrors::WrongMagic(_) => ImageErrors::UnrecognizedFormat(message(value)),
            LutDecodeErrors::UnsupportedFormat(_, _) | LutDecodeErrors::TooLargeDimensions(_, _) => {
                ImageErrors::UnsupportedFormat(message(value))
            }
            _ => ImageErrors::ReadError(message(value))
        }
    }
}

impl From<PicDecodeErrors> for ImageErrors {
    fn from(value: PicDecodeErrors) -> Self {
        match value {
            PicDecodeErrors::WrongMagicBytes(_) => ImageErrors::UnrecognizedFormat(message(value)),
            PicDecodeErrors::WrongId(_)
            | PicDecodeErrors::UnsupportedChannels(_, _)
            | PicDecodeErrors::UnsupportedEncoding(_)
            | PicDecodeErrors::TooLargeDimensions(_, _, _) => {
                ImageErrors::UnsupportedFormat(message(value))
            }
            _ => ImageErrors::ReadError(message(value))
        }
    }
}

macro_rules! write_error {
    ($($error:ty),+) => {
        $(
            impl From<$error> for ImageErrors {
                fn from(value: $error) -> Self {
                    ImageErrors::WriteError(message(value))
                }
            }
        )+
    };
}

write_error!(
    SgiEncodeErrors,
    TargaEncodeErrors,
    CineonEncodeErrors,
    LutEncodeErrors,
    PicEncodeErrors
);

#[cfg(test)]
mod tests {
    use kino_core::bytestream::ByteIoError;
    use kino_sgi::SgiDecodeErrors;
    use kino_targa::TargaDecodeErrors;

    use crate::errors::ImageErrors;

    #[test]
    fn codec_errors_fold_into_kinds() {
        let err = ImageErrors::from(SgiDecodeErrors::WrongMagicBytes(12));
        assert!(matches!(err, ImageErrors::UnrecognizedFormat(_)));

        let err = ImageErrors::from(TargaDecodeErrors::UnsupportedAlphaBits(4));
        assert!(matches!(err, ImageErrors::UnsupportedFormat(_)));

        let err = ImageErrors::from(SgiDecodeErrors::IoErrors(ByteIoError::NotEnoughBytes(4, 1)));
        match err {
            ImageErrors::ReadError(msg) => assert!(!msg.ends_with('\n')),
            _ => panic!("expected a read error")
        }
    }
}
