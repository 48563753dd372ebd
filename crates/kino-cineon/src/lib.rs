/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A Kodak Cineon decoder and encoder
//!
//! Cineon files carry film scans as three 10 bit channels packed into
//! one 32 bit word per pixel, red in the top bits:
//!
//! ```text
//!  31        22 21        12 11         2 1 0
//! |    red     |   green    |    blue    |pad|
//! ```
//!
//! A 2048 byte header precedes the pixels. Its first word is the magic
//! `0x802a5fd7`; reading it as `0xd75f2a80` means every field and pixel
//! word is little endian. The encoder always writes big endian files.
//!
//! Header fields describing where the film came from are exposed as
//! image tags, see [`tag_names`](kino_core::info::tag_names).
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub use constants::CINEON_EXTENSIONS;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use header::{ChannelBlock, CineonHeader, FileBlock, FilmBlock, ImageBlock, SourceBlock};
pub use kino_core;
pub use options::{CineonOptions, ColorProfile};

mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod options;
mod tags;
