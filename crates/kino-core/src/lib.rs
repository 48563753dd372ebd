/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by all kino codecs
//!
//! This crate provides the pieces every decoder and encoder
//! under the `kino` umbrella agrees on
//!
//! It currently contains
//!
//! - The pixel format model, every format a decoder may produce
//!   and its derived channel count, byte width and maximum value
//! - Image information shared by decoders (size, layout, layers, tags, sequence)
//! - A bytestream reader and writer with endian aware reads and writes
//! - Decoder and encoder options
//! - The two run length codecs used by the still image containers
//!
//! This library is `#[no_std]` with `alloc` feature needed for defining `Vec`
//!
//! # Features
//!  - `std`: Enables readers and writers for std types like files
//!
//!  - `log`: Forward logging macros to the `log` crate
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub mod bytestream;
pub mod info;
pub mod log;
pub mod options;
pub mod pixel;
pub mod rle;
