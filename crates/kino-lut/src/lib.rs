/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! One dimensional LUT text tables
//!
//! A table is read as an image one pixel high, one pixel per entry.
//! Two layouts are understood, picked by file extension:
//!
//! Inferno (`.lut`), every value of the first channel, then the next:
//! ```text
//! LUT: 3 1024
//!
//!         0
//!         1
//! ...
//! ```
//!
//! Kodak (`.1dl`), one entry per line, `#` starts a comment:
//! ```text
//! # film print emulation
//!      0     0     0
//!      4     3     5
//! ...
//! ```
//!
//! The bit depth is 8, 10 or 16, either forced through [`LutOptions`]
//! or taken from the largest value in the table.
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub use constants::LUT_EXTENSIONS;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use header::LutHeader;
pub use kino_core;
pub use options::{LutDialect, LutOptions, LutType};

mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod options;
mod table;
