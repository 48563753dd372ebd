/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A Softimage PIC decoder and encoder
//!
//! ```text
//! offset  size  field
//!      0     4  magic 0x5380f634
//!      4     4  version, f32
//!      8    80  comment
//!     88     4  id, always "PICT"
//!     92     2  width
//!     94     2  height
//!     96     4  pixel ratio, f32
//!    100     2  fields
//!    102     2  padding
//!    104        channel packets, 4 bytes each
//! ```
//!
//! Every field is big endian. A channel packet names the channels it
//! carries; the supported chains are one RGB packet, one RGBA packet,
//! or an RGB packet chained to an alpha packet. Each scanline, stored
//! top row first, holds one run of data per packet, raw or mixed run
//! length encoded.
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub use constants::PIC_EXTENSIONS;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use header::{ChannelPacket, PicHeader};
pub use kino_core;
pub use options::PicOptions;

mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod mixed;
mod options;
