/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// First word of an Inferno table
pub const INFERNO_MAGIC: &str = "LUT:";

/// Starts a comment that runs to the end of the line
pub const COMMENT: u8 = b'#';

/// Column width of each value
pub const INFERNO_VALUE_WIDTH: usize = 9;
pub const KODAK_VALUE_WIDTH: usize = 6;

/// `.lut` holds Inferno tables, `.1dl` Kodak tables
pub const LUT_EXTENSIONS: [&str; 2] = ["lut", "1dl"];
